//! LB Data Validator CLI
//!
//! Validates load-balancing trace and statistics files, one at a time or a
//! whole dataset directory, and optionally cross-checks communication links
//! between ranks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use lbdata_validator::commands::{
    display_schema, display_version, ensure_success, execute_validate, validate_args,
    ValidateArgs,
};

/// LB Data Validator - schema and consistency checks for LB data files
#[derive(Parser, Debug)]
#[command(name = "lbdata-validate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true, visible_alias = "debug")]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a file or a directory of rank files
    Validate {
        /// Path to a single file
        #[arg(long, conflicts_with = "dir_path", required_unless_present = "dir_path")]
        file_path: Option<PathBuf>,

        /// Path to a directory of rank files
        #[arg(long)]
        dir_path: Option<PathBuf>,

        /// Only files whose first dot-segment matches (directory mode)
        #[arg(long, requires = "dir_path")]
        file_prefix: Option<String>,

        /// Only files whose last dot-segment matches (directory mode)
        #[arg(long, requires = "dir_path")]
        file_suffix: Option<String>,

        /// Check that communications only reference tasks of the dataset
        #[arg(long)]
        validate_comm_links: bool,

        /// Fail files with a missing or unknown schema type
        #[arg(long)]
        strict_types: bool,

        /// Validator configuration file (TOML)
        #[arg(long, env = "LBDATA_VALIDATE_CONFIG")]
        config: Option<PathBuf>,

        /// Write the batch report to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print a text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Display schema information
    Schema {
        /// Record kind (LBDatafile or LBStatsfile); all kinds when omitted
        #[arg(long)]
        kind: Option<String>,

        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();
    log::debug!("{:?}", cli);

    // Execute command
    match cli.command {
        Commands::Validate {
            file_path,
            dir_path,
            file_prefix,
            file_suffix,
            validate_comm_links,
            strict_types,
            config,
            report,
            summary,
        } => {
            let args = ValidateArgs {
                file_path,
                dir_path,
                file_prefix,
                file_suffix,
                validate_comm_links,
                strict_types,
                config,
                report,
                summary,
            };

            // Validate args first
            validate_args(&args)?;

            let report = execute_validate(args)?;
            ensure_success(&report)?;
        }

        Commands::Schema { kind, show } => {
            display_schema(kind.as_deref(), show)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
