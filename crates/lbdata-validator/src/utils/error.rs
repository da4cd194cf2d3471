//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in the CLI and commands.

use crate::schema::PathedError;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning file bytes into a parsed document
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input: neither brotli payload nor JSON text ({0})")]
    MalformedInput(String),
}

/// Errors raised by the schema engine
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unsupported schema type: {0} was given")]
    UnsupportedSchemaKind(String),

    #[error("Schema violation: {}", render_diagnostics(.diagnostics))]
    Violation { diagnostics: Vec<PathedError> },
}

/// Errors that can occur while resolving the set of files to validate
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Path: {} NOT found", .0.display())]
    PathNotFound(PathBuf),

    #[error("Directory: {} is EMPTY", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("No integer rank index in file name: {0}")]
    MissingRankIndex(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while assembling or cross-checking a multi-rank dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(
        "Phase {phase}: Task ids: {} are referenced in communication, but are not present in the dataset",
        render_ids(.missing)
    )]
    ReferentialIntegrity { phase: usize, missing: BTreeSet<i64> },

    #[error("Malformed dataset record {record}: {detail}")]
    MalformedDataset { record: usize, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a validator config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

fn render_diagnostics(diagnostics: &[PathedError]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Render an id set as `{1, 2, 99}`
pub fn render_ids(ids: &BTreeSet<i64>) -> String {
    let inner = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", inner)
}
