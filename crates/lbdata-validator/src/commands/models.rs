use std::path::PathBuf;

/// Arguments for the validate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Single file to validate
    pub file_path: Option<PathBuf>,

    /// Directory of rank files to validate
    pub dir_path: Option<PathBuf>,

    /// Directory mode: first dot-segment filter
    pub file_prefix: Option<String>,

    /// Directory mode: last dot-segment filter
    pub file_suffix: Option<String>,

    /// Cross-check communication endpoints across ranks
    pub validate_comm_links: bool,

    /// Fail files with a missing or unknown schema type
    pub strict_types: bool,

    /// Optional validator configuration file (TOML)
    pub config: Option<PathBuf>,

    /// Path to write the batch report JSON
    pub report: Option<PathBuf>,

    /// Print a human-readable summary to the terminal
    pub summary: bool,
}
