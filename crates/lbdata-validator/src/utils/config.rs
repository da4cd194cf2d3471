//! Configuration and constants for the validator.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current batch report schema version
pub const REPORT_VERSION: &str = "1.0.0";

// Record kind literals are a contract with producers and must not change
pub const TRACE_KIND: &str = "LBDatafile";
pub const STATS_KIND: &str = "LBStatsfile";

/// Extensions a sibling rank file may carry (plain and brotli-compressed)
pub const RECORD_EXTENSIONS: &[&str] = &[".json", ".json.br"];

/// The eleven statistics carried by every stat block
pub const STAT_FIELDS: &[&str] = &[
    "avg", "car", "imb", "kur", "max", "min", "npr", "skw", "std", "sum", "var",
];

pub const REQUIRED_STAT_GROUPS: &[&str] = &[
    "Object_comm",
    "Object_load_modeled",
    "Object_load_raw",
    "Rank_comm",
    "Rank_load_modeled",
    "Rank_load_raw",
];

pub const OPTIONAL_STAT_GROUPS: &[&str] = &[
    "Object_strategy_specific_load_modeled",
    "Rank_strategy_specific_load_modeled",
];

/// What to do with a file whose declared type is missing or unrecognised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Warn and pass the file through
    #[default]
    Lenient,
    /// Fail the file
    Strict,
}

/// Validator configuration
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Policy for missing/unknown `type` values
    pub unknown_type_policy: UnknownTypePolicy,

    /// Cross-check communication endpoints against task populations
    pub validate_comm_links: bool,

    /// Directory mode: only files whose first dot-segment matches
    pub file_prefix: Option<String>,

    /// Directory mode: only files whose last dot-segment matches
    pub file_suffix: Option<String>,

    /// Directory mode: schema-check files on a worker pool
    pub parallel: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            unknown_type_policy: UnknownTypePolicy::Lenient,
            validate_comm_links: false,
            file_prefix: None,
            file_suffix: None,
            parallel: true,
        }
    }
}

/// Load a validator config from a TOML file
///
/// # Errors
/// * `ConfigError::Read` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
///
/// # Example
/// ```ignore
/// let config = load_config("lbdata-validate.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ValidatorConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ValidatorConfig = toml::from_str(&contents)?;
    Ok(config)
}
