//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod utils;
pub mod validate;

// Re-export main command functions
pub use models::ValidateArgs;
pub use utils::{display_schema, display_version, render_schema};
pub use validate::{ensure_success, execute_validate, validate_args, Validator};
