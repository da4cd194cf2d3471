//! Declarative schemas for the two record kinds.
//!
//! # Example
//! ```ignore
//! use lbdata_validator::schema::SchemaValidator;
//!
//! let validator = SchemaValidator::new("LBStatsfile")?;
//! for diagnostic in validator.validate(&tree).diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! ```

pub mod result;
pub mod rules;
mod stats;
mod trace;
mod validator;

// Public API exports
pub use result::{PathedError, ValidationResult, Violation};
pub use rules::{Field, LeafType, Rule};
pub use stats::stats_schema;
pub use trace::trace_schema;
pub use validator::SchemaValidator;
