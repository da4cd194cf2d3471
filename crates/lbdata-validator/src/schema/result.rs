//! Validation result and diagnostic types.

use crate::utils::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single structural violation, located by a JSON-path-like string
/// such as `phases[2].pre-LB.Rank_comm.avg`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathedError {
    pub path: String,
    pub violation: Violation,
}

/// What went wrong at a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A required key is absent
    MissingKey,
    /// A closed object carries a key it does not declare
    UnexpectedKey,
    /// The value has the wrong JSON type
    WrongType { expected: String, got: String },
    /// The value is not in the allowed set
    NotAllowed { value: String, allowed: Vec<String> },
    /// None of a set of alternative keys is present
    MissingAnyOf { keys: Vec<String> },
}

impl PathedError {
    pub fn new(path: impl Into<String>, violation: Violation) -> Self {
        Self {
            path: path.into(),
            violation,
        }
    }
}

impl fmt::Display for PathedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        write!(f, "{path}: {}", self.violation)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingKey => write!(f, "missing required key"),
            Violation::UnexpectedKey => write!(f, "unexpected key"),
            Violation::WrongType { expected, got } => write!(f, "expected {expected}, got {got}"),
            Violation::NotAllowed { value, allowed } => {
                write!(f, "{value} is not allowed, {} must be chosen", allowed.join(" or "))
            }
            Violation::MissingAnyOf { keys } => {
                write!(f, "one of {} is required", keys.join(" or "))
            }
        }
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub diagnostics: Vec<PathedError>,
}

impl ValidationResult {
    /// Returns true if the document matched its schema
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Convert into a `Result`, carrying every diagnostic on failure
    pub fn into_result(self) -> Result<(), SchemaError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(SchemaError::Violation {
                diagnostics: self.diagnostics,
            })
        }
    }
}
