//! Schema validator for one record kind.

use super::result::ValidationResult;
use super::rules::Rule;
use super::stats::stats_schema;
use super::trace::trace_schema;
use crate::parser::record::RecordKind;
use crate::utils::error::SchemaError;
use log::debug;
use serde_json::Value;

/// Validates documents against the schema of one record kind
///
/// The rule tree is built once in the constructor; validation borrows it.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    kind: RecordKind,
    root: Rule,
}

impl SchemaValidator {
    /// Build a validator from a kind literal (`"LBDatafile"`, `"LBStatsfile"`)
    ///
    /// # Errors
    /// * `SchemaError::UnsupportedSchemaKind` - the literal names no known kind
    pub fn new(kind: &str) -> Result<Self, SchemaError> {
        Ok(Self::for_kind(kind.parse()?))
    }

    pub fn for_kind(kind: RecordKind) -> Self {
        let root = match kind {
            RecordKind::TraceDatafile => trace_schema(),
            RecordKind::StatsDatafile => stats_schema(),
        };
        Self { kind, root }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn root(&self) -> &Rule {
        &self.root
    }

    /// Check a document, collecting every independent violation
    pub fn validate(&self, tree: &Value) -> ValidationResult {
        let mut diagnostics = Vec::new();
        self.root.check(tree, "", &mut diagnostics);
        debug!(
            "{} validation finished with {} diagnostic(s)",
            self.kind,
            diagnostics.len()
        );
        ValidationResult { diagnostics }
    }

    /// Returns true if the document matches, never fails
    pub fn is_valid(&self, tree: &Value) -> bool {
        self.validate(tree).is_ok()
    }

    /// Return the document on success, or every diagnostic on failure
    ///
    /// # Errors
    /// * `SchemaError::Violation` - with pathed diagnostics
    pub fn validate_strict<'a>(&self, tree: &'a Value) -> Result<&'a Value, SchemaError> {
        self.validate(tree).into_result().map(|()| tree)
    }
}
