//! Batch report definitions.
//!
//! This module defines the structure of the JSON report written to disk.
//! The report is versioned to allow future evolution.

use crate::parser::record::RecordKind;
use crate::schema::PathedError;
use crate::utils::config::REPORT_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Outcome of validating a batch of files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Report schema version
    pub report_version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Per-file outcomes, in validation order
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn new(files: Vec<FileReport>) -> Self {
        Self {
            report_version: REPORT_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            files,
        }
    }

    /// True only if every file passed
    pub fn success(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }

    pub fn failure_count(&self) -> usize {
        self.files.iter().filter(|f| !f.passed()).count()
    }
}

/// Outcome of validating one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,

    /// Declared kind, when recognised
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RecordKind>,

    pub status: FileStatus,

    /// Communication-link outcome, when checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetStatus>,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.status.passed() && self.dataset.as_ref().map_or(true, DatasetStatus::passed)
    }
}

/// Schema-level outcome of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Matched the schema of its declared kind
    Valid,
    /// No declared kind; passed through
    Untyped,
    /// Unrecognised declared kind; passed through
    UnknownType { declared: String },
    /// Missing or unrecognised kind under the strict policy
    Rejected { reason: String },
    /// Did not match its schema
    Invalid { diagnostics: Vec<PathedError> },
    /// Could not be read or decoded
    Malformed { message: String },
}

impl FileStatus {
    pub fn passed(&self) -> bool {
        matches!(
            self,
            FileStatus::Valid | FileStatus::Untyped | FileStatus::UnknownType { .. }
        )
    }

    /// Passed, but only by default
    pub fn is_warning(&self) -> bool {
        matches!(self, FileStatus::Untyped | FileStatus::UnknownType { .. })
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Valid => write!(f, "valid"),
            FileStatus::Untyped => write!(f, "no schema type, passed by default"),
            FileStatus::UnknownType { declared } => {
                write!(f, "unknown schema type {declared}, passed by default")
            }
            FileStatus::Rejected { reason } => write!(f, "rejected: {reason}"),
            FileStatus::Invalid { diagnostics } => {
                write!(f, "invalid ({} violation(s))", diagnostics.len())
            }
            FileStatus::Malformed { message } => write!(f, "malformed: {message}"),
        }
    }
}

/// Outcome of the communication-link check run for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetStatus {
    /// Every endpoint resolved, across `files` rank files
    Consistent { files: usize },
    /// Non-anchor rank, or an anchor whose dataset was already checked
    Deferred,
    /// Unknown endpoints in `phase`
    Inconsistent { phase: usize, missing: BTreeSet<i64> },
    /// The dataset could not be assembled or read
    Failed { message: String },
}

impl DatasetStatus {
    pub fn passed(&self) -> bool {
        matches!(self, DatasetStatus::Consistent { .. } | DatasetStatus::Deferred)
    }
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetStatus::Consistent { files } => {
                write!(f, "comm links consistent across {files} file(s)")
            }
            DatasetStatus::Deferred => write!(f, "comm links checked via dataset anchor"),
            DatasetStatus::Inconsistent { phase, missing } => write!(
                f,
                "phase {phase} references unknown task ids {}",
                crate::utils::error::render_ids(missing)
            ),
            DatasetStatus::Failed { message } => write!(f, "dataset check failed: {message}"),
        }
    }
}
