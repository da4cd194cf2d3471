//! Record kinds and the `type` discriminator.

use crate::utils::config::{STATS_KIND, TRACE_KIND};
use crate::utils::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The two record schemas the engine knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Per-rank tasks and communications (`LBDatafile`)
    #[serde(rename = "LBDatafile")]
    TraceDatafile,
    /// Per-phase load-balancing statistics (`LBStatsfile`)
    #[serde(rename = "LBStatsfile")]
    StatsDatafile,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::TraceDatafile, RecordKind::StatsDatafile];

    /// Producer-facing literal
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::TraceDatafile => TRACE_KIND,
            RecordKind::StatsDatafile => STATS_KIND,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TRACE_KIND => Ok(RecordKind::TraceDatafile),
            STATS_KIND => Ok(RecordKind::StatsDatafile),
            other => Err(SchemaError::UnsupportedSchemaKind(other.to_string())),
        }
    }
}

/// What a document says about its own kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredKind {
    Known(RecordKind),
    Unknown(String),
    Missing,
}

/// Read the kind discriminator of a document
///
/// `metadata.type` wins over a root-level `type`. A non-string value is
/// reported as an unknown kind rendered as JSON.
pub fn declared_kind(tree: &Value) -> DeclaredKind {
    let declared = tree
        .get("metadata")
        .and_then(|m| m.get("type"))
        .or_else(|| tree.get("type"));

    match declared {
        None | Some(Value::Null) => DeclaredKind::Missing,
        Some(Value::String(s)) => match s.parse::<RecordKind>() {
            Ok(kind) => DeclaredKind::Known(kind),
            Err(_) => DeclaredKind::Unknown(s.clone()),
        },
        Some(other) => DeclaredKind::Unknown(other.to_string()),
    }
}
