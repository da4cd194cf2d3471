//! Multi-rank dataset assembly.
//!
//! A rank file name embeds up to two indices as digit runs: an outer
//! (node) index and an inner (rank) index, or just the inner index when
//! only one run exists. The inner-index-0 file is the anchor of its
//! dataset: assembling from it loads every sibling rank file, while
//! assembling from any other rank is deferred to the anchor so a
//! directory is cross-checked once per dataset instead of once per file.

use crate::parser::decoder::{read_record, DecodedRecord};
use crate::utils::config::RECORD_EXTENSIONS;
use crate::utils::error::DatasetError;
use log::debug;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Digit runs in a file name. Compiled once at first use.
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digit run regex pattern"));

/// Indices embedded in a rank file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankInfo {
    /// Outer (node) index, `None` for the `-1` sentinel
    pub outer: Option<String>,
    /// Inner (rank) index
    pub inner: Option<String>,
    /// Byte offset of the inner index within the file name
    inner_start: usize,
}

impl RankInfo {
    /// Extract indices from the first one or two digit runs of `file_name`
    pub fn from_file_name(file_name: &str) -> Self {
        let runs: Vec<_> = DIGIT_RUN_RE.find_iter(file_name).take(2).collect();
        match runs.as_slice() {
            [] => Self {
                outer: None,
                inner: None,
                inner_start: 0,
            },
            [inner] => Self {
                outer: None,
                inner: Some(inner.as_str().to_string()),
                inner_start: inner.start(),
            },
            [outer, inner, ..] => Self {
                outer: Some(outer.as_str().to_string()),
                inner: Some(inner.as_str().to_string()),
                inner_start: inner.start(),
            },
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.inner.as_deref() == Some("0")
    }
}

/// Role of a file within its dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    /// No indices in the name: the file is a dataset by itself
    Standalone,
    /// Rank 0: siblings share the name up to `base`
    Anchor { base: String },
    /// Any other rank: checked through its anchor
    Member { inner: String },
}

/// Classify a rank file by its name
pub fn membership(path: &Path) -> Membership {
    let file_name = file_name_of(path);
    let info = RankInfo::from_file_name(&file_name);
    let is_anchor = info.is_anchor();

    match info.inner {
        None => Membership::Standalone,
        Some(_) if is_anchor => Membership::Anchor {
            base: file_name[..info.inner_start].to_string(),
        },
        Some(inner) => Membership::Member { inner },
    }
}

/// The records of one dataset, ready for cross-checking
#[derive(Debug)]
pub enum Assembly {
    /// Single-file dataset
    Standalone(DecodedRecord),
    /// Every rank file found beside an anchor, the anchor included
    Complete(Vec<DecodedRecord>),
    /// Non-anchor rank; its anchor covers it
    Deferred,
}

impl Assembly {
    /// Parsed records, empty when deferred
    pub fn trees(&self) -> Vec<&serde_json::Value> {
        match self {
            Assembly::Standalone(record) => vec![&record.tree],
            Assembly::Complete(records) => records.iter().map(|r| &r.tree).collect(),
            Assembly::Deferred => Vec::new(),
        }
    }
}

/// Load the dataset `path` belongs to
///
/// **Public** - main entry point for dataset assembly
///
/// # Errors
/// * `DatasetError::Decode` - a sibling could not be read or decoded
/// * `DatasetError::Io` - the directory could not be listed
pub fn assemble_dataset(path: impl AsRef<Path>) -> Result<Assembly, DatasetError> {
    let path = path.as_ref();

    match membership(path) {
        Membership::Standalone => Ok(Assembly::Standalone(read_record(path)?)),
        Membership::Anchor { base } => {
            let files = dataset_files(path, &base)?;
            debug!("Dataset: {:?}", files);
            let records = files
                .iter()
                .map(read_record)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Assembly::Complete(records))
        }
        Membership::Member { inner } => {
            debug!(
                "{} is rank {} of a dataset checked through its anchor",
                path.display(),
                inner
            );
            Ok(Assembly::Deferred)
        }
    }
}

/// Files next to `anchor` whose name starts with `base` and carries a
/// record extension, ordered by inner index
pub fn dataset_files(anchor: &Path, base: &str) -> Result<Vec<PathBuf>, DatasetError> {
    let dir = match anchor.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.starts_with(base) || !RECORD_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }
        let rank = RankInfo::from_file_name(&name)
            .inner
            .and_then(|i| i.parse::<u64>().ok())
            .unwrap_or(u64::MAX);
        files.push((rank, name, entry.path()));
    }

    files.sort();
    Ok(files.into_iter().map(|(_, _, path)| path).collect())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
