//! File-set resolution for directory validation.
//!
//! Rank files follow the `<prefix>.<rank>.<suffix>` naming convention. When
//! neither prefix nor suffix is given, the most common first and last
//! dot-segments in the directory are used. Ties go to the value seen first
//! in directory listing order, which the OS does not guarantee, so inference
//! over a directory holding several equally-sized datasets is not
//! deterministic.

use crate::utils::error::ResolveError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve and order the files of one dataset in `dir`
///
/// **Public** - main entry point for directory mode
///
/// A filter that is `None` is not applied, unless both are `None`, in
/// which case both are inferred.
///
/// # Errors
/// * `ResolveError::PathNotFound` / `NotADirectory` - bad `dir`
/// * `ResolveError::EmptyDirectory` - `dir` has no entries at all
/// * `ResolveError::MissingRankIndex` - a matching file has no integer
///   second-to-last dot-segment
pub fn resolve(
    dir: impl AsRef<Path>,
    prefix: Option<&str>,
    suffix: Option<&str>,
) -> Result<Vec<PathBuf>, ResolveError> {
    let dir = dir.as_ref();
    let names = list_file_names(dir)?;

    let (prefix, suffix) = match (prefix, suffix) {
        (None, None) => {
            info!("File prefix and file suffix not given");
            let prefix = most_common(names.iter().map(|n| first_segment(n)));
            let suffix = most_common(names.iter().map(|n| last_segment(n)));
            info!("Found most common prefix: {}", prefix.unwrap_or("<none>"));
            info!("Found most common suffix: {}", suffix.unwrap_or("<none>"));
            (prefix, suffix)
        }
        given => given,
    };

    let mut ranked = Vec::new();
    for name in &names {
        if prefix.is_some_and(|p| first_segment(name) != p) {
            continue;
        }
        if suffix.is_some_and(|s| last_segment(name) != s) {
            continue;
        }
        let rank = rank_index(name).ok_or_else(|| ResolveError::MissingRankIndex(name.clone()))?;
        ranked.push((rank, dir.join(name)));
    }

    ranked.sort_by(|a, b| a.0.cmp(&b.0));
    debug!("Resolved {} file(s) in {}", ranked.len(), dir.display());

    Ok(ranked.into_iter().map(|(_, path)| path).collect())
}

/// File names in `dir`, in listing order
///
/// **Private** - emptiness is judged on all entries, before filtering
/// sub-directories out
fn list_file_names(dir: &Path) -> Result<Vec<String>, ResolveError> {
    if !dir.exists() {
        return Err(ResolveError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ResolveError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = 0usize;
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries += 1;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    if entries == 0 {
        return Err(ResolveError::EmptyDirectory(dir.to_path_buf()));
    }
    Ok(names)
}

pub(crate) fn first_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

pub(crate) fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Integer in the second-to-last dot-segment (`data.3.json` -> 3)
pub fn rank_index(name: &str) -> Option<u64> {
    let mut segments = name.rsplit('.');
    segments.next()?;
    segments.next()?.parse().ok()
}

/// Most frequent value, first-seen wins on ties
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
