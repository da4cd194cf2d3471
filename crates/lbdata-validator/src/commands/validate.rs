//! Validate command implementation.
//!
//! The validate command:
//! 1. Resolves the files to check (one file, or one dataset of a directory)
//! 2. Decodes each file and checks it against the schema it declares
//! 3. Optionally cross-checks communication links per dataset
//! 4. Writes the batch report and prints a summary

use crate::commands::models::ValidateArgs;
use crate::dataset::{assemble_dataset, check_comm_links, membership, resolve, Assembly, Membership};
use crate::output::{
    render_terminal_summary, write_report, BatchReport, DatasetStatus, FileReport, FileStatus,
};
use crate::parser::{declared_kind, read_record, DecodedRecord, DeclaredKind, RecordKind};
use crate::schema::SchemaValidator;
use crate::utils::config::{load_config, UnknownTypePolicy, ValidatorConfig};
use crate::utils::error::{DatasetError, ResolveError};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Validation facade
///
/// Holds the configuration and both schema validators, built once and
/// shared by every file of a run.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    trace: SchemaValidator,
    stats: SchemaValidator,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            trace: SchemaValidator::for_kind(RecordKind::TraceDatafile),
            stats: SchemaValidator::for_kind(RecordKind::StatsDatafile),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn schema(&self, kind: RecordKind) -> &SchemaValidator {
        match kind {
            RecordKind::TraceDatafile => &self.trace,
            RecordKind::StatsDatafile => &self.stats,
        }
    }

    /// Validate one file, including its dataset when link checks are on
    ///
    /// **Public** - single-file mode
    ///
    /// Never fails: every per-file problem is recorded in the report.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> FileReport {
        self.check_file(path.as_ref()).0
    }

    /// Validate the dataset files of a directory
    ///
    /// **Public** - directory mode
    ///
    /// # Errors
    /// * `ResolveError` - the directory is missing, empty, or holds a
    ///   matching file without a rank index
    pub fn validate_directory(&self, dir: impl AsRef<Path>) -> Result<BatchReport, ResolveError> {
        let dir = dir.as_ref();
        let files = resolve(
            dir,
            self.config.file_prefix.as_deref(),
            self.config.file_suffix.as_deref(),
        )?;
        info!("Found {} file(s) to validate in {}", files.len(), dir.display());

        Ok(self.validate_files(&files))
    }

    /// Validate an ordered list of files
    ///
    /// Schema checks run on the rayon pool when `parallel` is set. Link
    /// checks run afterwards, in order, once per dataset.
    pub fn validate_files(&self, files: &[PathBuf]) -> BatchReport {
        let mut reports: Vec<FileReport> = if self.config.parallel {
            files.par_iter().map(|path| self.check_schema(path).0).collect()
        } else {
            files.iter().map(|path| self.check_schema(path).0).collect()
        };

        let mut checked = HashSet::new();
        for report in &mut reports {
            if !self.wants_dataset_check(report) {
                continue;
            }
            let status = match dataset_key(&report.path) {
                Some(key) if checked.contains(&key) => {
                    debug!(
                        "Dataset of {} already checked in this run",
                        report.path.display()
                    );
                    DatasetStatus::Deferred
                }
                Some(key) => {
                    checked.insert(key);
                    self.check_dataset(&report.path)
                }
                None => self.check_dataset(&report.path),
            };
            report.dataset = Some(status);
        }

        BatchReport::new(reports)
    }

    /// Validate one file and return its text exactly as written
    ///
    /// **Public** - for callers that consume approved documents
    ///
    /// # Errors
    /// Fails when the file does not pass validation, naming the reason.
    pub fn load_approved(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let (report, record) = self.check_file(path);

        match record {
            Some(record) if report.passed() => Ok(record.text),
            _ => anyhow::bail!(
                "{} did not pass validation: {}",
                path.display(),
                failure_reason(&report)
            ),
        }
    }

    /// Schema check, then link check when enabled
    fn check_file(&self, path: &Path) -> (FileReport, Option<DecodedRecord>) {
        let (mut report, record) = self.check_schema(path);
        if self.wants_dataset_check(&report) {
            report.dataset = Some(self.check_dataset(path));
        }
        (report, record)
    }

    fn check_schema(&self, path: &Path) -> (FileReport, Option<DecodedRecord>) {
        info!("Validating file: {}", path.display());

        let record = match read_record(path) {
            Ok(record) => record,
            Err(e) => {
                error!("{}", e);
                let report = FileReport {
                    path: path.to_path_buf(),
                    kind: None,
                    status: FileStatus::Malformed {
                        message: e.to_string(),
                    },
                    dataset: None,
                };
                return (report, None);
            }
        };

        let (kind, status) = match declared_kind(&record.tree) {
            DeclaredKind::Known(kind) => (Some(kind), self.check_known(kind, &record)),
            DeclaredKind::Missing => (None, self.untyped(path)),
            DeclaredKind::Unknown(declared) => (None, self.unknown_type(path, declared)),
        };

        let report = FileReport {
            path: path.to_path_buf(),
            kind,
            status,
            dataset: None,
        };
        (report, Some(record))
    }

    fn check_known(&self, kind: RecordKind, record: &DecodedRecord) -> FileStatus {
        let result = self.schema(kind).validate(&record.tree);
        if result.is_ok() {
            info!("Valid JSON schema in {}", record.path.display());
            return FileStatus::Valid;
        }

        error!("Invalid JSON schema in {}", record.path.display());
        for diagnostic in &result.diagnostics {
            error!("  {}: {}", record.path.display(), diagnostic);
        }
        FileStatus::Invalid {
            diagnostics: result.diagnostics,
        }
    }

    fn untyped(&self, path: &Path) -> FileStatus {
        match self.config.unknown_type_policy {
            UnknownTypePolicy::Lenient => {
                warn!(
                    "Schema type not found in file: {}. Passing by default when schema type not found.",
                    path.display()
                );
                FileStatus::Untyped
            }
            UnknownTypePolicy::Strict => {
                error!("Schema type not found in file: {}", path.display());
                FileStatus::Rejected {
                    reason: "schema type not found".to_string(),
                }
            }
        }
    }

    fn unknown_type(&self, path: &Path, declared: String) -> FileStatus {
        match self.config.unknown_type_policy {
            UnknownTypePolicy::Lenient => {
                warn!(
                    "Unknown schema type {} in file: {}. Passing by default when schema type not found.",
                    declared,
                    path.display()
                );
                FileStatus::UnknownType { declared }
            }
            UnknownTypePolicy::Strict => {
                error!("Unknown schema type {} in file: {}", declared, path.display());
                FileStatus::Rejected {
                    reason: format!("unknown schema type {declared}"),
                }
            }
        }
    }

    /// Link checks apply to schema-valid trace files only
    fn wants_dataset_check(&self, report: &FileReport) -> bool {
        self.config.validate_comm_links
            && report.kind == Some(RecordKind::TraceDatafile)
            && report.status == FileStatus::Valid
    }

    fn check_dataset(&self, path: &Path) -> DatasetStatus {
        let outcome = assemble_dataset(path).and_then(|assembly| match assembly {
            Assembly::Deferred => Ok(None),
            assembly => {
                let trees = assembly.trees();
                check_comm_links(&trees)?;
                Ok(Some(trees.len()))
            }
        });

        match outcome {
            Ok(None) => DatasetStatus::Deferred,
            Ok(Some(files)) => {
                info!(
                    "Communication links consistent for dataset of {} ({} file(s))",
                    path.display(),
                    files
                );
                DatasetStatus::Consistent { files }
            }
            Err(err) => {
                error!("Invalid dataset for file: {}", path.display());
                error!("{}", err);
                match err {
                    DatasetError::ReferentialIntegrity { phase, missing } => {
                        DatasetStatus::Inconsistent { phase, missing }
                    }
                    other => DatasetStatus::Failed {
                        message: other.to_string(),
                    },
                }
            }
        }
    }
}

/// Identity of the dataset an anchor file heads, used to check it once
fn dataset_key(path: &Path) -> Option<PathBuf> {
    match membership(path) {
        Membership::Anchor { base } => {
            Some(path.parent().unwrap_or_else(|| Path::new("")).join(base))
        }
        _ => None,
    }
}

fn failure_reason(report: &FileReport) -> String {
    if !report.status.passed() {
        return report.status.to_string();
    }
    report
        .dataset
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Execute the validate command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Validate command arguments
///
/// # Returns
/// The batch report, whether or not every file passed
///
/// # Errors
/// * Invalid argument combinations
/// * Config file read or parse errors
/// * Missing paths, empty directories, unranked dataset files
/// * Report write errors
///
/// # Example
/// ```ignore
/// let args = ValidateArgs {
///     dir_path: Some(PathBuf::from("traces/")),
///     validate_comm_links: true,
///     ..Default::default()
/// };
///
/// let report = execute_validate(args)?;
/// ensure_success(&report)?;
/// ```
pub fn execute_validate(args: ValidateArgs) -> Result<BatchReport> {
    validate_args(&args)?;

    // Step 1: Build configuration, CLI flags override the file
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    if args.validate_comm_links {
        config.validate_comm_links = true;
    }
    if args.strict_types {
        config.unknown_type_policy = UnknownTypePolicy::Strict;
    }
    if args.file_prefix.is_some() {
        config.file_prefix = args.file_prefix.clone();
    }
    if args.file_suffix.is_some() {
        config.file_suffix = args.file_suffix.clone();
    }
    debug!("Validator config: {:?}", config);

    let validator = Validator::new(config);

    // Step 2: Validate
    let report = if let Some(file) = &args.file_path {
        if !file.exists() {
            return Err(ResolveError::PathNotFound(file.clone()).into());
        }
        if !file.is_file() {
            return Err(ResolveError::NotAFile(file.clone()).into());
        }
        info!("Step 1/2: Validating file {}", file.display());
        BatchReport::new(vec![validator.validate_file(file)])
    } else if let Some(dir) = &args.dir_path {
        info!("Step 1/2: Validating directory {}", dir.display());
        validator
            .validate_directory(dir)
            .with_context(|| format!("Failed to resolve files in {}", dir.display()))?
    } else {
        anyhow::bail!("Either --file-path or --dir-path is required");
    };

    // Step 3: Report
    info!("Step 2/2: Reporting");
    if let Some(path) = &args.report {
        write_report(&report, path).context("Failed to write validation report")?;
    }
    if args.summary {
        println!("{}", render_terminal_summary(&report));
    }

    if report.success() {
        info!("✓ All {} file(s) passed", report.files.len());
    } else {
        warn!(
            "{} of {} file(s) failed validation",
            report.failure_count(),
            report.files.len()
        );
    }

    Ok(report)
}

/// Turn a failed batch into an error for the process exit code
pub fn ensure_success(report: &BatchReport) -> Result<()> {
    if !report.success() {
        anyhow::bail!(
            "Validation failed for {} of {} file(s)",
            report.failure_count(),
            report.files.len()
        );
    }
    Ok(())
}

/// Validate validate-command arguments
///
/// **Public** - can be called before execute_validate for early validation
///
/// # Errors
/// Returns error if the argument combination is invalid
pub fn validate_args(args: &ValidateArgs) -> Result<()> {
    match (&args.file_path, &args.dir_path) {
        (Some(_), Some(_)) => anyhow::bail!("--file-path and --dir-path cannot be combined"),
        (None, None) => anyhow::bail!("Either --file-path or --dir-path is required"),
        _ => {}
    }

    if args.file_path.is_some() && (args.file_prefix.is_some() || args.file_suffix.is_some()) {
        anyhow::bail!("--file-prefix and --file-suffix only apply with --dir-path");
    }

    for (flag, value) in [
        ("--file-prefix", &args.file_prefix),
        ("--file-suffix", &args.file_suffix),
    ] {
        if value.as_deref().is_some_and(str::is_empty) {
            anyhow::bail!("{flag} cannot be empty");
        }
    }

    Ok(())
}
