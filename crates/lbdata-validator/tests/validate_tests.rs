use lbdata_validator::commands::Validator;
use lbdata_validator::output::{DatasetStatus, FileStatus};
use lbdata_validator::parser::RecordKind;
use lbdata_validator::schema::Violation;
use lbdata_validator::utils::config::{
    UnknownTypePolicy, ValidatorConfig, REQUIRED_STAT_GROUPS, STAT_FIELDS,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn trace(tasks: &[i64], comms: &[(i64, i64)]) -> Value {
    json!({
        "type": "LBDatafile",
        "phases": [{
            "id": 0,
            "tasks": tasks.iter().map(|id| json!({"entity": {"id": id}})).collect::<Vec<_>>(),
            "communications": comms
                .iter()
                .map(|(from, to)| json!({"from": {"id": from}, "to": {"id": to}}))
                .collect::<Vec<_>>(),
        }]
    })
}

fn stats() -> Value {
    let block: Map<String, Value> = STAT_FIELDS.iter().map(|f| (f.to_string(), json!(1.5))).collect();
    let bundle: Map<String, Value> = REQUIRED_STAT_GROUPS
        .iter()
        .map(|g| (g.to_string(), Value::Object(block.clone())))
        .collect();
    json!({
        "type": "LBStatsfile",
        "phases": [{"id": 0, "pre-LB": bundle}]
    })
}

fn write(dir: &Path, name: &str, doc: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    path
}

fn write_compressed(dir: &Path, name: &str, doc: &Value) -> PathBuf {
    let mut out = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 9, 22);
        writer.write_all(doc.to_string().as_bytes()).unwrap();
    }
    let path = dir.join(name);
    fs::write(&path, out).unwrap();
    path
}

fn with_links() -> Validator {
    Validator::new(ValidatorConfig {
        validate_comm_links: true,
        ..Default::default()
    })
}

#[test]
fn test_valid_stats_file() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "stats.0.json", &stats());

    let report = Validator::new(ValidatorConfig::default()).validate_file(&path);
    assert_eq!(report.kind, Some(RecordKind::StatsDatafile));
    assert_eq!(report.status, FileStatus::Valid);
    assert!(report.dataset.is_none());
}

#[test]
fn test_invalid_stats_file_reports_paths() {
    let dir = tempdir().unwrap();
    let mut doc = stats();
    doc["phases"][0]["pre-LB"]["Rank_comm"]
        .as_object_mut()
        .unwrap()
        .remove("avg");
    doc["phases"][0]["pre-LB"]["Rank_comm"]["bogus"] = json!(1);
    let path = write(dir.path(), "stats.0.json", &doc);

    let report = Validator::new(ValidatorConfig::default()).validate_file(&path);
    let diagnostics = match report.status {
        FileStatus::Invalid { diagnostics } => diagnostics,
        other => panic!("expected invalid status, got {other:?}"),
    };
    let found: Vec<(String, Violation)> = diagnostics
        .into_iter()
        .map(|d| (d.path, d.violation))
        .collect();
    assert_eq!(
        found,
        vec![
            ("phases[0].pre-LB.Rank_comm.avg".to_string(), Violation::MissingKey),
            ("phases[0].pre-LB.Rank_comm.bogus".to_string(), Violation::UnexpectedKey),
        ]
    );
}

#[test]
fn test_compressed_and_plain_agree() {
    let dir = tempdir().unwrap();
    let doc = trace(&[1, 2], &[(1, 2)]);
    let plain = write(dir.path(), "a.json", &doc);
    let packed = write_compressed(dir.path(), "b.json.br", &doc);

    let validator = Validator::new(ValidatorConfig::default());
    assert_eq!(validator.validate_file(&plain).status, FileStatus::Valid);
    assert_eq!(validator.validate_file(&packed).status, FileStatus::Valid);
}

#[test]
fn test_unknown_type_passes_with_warning() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "future.json", &json!({"type": "FutureFormat", "x": 1}));

    let report = Validator::new(ValidatorConfig::default()).validate_file(&path);
    assert_eq!(
        report.status,
        FileStatus::UnknownType {
            declared: "FutureFormat".to_string()
        }
    );
    assert!(report.passed());
    assert!(report.status.is_warning());
}

#[test]
fn test_unknown_and_missing_type_fail_under_strict_policy() {
    let dir = tempdir().unwrap();
    let future = write(dir.path(), "future.json", &json!({"type": "FutureFormat"}));
    let untyped = write(dir.path(), "untyped.json", &json!({"phases": []}));

    let validator = Validator::new(ValidatorConfig {
        unknown_type_policy: UnknownTypePolicy::Strict,
        ..Default::default()
    });
    assert!(!validator.validate_file(&future).passed());
    assert!(matches!(
        validator.validate_file(&untyped).status,
        FileStatus::Rejected { .. }
    ));
}

#[test]
fn test_missing_type_passes_by_default() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "untyped.json", &json!({"phases": []}));

    let report = Validator::new(ValidatorConfig::default()).validate_file(&path);
    assert_eq!(report.status, FileStatus::Untyped);
    assert!(report.passed());
}

#[test]
fn test_malformed_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ truncated").unwrap();

    let report = Validator::new(ValidatorConfig::default()).validate_file(&path);
    assert!(matches!(report.status, FileStatus::Malformed { .. }));
    assert!(!report.passed());
}

#[test]
fn test_cross_rank_links_resolve() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data.0.json", &trace(&[1, 2], &[(1, 3)]));
    write(dir.path(), "data.1.json", &trace(&[3, 4], &[]));

    let batch = with_links().validate_directory(dir.path()).unwrap();
    assert!(batch.success());
    assert_eq!(batch.files.len(), 2);
    assert_eq!(
        batch.files[0].dataset,
        Some(DatasetStatus::Consistent { files: 2 })
    );
    assert_eq!(batch.files[1].dataset, Some(DatasetStatus::Deferred));
}

#[test]
fn test_negative_task_ids_link_across_ranks() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data.0.json", &trace(&[-1], &[(-1, 2)]));
    write(dir.path(), "data.1.json", &trace(&[2], &[]));

    let batch = with_links().validate_directory(dir.path()).unwrap();
    assert!(batch.success());
    assert_eq!(batch.files[0].status, FileStatus::Valid);
    assert_eq!(
        batch.files[0].dataset,
        Some(DatasetStatus::Consistent { files: 2 })
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_rank_file_joins_dataset() {
    let dir = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    let anchor = write(dir.path(), "data.0.json", &trace(&[1], &[(1, 3)]));
    let target = write(elsewhere.path(), "rank1.json", &trace(&[3], &[]));
    std::os::unix::fs::symlink(&target, dir.path().join("data.1.json")).unwrap();

    let report = with_links().validate_file(&anchor);
    assert_eq!(report.dataset, Some(DatasetStatus::Consistent { files: 2 }));

    let batch = with_links().validate_directory(dir.path()).unwrap();
    assert_eq!(batch.files.len(), 2);
    assert!(batch.success());
}

#[test]
fn test_unknown_link_target_fails_dataset() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data.0.json", &trace(&[1, 2], &[(1, 99)]));
    write(dir.path(), "data.1.json", &trace(&[3, 4], &[]));

    let batch = with_links().validate_directory(dir.path()).unwrap();
    assert!(!batch.success());
    assert_eq!(batch.failure_count(), 1);
    assert_eq!(batch.files[0].status, FileStatus::Valid);
    assert_eq!(
        batch.files[0].dataset,
        Some(DatasetStatus::Inconsistent {
            phase: 0,
            missing: BTreeSet::from([99]),
        })
    );
}

#[test]
fn test_links_ignored_when_disabled() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data.0.json", &trace(&[1, 2], &[(1, 99)]));

    let batch = Validator::new(ValidatorConfig::default())
        .validate_directory(dir.path())
        .unwrap();
    assert!(batch.success());
    assert!(batch.files[0].dataset.is_none());
}

#[test]
fn test_single_file_mode_checks_whole_dataset() {
    let dir = tempdir().unwrap();
    let anchor = write(dir.path(), "data.0.json", &trace(&[1], &[(1, 3)]));
    write(dir.path(), "data.1.json", &trace(&[3], &[]));

    let report = with_links().validate_file(&anchor);
    assert_eq!(report.dataset, Some(DatasetStatus::Consistent { files: 2 }));
}

#[test]
fn test_serial_and_parallel_agree() {
    let dir = tempdir().unwrap();
    for rank in 0..6i64 {
        write(
            dir.path(),
            &format!("data.{rank}.json"),
            &trace(&[rank * 10, rank * 10 + 1], &[(rank * 10, 0)]),
        );
    }

    let parallel = with_links().validate_directory(dir.path()).unwrap();
    let serial = Validator::new(ValidatorConfig {
        validate_comm_links: true,
        parallel: false,
        ..Default::default()
    })
    .validate_directory(dir.path())
    .unwrap();

    let paths = |b: &lbdata_validator::output::BatchReport| {
        b.files.iter().map(|f| f.path.clone()).collect::<Vec<_>>()
    };
    assert_eq!(paths(&parallel), paths(&serial));
    assert!(parallel.success());
    assert!(serial.success());
}

#[test]
fn test_directory_keeps_going_past_bad_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data.0.json", &trace(&[1], &[]));
    fs::write(dir.path().join("data.1.json"), "{ truncated").unwrap();
    write(dir.path(), "data.2.json", &json!({"type": "FutureFormat"}));

    let batch = Validator::new(ValidatorConfig::default())
        .validate_directory(dir.path())
        .unwrap();
    assert_eq!(batch.files.len(), 3);
    assert_eq!(batch.failure_count(), 1);
    assert!(matches!(batch.files[1].status, FileStatus::Malformed { .. }));
}

#[test]
fn test_load_approved_returns_original_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.0.json");
    let text = serde_json::to_string_pretty(&stats()).unwrap() + "\n";
    fs::write(&path, &text).unwrap();

    let loaded = Validator::new(ValidatorConfig::default())
        .load_approved(&path)
        .unwrap();
    assert_eq!(loaded, text);
}

#[test]
fn test_load_approved_rejects_invalid_file() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "stats.0.json", &json!({"type": "LBStatsfile"}));

    let err = Validator::new(ValidatorConfig::default())
        .load_approved(&path)
        .unwrap_err();
    assert!(err.to_string().contains("did not pass validation"));
}
