//! Communication-link referential check.
//!
//! Phases are aligned by position across the records of a dataset. For each
//! phase, every `from`/`to` endpoint of every communication on any rank must
//! name a task present on some rank in that phase. Checking stops at the
//! first failing phase: one dataset-level integrity failure is enough to
//! reject the dataset.

use crate::utils::error::{render_ids, DatasetError};
use log::debug;
use serde_json::Value;
use std::collections::BTreeSet;

/// Verify that communications only reference known tasks
///
/// **Public** - main entry point for the consistency check
///
/// # Errors
/// * `DatasetError::ReferentialIntegrity` - first phase with unknown
///   endpoints, with the full missing id set
/// * `DatasetError::MalformedDataset` - a record lacks the structure the
///   check reads (phases, entity ids)
pub fn check_comm_links(records: &[&Value]) -> Result<(), DatasetError> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let phase_count = phases_of(first, 0)?.len();

    for n in 0..phase_count {
        let mut task_ids = BTreeSet::new();
        let mut comm_ids = BTreeSet::new();

        for (index, record) in records.iter().enumerate() {
            let phase = phases_of(record, index)?.get(n).ok_or_else(|| {
                DatasetError::MalformedDataset {
                    record: index,
                    detail: format!("phase {n} is missing"),
                }
            })?;

            if let Some(tasks) = phase.get("tasks").and_then(Value::as_array) {
                for task in tasks {
                    task_ids.insert(entity_id(task.get("entity"), index, n, "task")?);
                }
            }

            if let Some(comms) = phase.get("communications").and_then(Value::as_array) {
                for comm in comms {
                    comm_ids.insert(entity_id(comm.get("from"), index, n, "communication from")?);
                    comm_ids.insert(entity_id(comm.get("to"), index, n, "communication to")?);
                }
            }
        }

        let missing: BTreeSet<i64> = comm_ids.difference(&task_ids).copied().collect();
        if !missing.is_empty() {
            debug!("Phase {}: unknown endpoint(s) {}", n, render_ids(&missing));
            return Err(DatasetError::ReferentialIntegrity { phase: n, missing });
        }
        debug!(
            "Phase {}: {} communication endpoint(s) resolve to {} task(s)",
            n,
            comm_ids.len(),
            task_ids.len()
        );
    }

    Ok(())
}

/// Boolean form of [`check_comm_links`]
pub fn comm_links_valid(records: &[&Value]) -> bool {
    check_comm_links(records).is_ok()
}

fn phases_of(record: &Value, index: usize) -> Result<&Vec<Value>, DatasetError> {
    record
        .get("phases")
        .and_then(Value::as_array)
        .ok_or_else(|| DatasetError::MalformedDataset {
            record: index,
            detail: "no phases array".to_string(),
        })
}

/// Authoritative id of an entity reference: `id`, else `seq_id`
fn entity_id(
    entity: Option<&Value>,
    record: usize,
    phase: usize,
    role: &str,
) -> Result<i64, DatasetError> {
    entity
        .and_then(|e| e.get("id").or_else(|| e.get("seq_id")))
        .and_then(Value::as_i64)
        .ok_or_else(|| DatasetError::MalformedDataset {
            record,
            detail: format!("phase {phase}: {role} entity has no integer id or seq_id"),
        })
}
