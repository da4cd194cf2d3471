//! `LBDatafile` schema: per-rank tasks and communications.
//!
//! Trace payloads carry many producer-specific fields, so only the shape the
//! communication-link check depends on is enforced and objects stay open.

use super::rules::{array_of, one_of, open_shape, optional, required, typed, LeafType, Rule};
use crate::utils::config::TRACE_KIND;

/// An entity reference: `id` or `seq_id`, `id` authoritative when both exist
pub(crate) fn entity() -> Rule {
    open_shape(vec![
        optional("id", typed(LeafType::Int)),
        optional("seq_id", typed(LeafType::Int)),
    ])
    .with_any_of(&["id", "seq_id"])
}

/// Full schema of a trace file
pub fn trace_schema() -> Rule {
    let task = open_shape(vec![
        required("entity", entity()),
        optional("attributes", typed(LeafType::Object)),
    ]);

    let communication = open_shape(vec![required("from", entity()), required("to", entity())]);

    let phase = open_shape(vec![
        required("id", typed(LeafType::Int)),
        required("tasks", array_of(task)),
        optional("communications", array_of(communication)),
    ]);

    open_shape(vec![
        optional("type", one_of(&[TRACE_KIND])),
        optional(
            "metadata",
            open_shape(vec![
                optional("type", one_of(&[TRACE_KIND])),
                optional("attributes", typed(LeafType::Object)),
            ]),
        ),
        required("phases", array_of(phase)),
    ])
}
