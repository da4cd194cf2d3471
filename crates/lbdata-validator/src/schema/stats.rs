//! `LBStatsfile` schema: per-phase load-balancing statistics.

use super::rules::{
    array_of, fixed_shape, one_of, optional, required, typed, Field, LeafType, Rule,
};
use crate::utils::config::{OPTIONAL_STAT_GROUPS, REQUIRED_STAT_GROUPS, STATS_KIND, STAT_FIELDS};

/// Eleven-statistic summary, closed
pub(crate) fn stat_block() -> Rule {
    fixed_shape(
        STAT_FIELDS
            .iter()
            .map(|name| required(*name, typed(LeafType::Float)))
            .collect(),
    )
}

/// Named stat groups, closed
pub(crate) fn stats_bundle() -> Rule {
    let required_groups = REQUIRED_STAT_GROUPS
        .iter()
        .map(|group| required(*group, stat_block()));
    let optional_groups = OPTIONAL_STAT_GROUPS
        .iter()
        .map(|group| optional(*group, stat_block()));

    fixed_shape(required_groups.chain(optional_groups).collect())
}

fn kind_field() -> Field {
    optional("type", one_of(&[STATS_KIND]))
}

/// Full schema of a stats file
pub fn stats_schema() -> Rule {
    let phase = fixed_shape(vec![
        required("id", typed(LeafType::Int)),
        optional("migration count", typed(LeafType::Int)),
        required("pre-LB", stats_bundle()),
        optional("post-LB", stats_bundle()),
    ]);

    fixed_shape(vec![
        kind_field(),
        optional(
            "metadata",
            fixed_shape(vec![
                kind_field(),
                optional("attributes", typed(LeafType::Object)),
            ]),
        ),
        required("phases", array_of(phase)),
    ])
}
