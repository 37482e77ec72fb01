//! Per-source breakdown of a single stat.

use std::collections::{BTreeMap, BTreeSet};

use super::{Stat, StatsOptions, visit_contributions};
use crate::tables::RulesTables;
use crate::types::Loadout;

/// How much one named source adds to a stat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatContribution {
    pub source_name: String,
    /// Number of contributing instances sharing the name (e.g. the same
    /// talisman socketed twice). An instance with several lines for the stat
    /// counts once.
    pub instance_count: usize,
    pub total_value: i32,
    pub is_percentage: bool,
}

/// Breaks the total of `stat` down by source.
///
/// Sources netting to zero are dropped. Order: `total_value` descending, then
/// `source_name` ascending.
pub fn contributions_for(
    loadout: &Loadout,
    stat: Stat,
    tables: &RulesTables,
    options: StatsOptions,
) -> Vec<StatContribution> {
    let mut buckets: BTreeMap<String, StatContribution> = BTreeMap::new();
    let mut counted = BTreeSet::new();
    visit_contributions(loadout, tables, options, |contribution| {
        if contribution.stat != stat {
            return;
        }
        let entry = buckets
            .entry(contribution.source.clone())
            .or_insert_with(|| StatContribution {
                source_name: contribution.source,
                instance_count: 0,
                total_value: 0,
                is_percentage: contribution.percentage,
            });
        if counted.insert(contribution.instance) {
            entry.instance_count += 1;
        }
        entry.total_value = entry.total_value.saturating_add(contribution.value);
    });

    let mut list: Vec<_> = buckets
        .into_values()
        .filter(|entry| entry.total_value != 0)
        .collect();
    list.sort_by(|a, b| {
        b.total_value
            .cmp(&a.total_value)
            .then_with(|| a.source_name.cmp(&b.source_name))
    });
    list
}
