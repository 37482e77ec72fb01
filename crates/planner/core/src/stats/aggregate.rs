//! Loadout → stats aggregation.
//!
//! ```text
//! [ Eligibility ]          level / renown requirement gate per item and talisman
//!      ↓
//! [ Raw accumulation ]     armor + stat lines of eligible items and talismans
//!      ↓
//! [ Set bonuses ]          grouped by set id, each met threshold applied once
//!      ↓
//! [ Renown ]               cumulative table lookup (optional)
//! ```
//!
//! The summary and the per-source breakdown share one traversal
//! ([`visit_contributions`]) so a breakdown always adds up to its total.

use std::collections::BTreeMap;

use super::{RenownAbility, Stat, StatsSummary};
use crate::tables::RulesTables;
use crate::types::{Item, ItemSet, Loadout, SetBonusEffect, SetId};

/// Options for [`compute_stats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsOptions {
    pub include_renown: bool,
}

impl StatsOptions {
    pub const fn without_renown() -> Self {
        Self {
            include_renown: false,
        }
    }
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            include_renown: true,
        }
    }
}

/// Where a contribution comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceKind {
    Item,
    Talisman,
    SetBonus,
    Renown,
}

/// A single stat contribution produced by the traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub source: String,
    /// Ordinal of the equipped item, talisman, set threshold or renown ability
    /// that produced this line; unique within one traversal.
    pub instance: usize,
    pub kind: SourceKind,
    pub stat: Stat,
    pub value: i32,
    pub percentage: bool,
}

/// One set-bonus threshold that is currently met.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSetBonus<'a> {
    pub set: &'a ItemSet,
    pub pieces: usize,
    pub items_required: u8,
    pub effect: &'a SetBonusEffect,
}

impl ActiveSetBonus<'_> {
    /// Display name of the pseudo-source (`"Conqueror #12 (2 pieces)"`).
    ///
    /// Carries the set id so same-named sets stay apart.
    pub fn source_name(&self) -> String {
        format!("{} #{} ({} pieces)", self.set.name, self.set.id, self.items_required)
    }
}

/// Items of `loadout` whose requirements are met, in slot order.
pub fn eligible_items(loadout: &Loadout) -> impl Iterator<Item = (&Item, Vec<&Item>)> {
    let (level, renown) = (loadout.level, loadout.renown_rank);
    loadout
        .equipped()
        .filter(move |(_, _, item)| item.is_eligible(level, renown))
        .map(move |(_, entry, item)| {
            let talismans = entry
                .talismans
                .iter()
                .flatten()
                .filter(|talisman| talisman.is_eligible(level, renown))
                .collect();
            (item, talismans)
        })
}

/// Set thresholds met by the eligible items of `loadout`.
///
/// Pieces are grouped by set id; two sets that merely share a name never
/// pool their pieces. Every threshold whose requirement is met is listed
/// once, however many pieces exceed it.
pub fn active_set_bonuses(loadout: &Loadout) -> Vec<ActiveSetBonus<'_>> {
    let mut sets: BTreeMap<SetId, (&ItemSet, usize)> = BTreeMap::new();
    for (item, _) in eligible_items(loadout) {
        if let Some(set) = item.item_set.as_ref() {
            sets.entry(set.id).or_insert((set, 0)).1 += 1;
        }
    }

    sets.into_values()
        .flat_map(|(set, pieces)| {
            set.bonuses
                .iter()
                .filter(move |bonus| usize::from(bonus.items_required) <= pieces)
                .map(move |bonus| ActiveSetBonus {
                    set,
                    pieces,
                    items_required: bonus.items_required,
                    effect: &bonus.bonus,
                })
        })
        .collect()
}

/// Walks every stat contribution of `loadout`.
pub fn visit_contributions(
    loadout: &Loadout,
    tables: &RulesTables,
    options: StatsOptions,
    mut visit: impl FnMut(Contribution),
) {
    let mut instance = 0;
    let mut next_instance = || {
        instance += 1;
        instance
    };

    for (item, talismans) in eligible_items(loadout) {
        emit_item(item, SourceKind::Item, next_instance(), &mut visit);
        for talisman in talismans {
            emit_item(talisman, SourceKind::Talisman, next_instance(), &mut visit);
        }
    }

    for bonus in active_set_bonuses(loadout) {
        let instance = next_instance();
        if let SetBonusEffect::Stat(line) = bonus.effect {
            visit(Contribution {
                source: bonus.source_name(),
                instance,
                kind: SourceKind::SetBonus,
                stat: line.stat,
                value: line.value,
                percentage: line.percentage,
            });
        }
    }

    if options.include_renown {
        for (ability, level) in &loadout.renown_abilities {
            if *level == 0 {
                continue;
            }
            if let Some(table) = tables.renown_table(*ability) {
                visit(Contribution {
                    source: renown_source_name(*ability),
                    instance: next_instance(),
                    kind: SourceKind::Renown,
                    stat: table.stat,
                    value: table.value_at(*level),
                    percentage: table.percentage,
                });
            }
        }
    }
}

fn emit_item(item: &Item, kind: SourceKind, instance: usize, visit: &mut impl FnMut(Contribution)) {
    if item.armor > 0 {
        visit(Contribution {
            source: item.name.clone(),
            instance,
            kind,
            stat: Stat::Armor,
            value: i32::try_from(item.armor).unwrap_or(i32::MAX),
            percentage: false,
        });
    }
    for line in &item.stats {
        visit(Contribution {
            source: item.name.clone(),
            instance,
            kind,
            stat: line.stat,
            value: line.value,
            percentage: line.percentage,
        });
    }
}

pub(crate) fn renown_source_name(ability: RenownAbility) -> String {
    format!("Renown: {ability}")
}

/// Aggregate stats of `loadout`.
///
/// Ineligible items stay equipped but add nothing. Missing data never fails:
/// an empty loadout yields an all-zero summary.
pub fn compute_stats(loadout: &Loadout, tables: &RulesTables, options: StatsOptions) -> StatsSummary {
    let mut summary = StatsSummary::new();
    visit_contributions(loadout, tables, options, |c| summary.add(c.stat, c.value));
    summary
}
