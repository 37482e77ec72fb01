//! Stat identifiers and the aggregate summary.

use std::collections::BTreeMap;

use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Every stat the planner aggregates.
///
/// Percentage stats (crit rates, defenses, ...) share the same bucket as any
/// flat contribution to the same stat: the item entry's `percentage` flag is
/// display metadata, not a separate bucket.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stat {
    // Primary
    Strength,
    BallisticSkill,
    Intelligence,
    Toughness,
    WeaponSkill,
    Initiative,
    Willpower,
    Wounds,

    // Defense
    Armor,
    SpiritResistance,
    ElementalResistance,
    CorporealResistance,
    Block,
    Parry,
    Evade,
    Disrupt,
    CriticalHitRateReduction,

    // Offense
    MeleePower,
    RangedPower,
    MagicPower,
    HealingPower,
    MeleeCritRate,
    RangedCritRate,
    MagicCritRate,
    HealCritRate,
    CriticalDamage,
    ArmorPenetration,

    // Utility
    ActionPointRegen,
    MoraleRegen,
    OutgoingHealing,
    IncomingHealing,
}

impl Stat {
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// Aggregate stat values for one loadout.
///
/// Every [`Stat`] is always present; absent contributions read as zero. The
/// summary is derived data: it is recomputed from a loadout, never edited.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSummary {
    values: BTreeMap<Stat, i32>,
}

impl StatsSummary {
    pub fn new() -> Self {
        Self {
            values: Stat::iter().map(|stat| (stat, 0)).collect(),
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.values.get(&stat).copied().unwrap_or(0)
    }

    pub(crate) fn add(&mut self, stat: Stat, value: i32) {
        let slot = self.values.entry(stat).or_insert(0);
        *slot = slot.saturating_add(value);
    }

    /// Iterates every stat in declaration order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        self.values.iter().map(|(stat, value)| (*stat, *value))
    }

    /// Stats whose value differs between `self` (left) and `other` (right).
    pub fn diff(&self, other: &StatsSummary) -> Vec<StatDelta> {
        Stat::iter()
            .filter_map(|stat| {
                let left = self.get(stat);
                let right = other.get(stat);
                (left != right).then_some(StatDelta { stat, left, right })
            })
            .collect()
    }
}

impl Default for StatsSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// One differing stat between two summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatDelta {
    pub stat: Stat,
    pub left: i32,
    pub right: i32,
}

impl StatDelta {
    /// `right - left`.
    pub fn delta(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }
}
