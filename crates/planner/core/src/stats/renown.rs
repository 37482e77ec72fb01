//! Renown abilities and their lookup tables.
//!
//! A renown table maps an allocated ability level straight to the *total*
//! stat value granted at that level. Entries are already cumulative and are
//! looked up, never summed.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::Stat;
use crate::config::PlannerConfig;
use crate::types::Loadout;

/// Purchasable renown abilities.
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
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RenownAbility {
    // Tier I/II
    Might,
    BladeMaster,
    Marksman,
    Impetus,
    Acumen,
    Resolve,
    Fortitude,
    Vigor,

    // Tier III
    Opportunist,
    SureShot,
    FocusedPower,
    SpiritualRefinement,
    Reflexes,
    Defender,
    DeftDefender,
    HardyConcession,
    FutileStrikes,
}

impl RenownAbility {
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// Lookup table for one ability. Index `n` holds the values for level `n`;
/// index 0 is the unallocated level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenownTable {
    pub stat: Stat,
    /// Cumulative stat value per level.
    pub values: Vec<i32>,
    /// Cumulative renown point cost per level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub costs: Vec<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub percentage: bool,
}

impl RenownTable {
    pub fn new(stat: Stat, values: Vec<i32>, costs: Vec<u32>) -> Self {
        Self {
            stat,
            values,
            costs,
            percentage: false,
        }
    }

    pub fn max_level(&self) -> u8 {
        u8::try_from(self.values.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }

    /// Total stat value at `level`. Levels past the table read the last entry.
    pub fn value_at(&self, level: u8) -> i32 {
        lookup(&self.values, level).unwrap_or(0)
    }

    /// Total points spent to reach `level`.
    pub fn cost_at(&self, level: u8) -> u32 {
        lookup(&self.costs, level).unwrap_or(0)
    }
}

fn lookup<T: Copy>(table: &[T], level: u8) -> Option<T> {
    let last = table.len().checked_sub(1)?;
    table.get(usize::from(level).min(last)).copied()
}

/// Renown points a loadout may spend.
///
/// Below the level cap the character level bounds the spend; at the cap the
/// actual renown rank does.
pub fn renown_spend_cap(loadout: &Loadout) -> u32 {
    if loadout.level < PlannerConfig::MAX_LEVEL {
        u32::from(loadout.level)
    } else {
        u32::from(loadout.renown_rank)
    }
}

/// Points currently allocated across every renown ability. Abilities missing
/// from `tables` count as free.
pub fn renown_points_spent(loadout: &Loadout, tables: &crate::RulesTables) -> u32 {
    loadout
        .renown_abilities
        .iter()
        .filter_map(|(ability, level)| tables.renown_table(*ability).map(|t| t.cost_at(*level)))
        .sum()
}
