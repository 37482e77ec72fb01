//! Stats aggregation engine.
//!
//! Pure functions from a [`Loadout`](crate::Loadout) snapshot to a
//! [`StatsSummary`] and to per-stat breakdowns. Nothing here mutates a
//! loadout or fails on partial data.

pub mod aggregate;
pub mod contributions;
pub mod renown;
pub mod stat;

pub use aggregate::{
    ActiveSetBonus, Contribution, SourceKind, StatsOptions, active_set_bonuses, compute_stats,
    eligible_items, visit_contributions,
};
pub use contributions::{StatContribution, contributions_for};
pub use renown::{RenownAbility, RenownTable, renown_points_spent, renown_spend_cap};
pub use stat::{Stat, StatDelta, StatsSummary};
