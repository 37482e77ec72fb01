//! Deterministic gear-planner rules shared by the runtime and tooling.
//!
//! `planner-core` defines the data model (items, slots, loadouts, sides), the
//! equip validator, the stats aggregation engine and the URL wire codec. All
//! of it is pure: functions take a loadout snapshot plus injected
//! [`RulesTables`] and return values or [`EquipError`]s. Stateful concerns
//! (registry, events, catalog access) live in `planner-runtime`.
pub mod config;
pub mod error;
pub mod stats;
pub mod tables;
pub mod types;
pub mod url_state;
pub mod validate;

pub use config::PlannerConfig;
pub use error::{EquipError, ErrorSeverity, PlannerErrorKind};
pub use stats::{
    ActiveSetBonus, Contribution, RenownAbility, RenownTable, SourceKind, Stat, StatContribution,
    StatDelta, StatsOptions, StatsSummary, active_set_bonuses, compute_stats, contributions_for,
    eligible_items, renown_points_spent, renown_spend_cap, visit_contributions,
};
pub use tables::RulesTables;
pub use types::{
    Career, EquipSlot, Item, ItemAbility, ItemId, ItemRarity, ItemSet, ItemStat, ItemType,
    Loadout, LoadoutId, LoadoutItem, Race, Realm, SetBonus, SetBonusEffect, SetId, Side, SideMap,
    SlotCategory,
};
pub use url_state::{SideUrlState, UrlState};
pub use validate::{
    DpsTier, EquipTarget, TwoHandedRule, can_equip_by_restriction, can_equip_unique,
    can_equip_weapon_slot, check_socket, validate_item, validate_talisman,
};
