//! Data-driven planner content and loaders.
//!
//! This crate houses the static data the planner rules consume and the demo
//! catalog served by the in-memory catalog client:
//! - Career → races table (RON)
//! - Renown ability tables (RON)
//! - Two-handed weapon calibration (TOML)
//! - Demo item catalog and character sheets (RON)
//!
//! The same files are embedded in the binary (see [`builtin`]) so tests and
//! tools work without a data directory. Content is injected into the rules
//! engine as [`planner_core::RulesTables`] and never appears in loadout state.

pub mod builtin;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogData, CatalogLoader, CharacterSheet, ContentFactory, RulesLoader, SheetSlot,
};
