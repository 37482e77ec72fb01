//! Public planner API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate:
//! the error type and the catalog client contract implementations plug into.

pub mod catalog;
pub mod errors;

pub use catalog::{
    CatalogClient, CatalogError, CharacterDetail, CharacterId, CharacterSummary, EquippedItem,
    ItemConnection, ItemFilter, PageInfo,
};
pub use errors::{PlannerError, Result};
