//! Runtime orchestration for the two-sided loadout planner.
//!
//! This crate owns the mutable side of the planner: the loadout registry, the
//! mutation façade every write goes through, the event bus, and the catalog
//! access used by character imports. Consumers build a [`Planner`], subscribe
//! to its [`EventBus`], and drive imports through a [`CharacterImporter`].
//!
//! Modules are organized by responsibility:
//! - [`planner`] hosts the façade, its builder and bulk-apply scopes
//! - [`registry`] keeps the loadout arena and side state
//! - [`api`] exposes the error type and the catalog client contract
//! - [`events`] provides the typed event bus
//! - [`catalog`] implements catalog clients and the item cache
//! - [`import`] loads catalog characters and URL queries into the planner
pub mod api;
pub mod catalog;
pub mod events;
pub mod import;
pub mod planner;
pub mod registry;

pub use api::{
    CatalogClient, CatalogError, CharacterDetail, CharacterId, CharacterSummary, EquippedItem,
    ItemConnection, ItemFilter, PageInfo, PlannerError, Result,
};
pub use catalog::{InMemoryCatalog, ItemCache};
pub use events::{Event, EventBus, EventPayload, EventType, Handler, SkippedSlot, Subscription};
pub use import::{CharacterImporter, ImportReport, RestoreReport};
pub use planner::{BulkApply, Planner, PlannerBuilder, RuntimeConfig, SideComparison, UrlSync};
pub use registry::{
    CareerOrigin, CareerSelection, LoadoutRegistry, NewLoadout, Removal, SideAssignment,
    SideState,
};
