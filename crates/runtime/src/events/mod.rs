//! Typed event bus for planner notifications.
//!
//! Every façade write and registry operation publishes one or more
//! [`EventPayload`]s after the planner's state lock is released, so handlers
//! may read the planner freely.

mod bus;
mod types;

pub use bus::{EventBus, Handler, Subscription};
pub use types::{Event, EventPayload, EventType, SkippedSlot};
