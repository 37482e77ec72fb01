//! Event payloads.

use chrono::{DateTime, Utc};
use planner_core::{Career, EquipSlot, ItemId, LoadoutId, RenownAbility, Side, StatsSummary};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumIter};

/// A slot the import or URL restore could not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSlot {
    pub slot: EquipSlot,
    /// Socket index when the skipped write was a talisman.
    pub talisman_index: Option<usize>,
    pub item: ItemId,
    pub reason: String,
}

/// Closed set of planner notifications.
///
/// Events describe something that already happened; handlers never veto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(EventType), derive(Hash, Display, EnumIter, Serialize, Deserialize))]
pub enum EventPayload {
    ItemUpdated {
        loadout: LoadoutId,
        slot: EquipSlot,
        item: Option<ItemId>,
    },
    TalismanUpdated {
        loadout: LoadoutId,
        slot: EquipSlot,
        index: usize,
        talisman: Option<ItemId>,
    },
    CareerChanged {
        loadout: LoadoutId,
        career: Option<Career>,
    },
    LevelChanged {
        loadout: LoadoutId,
        level: u8,
    },
    RenownRankChanged {
        loadout: LoadoutId,
        renown_rank: u8,
    },
    RenownAbilityChanged {
        loadout: LoadoutId,
        ability: RenownAbility,
        level: u8,
    },
    LoadoutNameChanged {
        loadout: LoadoutId,
        name: String,
    },
    /// A manual edit turned an imported loadout into a regular one.
    CharacterModeExited {
        loadout: LoadoutId,
    },
    StatsUpdated {
        loadout: LoadoutId,
        stats: StatsSummary,
    },
    LoadoutCreated {
        loadout: LoadoutId,
        name: String,
        cloned_from: Option<LoadoutId>,
    },
    LoadoutSwitched {
        loadout: LoadoutId,
        previous: Option<LoadoutId>,
    },
    LoadoutReset {
        loadout: LoadoutId,
    },
    LoadoutRemoved {
        loadout: LoadoutId,
    },
    SideAssigned {
        side: Side,
        loadout: Option<LoadoutId>,
    },
    ActiveSideChanged {
        side: Side,
    },
    CharacterLoaded {
        loadout: LoadoutId,
        side: Side,
        character_name: String,
        skipped: Vec<SkippedSlot>,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> EventType {
        self.into()
    }

    /// Loadout the event is about, if it is about one.
    pub fn loadout(&self) -> Option<LoadoutId> {
        match self {
            Self::ItemUpdated { loadout, .. }
            | Self::TalismanUpdated { loadout, .. }
            | Self::CareerChanged { loadout, .. }
            | Self::LevelChanged { loadout, .. }
            | Self::RenownRankChanged { loadout, .. }
            | Self::RenownAbilityChanged { loadout, .. }
            | Self::LoadoutNameChanged { loadout, .. }
            | Self::CharacterModeExited { loadout }
            | Self::StatsUpdated { loadout, .. }
            | Self::LoadoutCreated { loadout, .. }
            | Self::LoadoutSwitched { loadout, .. }
            | Self::LoadoutReset { loadout }
            | Self::LoadoutRemoved { loadout }
            | Self::CharacterLoaded { loadout, .. } => Some(*loadout),
            Self::SideAssigned { loadout, .. } => *loadout,
            Self::ActiveSideChanged { .. } => None,
        }
    }
}

/// A published event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }
}
