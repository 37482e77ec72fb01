//! Side assignment state.

use std::collections::BTreeMap;

use planner_core::{Career, LoadoutId, Side, SideMap};

/// Which loadout each side shows, plus the per-(side, career) cache.
///
/// The registry is the only writer. Side A and side B never hold the same
/// loadout id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideState {
    pub(crate) active: Side,
    pub(crate) loadouts: SideMap<Option<LoadoutId>>,
    pub(crate) career_cache: SideMap<BTreeMap<Career, LoadoutId>>,
}

impl SideState {
    pub fn active(&self) -> Side {
        self.active
    }

    pub fn loadout(&self, side: Side) -> Option<LoadoutId> {
        self.loadouts[side]
    }

    pub fn cached(&self, side: Side, career: Career) -> Option<LoadoutId> {
        self.career_cache[side].get(&career).copied()
    }

    /// Side currently showing `id`, if any.
    pub fn side_of(&self, id: LoadoutId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.loadouts[*side] == Some(id))
    }

    /// Drops every reference to `id`; returns the sides that were showing it.
    pub(crate) fn forget(&mut self, id: LoadoutId) -> Vec<Side> {
        let mut cleared = Vec::new();
        for side in Side::BOTH {
            if self.loadouts[side] == Some(id) {
                self.loadouts[side] = None;
                cleared.push(side);
            }
            self.career_cache[side].retain(|_, cached| *cached != id);
        }
        cleared
    }
}
