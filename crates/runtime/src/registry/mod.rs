//! Loadout registry: the arena of loadouts plus the two comparison sides.
//!
//! The registry is plain synchronous state. [`crate::Planner`] owns one behind
//! its lock and turns every registry outcome into events; tests build a
//! fresh registry per case.

mod side;

pub use side::SideState;

use std::collections::BTreeMap;

use planner_core::{Career, Loadout, LoadoutId, PlannerConfig, Side};
use tracing::debug;

use crate::api::{PlannerError, Result};

/// Parameters for [`LoadoutRegistry::create`].
#[derive(Clone, Debug, Default)]
pub struct NewLoadout {
    pub name: String,
    pub level: Option<u8>,
    pub renown_rank: Option<u8>,
    pub is_from_character: bool,
    pub character_name: Option<String>,
}

impl NewLoadout {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn renown_rank(mut self, renown_rank: u8) -> Self {
        self.renown_rank = Some(renown_rank);
        self
    }

    pub fn from_character(mut self, character_name: impl Into<String>) -> Self {
        self.is_from_character = true;
        self.character_name = Some(character_name.into());
        self
    }
}

/// Result of a side assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideAssignment {
    pub side: Side,
    pub loadout: Option<LoadoutId>,
    /// Set when the requested loadout was showing on the other side and a
    /// clone was assigned instead.
    pub cloned_from: Option<LoadoutId>,
}

/// How [`LoadoutRegistry::get_or_create_for_career`] found its loadout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CareerOrigin {
    /// The cached loadout, unchanged.
    Cached,
    /// The cached loadout, with its drifted career forced back.
    Restored,
    /// The cached loadout was shared with the other side; this is a clone.
    Cloned { from: LoadoutId },
    /// An existing loadout already set to the career.
    Adopted,
    /// A brand-new loadout.
    Created,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CareerSelection {
    pub loadout: LoadoutId,
    pub origin: CareerOrigin,
    pub previous: Option<LoadoutId>,
    pub assignment: SideAssignment,
}

/// Result of a removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    pub loadout: Loadout,
    pub cleared_sides: Vec<Side>,
    /// New current loadout when the removed one was current.
    pub new_current: Option<Option<LoadoutId>>,
}

pub struct LoadoutRegistry {
    loadouts: BTreeMap<LoadoutId, Loadout>,
    next_id: u64,
    current: Option<LoadoutId>,
    sides: SideState,
    defaults: PlannerConfig,
}

impl LoadoutRegistry {
    pub fn new(defaults: PlannerConfig) -> Self {
        Self {
            loadouts: BTreeMap::new(),
            next_id: 1,
            current: None,
            sides: SideState::default(),
            defaults,
        }
    }

    // ===== reads =====

    pub fn get(&self, id: LoadoutId) -> Option<&Loadout> {
        self.loadouts.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: LoadoutId) -> Option<&mut Loadout> {
        self.loadouts.get_mut(&id)
    }

    pub fn require(&self, id: LoadoutId) -> Result<&Loadout> {
        self.get(id).ok_or(PlannerError::UnknownLoadout(id))
    }

    pub fn current_id(&self) -> Option<LoadoutId> {
        self.current
    }

    pub fn current(&self) -> Option<&Loadout> {
        self.current.and_then(|id| self.get(id))
    }

    /// Every loadout in id order.
    pub fn list(&self) -> impl Iterator<Item = &Loadout> {
        self.loadouts.values()
    }

    pub fn len(&self) -> usize {
        self.loadouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loadouts.is_empty()
    }

    pub fn sides(&self) -> &SideState {
        &self.sides
    }

    pub fn active_side(&self) -> Side {
        self.sides.active
    }

    pub fn side_loadout(&self, side: Side) -> Option<LoadoutId> {
        self.sides.loadout(side)
    }

    pub fn career_cache(&self, side: Side, career: Career) -> Option<LoadoutId> {
        self.sides.cached(side, career)
    }

    // ===== arena =====

    /// Creates a loadout with every slot empty. The first loadout ever
    /// created becomes current.
    pub fn create(&mut self, spec: NewLoadout) -> LoadoutId {
        let id = LoadoutId(self.next_id);
        self.next_id += 1;

        let mut loadout = Loadout::new(
            id,
            spec.name,
            spec.level.unwrap_or(self.defaults.default_level),
            spec.renown_rank.unwrap_or(self.defaults.default_renown_rank),
        );
        loadout.is_from_character = spec.is_from_character;
        loadout.character_name = spec.character_name;
        self.loadouts.insert(id, loadout);

        if self.current.is_none() {
            self.current = Some(id);
        }
        debug!(loadout = %id, "created loadout");
        id
    }

    /// Makes `id` current; returns the previous current loadout.
    pub fn switch_current(&mut self, id: LoadoutId) -> Result<Option<LoadoutId>> {
        self.require(id)?;
        Ok(self.current.replace(id))
    }

    /// Deep-copies a loadout's build under a new id.
    pub fn clone_loadout(&mut self, source: LoadoutId, name: Option<String>) -> Result<LoadoutId> {
        let source = self.require(source)?;
        let name = name.unwrap_or_else(|| format!("{} (copy)", source.name));
        let id = LoadoutId(self.next_id);
        let copy = source.duplicate(id, name);
        self.next_id += 1;
        self.loadouts.insert(id, copy);
        debug!(loadout = %id, "cloned loadout");
        Ok(id)
    }

    /// Returns the loadout to a fresh state, keeping its id and cache entries.
    ///
    /// A loadout showing on a side is renamed after the side ("Side A");
    /// any other loadout keeps its name.
    pub fn reset(&mut self, id: LoadoutId) -> Result<()> {
        let name = match self.sides.side_of(id) {
            Some(side) => side.default_name(),
            None => self.require(id)?.name.clone(),
        };
        let fresh = Loadout::new(
            id,
            name,
            self.defaults.default_level,
            self.defaults.default_renown_rank,
        );
        let loadout = self.get_mut(id).ok_or(PlannerError::UnknownLoadout(id))?;
        *loadout = fresh;
        Ok(())
    }

    /// Drops a loadout along with every side pointer and cache entry that
    /// referenced it. When it was current, the lowest remaining id becomes
    /// current.
    pub fn remove(&mut self, id: LoadoutId) -> Result<Removal> {
        let loadout = self
            .loadouts
            .remove(&id)
            .ok_or(PlannerError::UnknownLoadout(id))?;
        let cleared_sides = self.sides.forget(id);
        let new_current = if self.current == Some(id) {
            self.current = self.loadouts.keys().next().copied();
            Some(self.current)
        } else {
            None
        };
        debug!(loadout = %id, "removed loadout");
        Ok(Removal {
            loadout,
            cleared_sides,
            new_current,
        })
    }

    // ===== sides =====

    /// Returns whether the active side changed.
    pub fn set_active_side(&mut self, side: Side) -> bool {
        let changed = self.sides.active != side;
        self.sides.active = side;
        changed
    }

    /// Shows `id` (or nothing) on `side`.
    ///
    /// A loadout already showing on the other side is cloned and the clone is
    /// assigned, so the two sides never share a loadout.
    pub fn assign_side(&mut self, side: Side, id: Option<LoadoutId>) -> Result<SideAssignment> {
        let Some(requested) = id else {
            self.sides.loadouts[side] = None;
            return Ok(SideAssignment {
                side,
                loadout: None,
                cloned_from: None,
            });
        };
        self.require(requested)?;

        let (assigned, cloned_from) = if self.sides.loadouts[side.other()] == Some(requested) {
            (self.clone_loadout(requested, None)?, Some(requested))
        } else {
            (requested, None)
        };
        self.sides.loadouts[side] = Some(assigned);
        Ok(SideAssignment {
            side,
            loadout: Some(assigned),
            cloned_from,
        })
    }

    /// The side's loadout, creating and assigning a default-named one when
    /// the side is empty. The flag reports whether one was created.
    pub fn ensure_side(&mut self, side: Side) -> Result<(LoadoutId, bool)> {
        if let Some(id) = self.sides.loadout(side)
            && self.loadouts.contains_key(&id)
        {
            return Ok((id, false));
        }
        let id = self.create(NewLoadout::named(side.default_name()));
        self.assign_side(side, Some(id))?;
        Ok((id, true))
    }

    pub(crate) fn cache_career(&mut self, side: Side, career: Career, id: LoadoutId) {
        self.sides.career_cache[side].insert(career, id);
    }

    /// Picks the active side's loadout for `career`.
    ///
    /// In order:
    /// 1. a cached loadout that the other side also caches for this career
    ///    is cloned, so neither side inherits the other's edits;
    /// 2. a cached loadout is reused, its career forced back if it drifted;
    /// 3. an uncached loadout already set to the career is adopted, unless
    ///    the other side claims it;
    /// 4. otherwise a new loadout is created at the current loadout's level
    ///    and renown rank, falling back to the active side's loadout.
    ///
    /// The result is assigned to the active side, cached for
    /// (active side, career) and made current.
    pub fn get_or_create_for_career(&mut self, career: Career) -> Result<CareerSelection> {
        let active = self.sides.active;
        let other = active.other();
        let cached = self
            .sides
            .cached(active, career)
            .filter(|id| self.loadouts.contains_key(id));

        let (candidate, origin) = match cached {
            Some(id) if self.sides.cached(other, career) == Some(id) => {
                let clone = self.clone_loadout(id, None)?;
                (clone, CareerOrigin::Cloned { from: id })
            }
            Some(id) => {
                let loadout = self.get_mut(id).ok_or(PlannerError::UnknownLoadout(id))?;
                if loadout.career == Some(career) {
                    (id, CareerOrigin::Cached)
                } else {
                    loadout.career = Some(career);
                    (id, CareerOrigin::Restored)
                }
            }
            None => match self.adoptable(career, other) {
                Some(id) => (id, CareerOrigin::Adopted),
                None => {
                    let (level, renown_rank) = self
                        .current()
                        .or_else(|| self.sides.loadout(active).and_then(|id| self.get(id)))
                        .map_or(
                            (self.defaults.default_level, self.defaults.default_renown_rank),
                            |loadout| (loadout.level, loadout.renown_rank),
                        );
                    let id = self.create(
                        NewLoadout::named(active.default_name())
                            .level(level)
                            .renown_rank(renown_rank),
                    );
                    if let Some(loadout) = self.get_mut(id) {
                        loadout.career = Some(career);
                    }
                    (id, CareerOrigin::Created)
                }
            },
        };

        let assignment = self.assign_side(active, Some(candidate))?;
        let loadout = assignment.loadout.unwrap_or(candidate);
        self.cache_career(active, career, loadout);
        let previous = self.switch_current(loadout)?;
        debug!(side = %active, %career, loadout = %loadout, ?origin, "selected career loadout");

        Ok(CareerSelection {
            loadout,
            origin,
            previous,
            assignment,
        })
    }

    fn adoptable(&self, career: Career, other: Side) -> Option<LoadoutId> {
        let claimed = self.sides.cached(other, career);
        let showing = self.sides.loadout(other);
        self.loadouts
            .values()
            .filter(|loadout| loadout.career == Some(career))
            .map(|loadout| loadout.id)
            .find(|id| Some(*id) != claimed && Some(*id) != showing)
    }
}

impl Default for LoadoutRegistry {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
