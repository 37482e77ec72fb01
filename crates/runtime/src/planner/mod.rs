//! Mutation façade: the only write path into planner state.
//!
//! [`Planner`] owns the [`LoadoutRegistry`] behind a lock that is never held
//! across an `.await`. Every write runs the same pipeline:
//!
//! 1. validate and apply the edit
//! 2. drop character mode, unless the write came through a [`BulkApply`]
//! 3. recompute stats
//! 4. release the lock and publish the events
//! 5. push the URL query to the [`UrlSync`], unless a bulk scope is open
mod bulk;
mod writes;

pub use bulk::BulkApply;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use planner_core::url_state::{self, SideUrlState, UrlState};
use planner_core::{
    Career, EquipSlot, Item, Loadout, LoadoutId, PlannerConfig, RenownAbility, RulesTables, Side,
    Stat, StatContribution, StatDelta, StatsOptions, StatsSummary, compute_stats,
    contributions_for, renown_points_spent, renown_spend_cap,
};
use tracing::{debug, info};

use crate::api::{PlannerError, Result};
use crate::events::{EventBus, EventPayload};
use crate::registry::{CareerOrigin, LoadoutRegistry, NewLoadout, SideAssignment};
use writes::Edit;

/// Runtime configuration
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub planner: PlannerConfig,
    /// Items kept by the item-detail cache
    pub item_cache_capacity: usize,
    /// Events buffered for async stream consumers
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            item_cache_capacity: 200,
            event_buffer_size: 100,
        }
    }
}

/// Receives the URL query string whenever the side state should be
/// reflected in the address bar.
pub trait UrlSync: Send + Sync {
    fn replace_query(&self, query: &str);
}

impl<F> UrlSync for F
where
    F: Fn(&str) + Send + Sync,
{
    fn replace_query(&self, query: &str) {
        self(query)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WriteOrigin {
    User,
    Bulk,
}

/// Stats of both sides and where they differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideComparison {
    pub a: LoadoutId,
    pub b: LoadoutId,
    pub a_stats: StatsSummary,
    pub b_stats: StatsSummary,
    /// Differing stats; `left` is side A.
    pub deltas: Vec<StatDelta>,
}

/// Provisional side claim taken by a character import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ImportClaim {
    pub side: Side,
    pub loadout: LoadoutId,
    pub previous_side: Option<LoadoutId>,
    pub previous_current: Option<LoadoutId>,
}

/// Where a released claim would have handed the side and the current
/// pointer back to.
#[derive(Clone, Copy, Debug)]
struct ReleasedClaim {
    side: Option<LoadoutId>,
    current: Option<LoadoutId>,
}

struct PlannerState {
    registry: LoadoutRegistry,
    bulk_depth: usize,
    /// Released provisional loadouts, so a claim taken on top of one can
    /// still find a live loadout to restore.
    released: BTreeMap<LoadoutId, ReleasedClaim>,
}

impl PlannerState {
    /// Follows released claims from `start` until a live loadout is found.
    fn live_fallback(
        &self,
        start: Option<LoadoutId>,
        next: impl Fn(&ReleasedClaim) -> Option<LoadoutId>,
    ) -> Option<LoadoutId> {
        let mut candidate = start;
        for _ in 0..=self.released.len() {
            let id = candidate?;
            if self.registry.get(id).is_some() {
                return Some(id);
            }
            candidate = self.released.get(&id).and_then(&next);
        }
        None
    }
}

struct PlannerInner {
    state: RwLock<PlannerState>,
    tables: Arc<RulesTables>,
    events: EventBus,
    url_sync: Option<Arc<dyn UrlSync>>,
    config: RuntimeConfig,
}

/// One state transaction: registry access plus the events it produced.
struct Tx<'a> {
    state: &'a mut PlannerState,
    events: Vec<EventPayload>,
    resync: bool,
}

impl Tx<'_> {
    fn registry(&mut self) -> &mut LoadoutRegistry {
        &mut self.state.registry
    }

    fn emit(&mut self, payload: EventPayload) {
        self.events.push(payload);
    }

    fn resync(&mut self) {
        self.resync = true;
    }

    fn assigned(&mut self, assignment: SideAssignment) {
        if let (Some(from), Some(clone)) = (assignment.cloned_from, assignment.loadout) {
            let name = self.registry_name(clone);
            self.emit(EventPayload::LoadoutCreated {
                loadout: clone,
                name,
                cloned_from: Some(from),
            });
        }
        info!(side = %assignment.side, loadout = ?assignment.loadout, "assigned side");
        self.emit(EventPayload::SideAssigned {
            side: assignment.side,
            loadout: assignment.loadout,
        });
        self.resync();
    }

    fn created(&mut self, id: LoadoutId, cloned_from: Option<LoadoutId>) {
        let name = self.registry_name(id);
        self.emit(EventPayload::LoadoutCreated {
            loadout: id,
            name,
            cloned_from,
        });
    }

    fn switched(&mut self, loadout: LoadoutId, previous: Option<LoadoutId>) {
        if previous != Some(loadout) {
            self.emit(EventPayload::LoadoutSwitched { loadout, previous });
        }
    }

    fn stats(&mut self, id: LoadoutId, tables: &RulesTables) {
        if let Some(loadout) = self.state.registry.get(id) {
            let stats = compute_stats(loadout, tables, StatsOptions::default());
            self.emit(EventPayload::StatsUpdated { loadout: id, stats });
        }
    }

    fn registry_name(&self, id: LoadoutId) -> String {
        self.state
            .registry
            .get(id)
            .map(|loadout| loadout.name.clone())
            .unwrap_or_default()
    }
}

/// Cloneable façade over the loadout registry
///
/// Design: reads return owned snapshots; writes publish events only after the
/// state lock is released, so handlers may call back into the planner.
#[derive(Clone)]
pub struct Planner {
    inner: Arc<PlannerInner>,
}

impl Planner {
    /// Create a new planner builder
    pub fn builder() -> PlannerBuilder {
        PlannerBuilder::new()
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn tables(&self) -> &RulesTables {
        &self.inner.tables
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    // ===== reads =====

    pub fn loadout(&self, id: LoadoutId) -> Result<Loadout> {
        self.read(|registry| registry.require(id).cloned())
    }

    pub fn current_loadout_id(&self) -> Result<Option<LoadoutId>> {
        self.read(|registry| Ok(registry.current_id()))
    }

    pub fn current_loadout(&self) -> Result<Option<Loadout>> {
        self.read(|registry| Ok(registry.current().cloned()))
    }

    /// Every loadout in id order.
    pub fn loadouts(&self) -> Result<Vec<Loadout>> {
        self.read(|registry| Ok(registry.list().cloned().collect()))
    }

    pub fn active_side(&self) -> Result<Side> {
        self.read(|registry| Ok(registry.active_side()))
    }

    pub fn side_loadout_id(&self, side: Side) -> Result<Option<LoadoutId>> {
        self.read(|registry| Ok(registry.side_loadout(side)))
    }

    pub fn career_cache(&self, side: Side, career: Career) -> Result<Option<LoadoutId>> {
        self.read(|registry| Ok(registry.career_cache(side, career)))
    }

    pub fn stats(&self, id: LoadoutId, options: StatsOptions) -> Result<StatsSummary> {
        let tables = &self.inner.tables;
        self.read(|registry| Ok(compute_stats(registry.require(id)?, tables, options)))
    }

    /// Per-source breakdown of `stat` for a loadout, renown included.
    pub fn contributions(&self, id: LoadoutId, stat: Stat) -> Result<Vec<StatContribution>> {
        let tables = &self.inner.tables;
        self.read(|registry| {
            Ok(contributions_for(
                registry.require(id)?,
                stat,
                tables,
                StatsOptions::default(),
            ))
        })
    }

    pub fn renown_spend_cap(&self, id: LoadoutId) -> Result<u32> {
        self.read(|registry| Ok(renown_spend_cap(registry.require(id)?)))
    }

    pub fn renown_points_spent(&self, id: LoadoutId) -> Result<u32> {
        let tables = &self.inner.tables;
        self.read(|registry| Ok(renown_points_spent(registry.require(id)?, tables)))
    }

    /// `None` unless both sides show a loadout.
    pub fn compare_sides(&self) -> Result<Option<SideComparison>> {
        let tables = &self.inner.tables;
        self.read(|registry| {
            let (Some(a), Some(b)) = (
                registry.side_loadout(Side::A),
                registry.side_loadout(Side::B),
            ) else {
                return Ok(None);
            };
            let a_stats = compute_stats(registry.require(a)?, tables, StatsOptions::default());
            let b_stats = compute_stats(registry.require(b)?, tables, StatsOptions::default());
            let deltas = a_stats.diff(&b_stats);
            Ok(Some(SideComparison {
                a,
                b,
                a_stats,
                b_stats,
                deltas,
            }))
        })
    }

    /// The URL query string for the current side state.
    pub fn url_query(&self) -> Result<String> {
        self.read(|registry| Ok(encode_sides(registry)))
    }

    pub fn is_bulk_applying(&self) -> Result<bool> {
        Ok(self.read_state()?.bulk_depth > 0)
    }

    // ===== loadout writes =====

    pub fn set_item(&self, slot: EquipSlot, item: Option<Item>) -> Result<()> {
        self.set_item_for(self.require_current()?, slot, item)
    }

    pub fn set_item_for(&self, id: LoadoutId, slot: EquipSlot, item: Option<Item>) -> Result<()> {
        self.write(id, WriteOrigin::User, Edit::Item { slot, item })
    }

    pub fn set_talisman(&self, slot: EquipSlot, index: usize, talisman: Option<Item>) -> Result<()> {
        self.set_talisman_for(self.require_current()?, slot, index, talisman)
    }

    pub fn set_talisman_for(
        &self,
        id: LoadoutId,
        slot: EquipSlot,
        index: usize,
        talisman: Option<Item>,
    ) -> Result<()> {
        self.write(
            id,
            WriteOrigin::User,
            Edit::Talisman {
                slot,
                index,
                talisman,
            },
        )
    }

    pub fn set_career(&self, career: Option<Career>) -> Result<()> {
        self.set_career_for(self.require_current()?, career)
    }

    pub fn set_career_for(&self, id: LoadoutId, career: Option<Career>) -> Result<()> {
        self.write(id, WriteOrigin::User, Edit::Career(career))
    }

    /// Clamped to 1..=40.
    pub fn set_level(&self, level: u8) -> Result<()> {
        self.set_level_for(self.require_current()?, level)
    }

    pub fn set_level_for(&self, id: LoadoutId, level: u8) -> Result<()> {
        self.write(id, WriteOrigin::User, Edit::Level(level))
    }

    /// Clamped to 1..=255.
    pub fn set_renown_rank(&self, rank: u8) -> Result<()> {
        self.set_renown_rank_for(self.require_current()?, rank)
    }

    pub fn set_renown_rank_for(&self, id: LoadoutId, rank: u8) -> Result<()> {
        self.write(id, WriteOrigin::User, Edit::RenownRank(rank))
    }

    /// Rejects levels above the ability table's maximum.
    pub fn set_renown_ability(&self, ability: RenownAbility, level: u8) -> Result<()> {
        self.set_renown_ability_for(self.require_current()?, ability, level)
    }

    pub fn set_renown_ability_for(
        &self,
        id: LoadoutId,
        ability: RenownAbility,
        level: u8,
    ) -> Result<()> {
        self.write(id, WriteOrigin::User, Edit::RenownAbility { ability, level })
    }

    pub fn set_loadout_name(&self, name: impl Into<String>) -> Result<()> {
        self.set_loadout_name_for(self.require_current()?, name)
    }

    pub fn set_loadout_name_for(&self, id: LoadoutId, name: impl Into<String>) -> Result<()> {
        self.write(id, WriteOrigin::User, Edit::Name(name.into()))
    }

    // ===== registry operations =====

    pub fn create_loadout(&self, spec: NewLoadout) -> Result<LoadoutId> {
        self.transact(|tx| {
            let previous = tx.registry().current_id();
            let id = tx.registry().create(spec);
            tx.created(id, None);
            let current = tx.registry().current_id();
            if current == Some(id) {
                tx.switched(id, previous);
            }
            Ok(id)
        })
    }

    pub fn switch_loadout(&self, id: LoadoutId) -> Result<()> {
        self.transact(|tx| {
            let previous = tx.registry().switch_current(id)?;
            tx.switched(id, previous);
            Ok(())
        })
    }

    /// Returns the id actually shown, which is a clone when `id` was showing
    /// on the other side.
    pub fn assign_side(&self, side: Side, id: Option<LoadoutId>) -> Result<Option<LoadoutId>> {
        self.transact(|tx| {
            let assignment = tx.registry().assign_side(side, id)?;
            tx.assigned(assignment);
            Ok(assignment.loadout)
        })
    }

    pub fn ensure_side(&self, side: Side) -> Result<LoadoutId> {
        self.transact(|tx| {
            let (id, created) = tx.registry().ensure_side(side)?;
            if created {
                tx.created(id, None);
                tx.assigned(SideAssignment {
                    side,
                    loadout: Some(id),
                    cloned_from: None,
                });
            }
            Ok(id)
        })
    }

    pub fn set_active_side(&self, side: Side) -> Result<()> {
        self.transact(|tx| {
            if tx.registry().set_active_side(side) {
                tx.emit(EventPayload::ActiveSideChanged { side });
            }
            Ok(())
        })
    }

    /// Shows the active side's loadout for `career`, reusing, cloning or
    /// creating one (see [`LoadoutRegistry::get_or_create_for_career`]).
    pub fn select_career(&self, career: Career) -> Result<LoadoutId> {
        let tables = Arc::clone(&self.inner.tables);
        self.transact(|tx| {
            let selection = tx.registry().get_or_create_for_career(career)?;
            let id = selection.loadout;
            match selection.origin {
                CareerOrigin::Cloned { from } => tx.created(id, Some(from)),
                CareerOrigin::Created => {
                    tx.created(id, None);
                    tx.emit(EventPayload::CareerChanged {
                        loadout: id,
                        career: Some(career),
                    });
                }
                CareerOrigin::Restored => tx.emit(EventPayload::CareerChanged {
                    loadout: id,
                    career: Some(career),
                }),
                CareerOrigin::Cached | CareerOrigin::Adopted => {}
            }
            tx.assigned(selection.assignment);
            tx.switched(id, selection.previous);
            tx.stats(id, &tables);
            Ok(id)
        })
    }

    pub fn clone_loadout(&self, source: LoadoutId, name: Option<String>) -> Result<LoadoutId> {
        self.transact(|tx| {
            let id = tx.registry().clone_loadout(source, name)?;
            tx.created(id, Some(source));
            Ok(id)
        })
    }

    pub fn reset_loadout(&self, id: LoadoutId) -> Result<()> {
        let tables = Arc::clone(&self.inner.tables);
        self.transact(|tx| {
            tx.registry().reset(id)?;
            tx.emit(EventPayload::LoadoutReset { loadout: id });
            tx.stats(id, &tables);
            tx.resync();
            Ok(())
        })
    }

    pub fn remove_loadout(&self, id: LoadoutId) -> Result<()> {
        self.transact(|tx| {
            let removal = tx.registry().remove(id)?;
            tx.emit(EventPayload::LoadoutRemoved { loadout: id });
            for side in removal.cleared_sides {
                tx.assigned(SideAssignment {
                    side,
                    loadout: None,
                    cloned_from: None,
                });
            }
            if let Some(Some(current)) = removal.new_current {
                tx.switched(current, Some(id));
            }
            Ok(())
        })
    }

    /// Opens a bulk-apply scope.
    pub fn begin_bulk_apply(&self) -> Result<BulkApply> {
        self.write_state()?.bulk_depth += 1;
        Ok(BulkApply::new(self.clone()))
    }

    // ===== import support =====

    /// Creates the provisional loadout for an import of `character_name`,
    /// shows it on `side` and makes it current, all under one lock.
    pub(crate) fn claim_for_import(&self, side: Side, character_name: &str) -> Result<ImportClaim> {
        self.transact(|tx| {
            let previous_side = tx.registry().side_loadout(side);
            let previous_current = tx.registry().current_id();
            let id = tx
                .registry()
                .create(NewLoadout::named(character_name).from_character(character_name));
            tx.created(id, None);
            let assignment = tx.registry().assign_side(side, Some(id))?;
            tx.assigned(assignment);
            let previous = tx.registry().switch_current(id)?;
            tx.switched(id, previous);
            Ok(ImportClaim {
                side,
                loadout: id,
                previous_side,
                previous_current,
            })
        })
    }

    /// Undoes a claim whose import failed before applying anything.
    ///
    /// The side goes back to its previous loadout only if it still shows the
    /// provisional one; a later claim is left alone. When the previous
    /// loadout was itself a released claim, the claim it replaced is used.
    pub(crate) fn release_claim(&self, claim: &ImportClaim) -> Result<()> {
        self.transact(|tx| {
            let restore_side = tx.state.live_fallback(claim.previous_side, |r| r.side);
            let restore_current = tx
                .state
                .live_fallback(claim.previous_current, |r| r.current);
            tx.state.released.insert(
                claim.loadout,
                ReleasedClaim {
                    side: restore_side,
                    current: restore_current,
                },
            );

            if tx.registry().side_loadout(claim.side) == Some(claim.loadout) {
                let assignment = tx.registry().assign_side(claim.side, restore_side)?;
                tx.assigned(assignment);
            }
            if tx.registry().current_id() == Some(claim.loadout)
                && let Some(previous) = restore_current
            {
                tx.registry().switch_current(previous)?;
                tx.switched(previous, Some(claim.loadout));
            }
            let removal = tx.registry().remove(claim.loadout)?;
            tx.emit(EventPayload::LoadoutRemoved {
                loadout: claim.loadout,
            });
            if let Some(Some(current)) = removal.new_current {
                tx.switched(current, Some(claim.loadout));
            }
            Ok(())
        })
    }

    /// Caches `id` as the side's loadout for `career`, but only while the
    /// side still shows it. Returns whether the cache was written.
    pub(crate) fn cache_career_if_showing(
        &self,
        side: Side,
        career: Career,
        id: LoadoutId,
    ) -> Result<bool> {
        self.transact(|tx| {
            if tx.registry().side_loadout(side) != Some(id) {
                return Ok(false);
            }
            tx.registry().cache_career(side, career, id);
            Ok(true)
        })
    }

    // ===== internals =====

    fn require_current(&self) -> Result<LoadoutId> {
        self.current_loadout_id()?
            .ok_or(PlannerError::NoCurrentLoadout)
    }

    pub(crate) fn write(&self, id: LoadoutId, origin: WriteOrigin, edit: Edit) -> Result<()> {
        let tables = Arc::clone(&self.inner.tables);
        self.transact(|tx| {
            let loadout = tx
                .registry()
                .get_mut(id)
                .ok_or(PlannerError::UnknownLoadout(id))?;
            let events = writes::apply(loadout, &tables, edit)?;
            let exited = origin == WriteOrigin::User && loadout.is_from_character;
            if exited {
                loadout.is_from_character = false;
                tx.emit(EventPayload::CharacterModeExited { loadout: id });
            }
            for event in events {
                debug!(loadout = %id, event = %event.event_type(), ?origin, "loadout updated");
                tx.emit(event);
            }
            tx.stats(id, &tables);
            tx.resync();
            Ok(())
        })
    }

    pub(crate) fn end_bulk_apply(&self) -> Result<()> {
        self.transact(|tx| {
            tx.state.bulk_depth = tx.state.bulk_depth.saturating_sub(1);
            tx.resync();
            Ok(())
        })
    }

    fn transact<T>(&self, f: impl FnOnce(&mut Tx<'_>) -> Result<T>) -> Result<T> {
        let (value, events, query) = {
            let mut state = self.write_state()?;
            let mut tx = Tx {
                state: &mut *state,
                events: Vec::new(),
                resync: false,
            };
            let value = f(&mut tx)?;
            let Tx { events, resync, .. } = tx;
            let query = (resync && state.bulk_depth == 0).then(|| encode_sides(&state.registry));
            (value, events, query)
        };

        for event in events {
            self.inner.events.publish(event);
        }
        if let (Some(query), Some(sync)) = (query, &self.inner.url_sync) {
            debug!(%query, "url resync");
            sync.replace_query(&query);
        }
        Ok(value)
    }

    fn read<T>(&self, f: impl FnOnce(&LoadoutRegistry) -> Result<T>) -> Result<T> {
        let state = self.read_state()?;
        f(&state.registry)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, PlannerState>> {
        self.inner
            .state
            .read()
            .map_err(|_| PlannerError::LockPoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, PlannerState>> {
        self.inner
            .state
            .write()
            .map_err(|_| PlannerError::LockPoisoned)
    }
}

fn encode_sides(registry: &LoadoutRegistry) -> String {
    let mut state = UrlState::default();
    for side in Side::BOTH {
        state.sides[side] = registry
            .side_loadout(side)
            .and_then(|id| registry.get(id))
            .map(SideUrlState::from_loadout);
    }
    url_state::encode(&state)
}

/// Builder for [`Planner`]
pub struct PlannerBuilder {
    config: RuntimeConfig,
    tables: Option<RulesTables>,
    events: Option<EventBus>,
    url_sync: Option<Arc<dyn UrlSync>>,
}

impl PlannerBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            tables: None,
            events: None,
            url_sync: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Rules tables used by validation and stats. Defaults to empty tables.
    pub fn tables(mut self, tables: RulesTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Share an existing event bus
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn url_sync(mut self, sync: impl UrlSync + 'static) -> Self {
        self.url_sync = Some(Arc::new(sync));
        self
    }

    pub fn build(self) -> Planner {
        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let registry = LoadoutRegistry::new(self.config.planner.clone());
        Planner {
            inner: Arc::new(PlannerInner {
                state: RwLock::new(PlannerState {
                    registry,
                    bulk_depth: 0,
                    released: BTreeMap::new(),
                }),
                tables: Arc::new(self.tables.unwrap_or_default()),
                events,
                url_sync: self.url_sync,
                config: self.config,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use planner_core::{EquipError, ItemId, ItemType};
    use std::sync::Mutex;

    fn recording_planner() -> (Planner, Arc<Mutex<Vec<String>>>) {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&queries);
        let planner = Planner::builder()
            .url_sync(move |query: &str| sink.lock().unwrap().push(query.to_string()))
            .build();
        (planner, queries)
    }

    fn event_log(planner: &Planner) -> Arc<Mutex<Vec<EventType>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        planner.events().subscribe_all(move |event| {
            sink.lock().unwrap().push(event.event_type());
            Ok(())
        });
        log
    }

    fn boots(id: u32) -> Item {
        Item::new(ItemId(id), "Boots", ItemType::HeavyArmor, EquipSlot::Boots).with_armor(100)
    }

    #[test]
    fn write_emits_specific_event_then_stats() {
        let (planner, _) = recording_planner();
        let id = planner.ensure_side(Side::A).expect("side");
        let log = event_log(&planner);

        planner.set_item(EquipSlot::Boots, Some(boots(1))).expect("boots");
        assert_eq!(
            *log.lock().unwrap(),
            [EventType::ItemUpdated, EventType::StatsUpdated]
        );
        assert_eq!(
            planner.stats(id, StatsOptions::default()).expect("stats").get(Stat::Armor),
            100
        );
    }

    #[test]
    fn rejected_write_publishes_nothing() {
        let (planner, queries) = recording_planner();
        planner.ensure_side(Side::A).expect("side");
        let before = queries.lock().unwrap().len();
        let log = event_log(&planner);

        let restricted = boots(2).with_careers([Career::Chosen]);
        let err = planner.set_item(EquipSlot::Boots, Some(restricted)).unwrap_err();
        assert!(matches!(
            err,
            PlannerError::Equip(EquipError::CareerMismatch { .. })
        ));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(queries.lock().unwrap().len(), before);
    }

    #[test]
    fn manual_edit_exits_character_mode_but_bulk_write_does_not() {
        let (planner, _) = recording_planner();
        let id = planner
            .create_loadout(NewLoadout::named("Imported").from_character("Vexilla"))
            .expect("create");

        let bulk = planner.begin_bulk_apply().expect("bulk");
        bulk.set_level(id, 30).expect("bulk level");
        bulk.finish().expect("finish");
        assert!(planner.loadout(id).expect("loadout").is_from_character);

        let log = event_log(&planner);
        planner.set_level_for(id, 31).expect("manual level");
        assert!(!planner.loadout(id).expect("loadout").is_from_character);
        assert_eq!(
            *log.lock().unwrap(),
            [
                EventType::CharacterModeExited,
                EventType::LevelChanged,
                EventType::StatsUpdated
            ]
        );
    }

    #[test]
    fn bulk_scope_resyncs_exactly_once() {
        let (planner, queries) = recording_planner();
        let id = planner.ensure_side(Side::A).expect("side");
        queries.lock().unwrap().clear();

        let outer = planner.begin_bulk_apply().expect("outer");
        let inner = planner.begin_bulk_apply().expect("inner");
        outer.set_level(id, 20).expect("level");
        inner.set_item(id, EquipSlot::Boots, Some(boots(3))).expect("boots");
        planner.set_renown_rank_for(id, 50).expect("manual write inside scope");
        inner.finish().expect("inner");
        assert!(queries.lock().unwrap().is_empty());
        drop(outer);

        let queries = queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains("a.l=20"));
        assert!(queries[0].contains("a.r=50"));
        assert!(queries[0].contains("a.i.boots=3"));
        assert!(!planner.is_bulk_applying().expect("depth"));
    }

    #[test]
    fn handlers_can_read_the_planner() {
        let (planner, _) = recording_planner();
        let id = planner.ensure_side(Side::A).expect("side");
        let seen = Arc::new(Mutex::new(None));
        let (reader, sink) = (planner.clone(), Arc::clone(&seen));
        planner.events().subscribe(EventType::LevelChanged, move |_| {
            *sink.lock().unwrap() = Some(reader.loadout(id)?.level);
            Ok(())
        });

        planner.set_level_for(id, 12).expect("level");
        assert_eq!(*seen.lock().unwrap(), Some(12));
    }

    #[test]
    fn compare_sides_lists_differences() {
        let (planner, _) = recording_planner();
        assert_eq!(planner.compare_sides().expect("compare"), None);

        let a = planner.ensure_side(Side::A).expect("a");
        let b = planner.ensure_side(Side::B).expect("b");
        planner.set_item_for(b, EquipSlot::Boots, Some(boots(4))).expect("boots");

        let comparison = planner.compare_sides().expect("compare").expect("both sides");
        assert_eq!((comparison.a, comparison.b), (a, b));
        let armor = comparison
            .deltas
            .iter()
            .find(|delta| delta.stat == Stat::Armor)
            .expect("armor differs");
        assert_eq!(armor.delta(), 100);
    }

    #[test]
    fn select_career_switches_and_assigns() {
        let (planner, _) = recording_planner();
        let log = event_log(&planner);
        let id = planner.select_career(Career::Engineer).expect("select");

        assert_eq!(planner.current_loadout_id().expect("current"), Some(id));
        assert_eq!(planner.side_loadout_id(Side::A).expect("side"), Some(id));
        assert_eq!(
            planner.loadout(id).expect("loadout").career,
            Some(Career::Engineer)
        );
        let log = log.lock().unwrap();
        assert!(log.contains(&EventType::LoadoutCreated));
        assert!(log.contains(&EventType::SideAssigned));
        assert_eq!(log.last(), Some(&EventType::StatsUpdated));
    }

    #[test]
    fn remove_reports_cleared_sides() {
        let (planner, _) = recording_planner();
        let a = planner.ensure_side(Side::A).expect("a");
        let log = event_log(&planner);

        planner.remove_loadout(a).expect("remove");
        assert_eq!(planner.side_loadout_id(Side::A).expect("side"), None);
        assert_eq!(
            *log.lock().unwrap(),
            [EventType::LoadoutRemoved, EventType::SideAssigned]
        );
        assert!(matches!(
            planner.loadout(a),
            Err(PlannerError::UnknownLoadout(_))
        ));
    }

    #[test]
    fn writes_without_current_loadout_fail() {
        let (planner, _) = recording_planner();
        assert!(matches!(
            planner.set_level(10),
            Err(PlannerError::NoCurrentLoadout)
        ));
    }
}
