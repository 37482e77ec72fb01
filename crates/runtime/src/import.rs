//! Character import and URL restore.
//!
//! Both pipelines fetch from the catalog first and then replay the result
//! through the planner inside one bulk-apply scope. Per-slot rejections are
//! collected as [`SkippedSlot`]s; anything else aborts.
//!
//! A character import claims the active side synchronously, before its first
//! `.await`, so the import started last owns the side. A slower, earlier
//! import still fills its own loadout but only caches it for the career when
//! the side still shows it.
use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use planner_core::url_state::{self, SideUrlState};
use planner_core::{EquipSlot, Item, ItemId, LoadoutId, Side};
use tracing::{debug, info, warn};

use crate::api::{CatalogClient, CatalogError, CharacterDetail, PlannerError, Result};
use crate::catalog::ItemCache;
use crate::events::{EventPayload, SkippedSlot};
use crate::planner::{BulkApply, Planner};

/// Outcome of [`CharacterImporter::load_from_named_character`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportReport {
    pub loadout: LoadoutId,
    pub side: Side,
    pub character_name: String,
    pub skipped: Vec<SkippedSlot>,
    /// False when a later import took the side before this one finished.
    pub career_cached: bool,
}

/// Outcome of [`CharacterImporter::restore_from_url`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Sides the query carried, with the loadout each was restored into.
    pub sides: Vec<(Side, LoadoutId)>,
    pub skipped: Vec<(Side, SkippedSlot)>,
}

/// Loads catalog characters and URL queries into a [`Planner`].
pub struct CharacterImporter {
    planner: Planner,
    catalog: Arc<dyn CatalogClient>,
    items: ItemCache,
}

impl CharacterImporter {
    pub fn new(planner: Planner, catalog: Arc<dyn CatalogClient>) -> Self {
        let capacity = planner.config().item_cache_capacity;
        let items = ItemCache::new(Arc::clone(&catalog), capacity);
        Self {
            planner,
            catalog,
            items,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn items(&self) -> &ItemCache {
        &self.items
    }

    /// Imports the first catalog character matching `name` into the active
    /// side.
    pub async fn load_from_named_character(&self, name: &str) -> Result<ImportReport> {
        let side = self.planner.active_side()?;
        self.planner.ensure_side(side)?;
        let claim = self.planner.claim_for_import(side, name)?;
        info!(%side, loadout = %claim.loadout, character = name, "importing character");

        let detail = match self.fetch_character(name).await {
            Ok(detail) => detail,
            Err(err) => {
                warn!(character = name, error = %err, "character import failed");
                self.planner.release_claim(&claim)?;
                return Err(err);
            }
        };

        let id = claim.loadout;
        let bulk = self.planner.begin_bulk_apply()?;
        bulk.set_career(id, detail.career)?;
        bulk.set_level(id, detail.level)?;
        bulk.set_renown_rank(id, detail.renown_rank)?;

        let mut skipped = Vec::new();
        for entry in detail.items.iter().filter(|entry| !entry.slot.is_trophy()) {
            self.items.insert(entry.item.clone());
            let applied = record_skip(
                bulk.set_item(id, entry.slot, Some(entry.item.clone())),
                entry.slot,
                None,
                entry.item.id,
                &mut skipped,
            )?;
            if !applied {
                continue;
            }
            for (index, talisman) in entry.talismans.iter().enumerate() {
                let Some(talisman) = talisman else {
                    continue;
                };
                record_skip(
                    bulk.set_talisman(id, entry.slot, index, Some(talisman.clone())),
                    entry.slot,
                    Some(index),
                    talisman.id,
                    &mut skipped,
                )?;
            }
        }

        bulk.set_level(id, detail.level)?;
        bulk.set_renown_rank(id, detail.renown_rank)?;
        bulk.set_loadout_name(id, detail.name.clone())?;
        bulk.set_character_name(id, Some(detail.name.clone()))?;
        bulk.clear_renown_abilities(id)?;

        let career_cached = match detail.career {
            Some(career) => self.planner.cache_career_if_showing(side, career, id)?,
            None => false,
        };
        if !career_cached {
            debug!(%side, loadout = %id, "side moved on; career cache left alone");
        }
        bulk.finish()?;

        info!(
            %side,
            loadout = %id,
            character = %detail.name,
            skipped = skipped.len(),
            "character loaded"
        );
        self.planner.events().publish(EventPayload::CharacterLoaded {
            loadout: id,
            side,
            character_name: detail.name.clone(),
            skipped: skipped.clone(),
        });

        Ok(ImportReport {
            loadout: id,
            side,
            character_name: detail.name,
            skipped,
            career_cached,
        })
    }

    /// Replays a URL query onto the sides it mentions.
    ///
    /// Items are resolved by id through the item cache; an id that cannot be
    /// fetched or equipped is skipped. Sides absent from the query are left
    /// untouched.
    pub async fn restore_from_url(&self, query: &str) -> Result<RestoreReport> {
        let state = url_state::decode(query);
        let present: Vec<(Side, &SideUrlState)> = Side::BOTH
            .into_iter()
            .filter_map(|side| state.side(side).map(|side_state| (side, side_state)))
            .collect();

        let wanted: Vec<ItemId> = present
            .iter()
            .flat_map(|(_, side_state)| {
                side_state
                    .items
                    .values()
                    .chain(side_state.talismans.values())
                    .copied()
            })
            .collect();
        let fetched = self.fetch_items(wanted).await;

        let mut report = RestoreReport::default();
        let bulk = self.planner.begin_bulk_apply()?;
        for (side, side_state) in present {
            let id = self.planner.ensure_side(side)?;
            let mut skipped = Vec::new();
            restore_side(&bulk, id, side_state, &fetched, &mut skipped)?;
            debug!(%side, loadout = %id, skipped = skipped.len(), "restored side from url");
            report
                .skipped
                .extend(skipped.into_iter().map(|slot| (side, slot)));
            report.sides.push((side, id));
        }
        bulk.finish()?;
        Ok(report)
    }

    async fn fetch_character(&self, name: &str) -> Result<CharacterDetail> {
        let hits = self.catalog.search_characters_by_name(name).await?;
        let first = hits.first().ok_or_else(|| PlannerError::NotFound {
            name: name.to_string(),
        })?;
        Ok(self.catalog.get_character_by_id(first.id).await?)
    }

    async fn fetch_items(
        &self,
        mut ids: Vec<ItemId>,
    ) -> BTreeMap<ItemId, std::result::Result<Item, CatalogError>> {
        ids.sort_unstable();
        ids.dedup();
        let results = join_all(ids.iter().map(|id| self.items.get(*id))).await;
        ids.into_iter().zip(results).collect()
    }
}

fn restore_side(
    bulk: &BulkApply,
    id: LoadoutId,
    state: &SideUrlState,
    fetched: &BTreeMap<ItemId, std::result::Result<Item, CatalogError>>,
    skipped: &mut Vec<SkippedSlot>,
) -> Result<()> {
    bulk.set_career(id, state.career)?;
    if let Some(level) = state.level {
        bulk.set_level(id, level)?;
    }
    if let Some(rank) = state.renown_rank {
        bulk.set_renown_rank(id, rank)?;
    }
    bulk.clear_items(id)?;
    bulk.clear_renown_abilities(id)?;

    for (slot, item_id) in &state.items {
        let write = resolve(fetched, *item_id).and_then(|item| bulk.set_item(id, *slot, Some(item)));
        record_skip(write, *slot, None, *item_id, skipped)?;
    }
    for ((slot, index), item_id) in &state.talismans {
        let write = resolve(fetched, *item_id)
            .and_then(|talisman| bulk.set_talisman(id, *slot, *index, Some(talisman)));
        record_skip(write, *slot, Some(*index), *item_id, skipped)?;
    }
    for (ability, level) in &state.renown_abilities {
        if *level > 0
            && let Err(err) = bulk.set_renown_ability(id, *ability, *level)
        {
            if !err.is_slot_failure() {
                return Err(err);
            }
            warn!(loadout = %id, %ability, level, error = %err, "skipped renown ability");
        }
    }
    Ok(())
}

fn resolve(
    fetched: &BTreeMap<ItemId, std::result::Result<Item, CatalogError>>,
    id: ItemId,
) -> Result<Item> {
    match fetched.get(&id) {
        Some(Ok(item)) => Ok(item.clone()),
        Some(Err(err)) => Err(PlannerError::Catalog(err.clone())),
        None => Err(PlannerError::Catalog(CatalogError::ItemNotFound(id))),
    }
}

/// Turns a per-slot failure into a [`SkippedSlot`]. Returns whether the write
/// went through; errors that are not about the slot propagate.
fn record_skip(
    result: Result<()>,
    slot: EquipSlot,
    talisman_index: Option<usize>,
    item: ItemId,
    skipped: &mut Vec<SkippedSlot>,
) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_slot_failure() || matches!(err, PlannerError::Catalog(_)) => {
            warn!(%slot, ?talisman_index, %item, error = %err, "skipped slot");
            skipped.push(SkippedSlot {
                slot,
                talisman_index,
                item,
                reason: err.to_string(),
            });
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
