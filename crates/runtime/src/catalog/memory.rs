//! In-memory catalog backed by content data.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use planner_content::CatalogData;
use planner_core::{EquipSlot, Item, ItemId, SlotCategory};

use crate::api::{
    CatalogClient, CatalogError, CharacterDetail, CharacterId, CharacterSummary, EquippedItem,
    ItemConnection, ItemFilter, PageInfo,
};

/// Catalog serving a fixed set of items and characters.
///
/// Every call sleeps for the configured latency first (per-character
/// overrides apply to character lookups), which lets tests stage races with
/// paused tokio time.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: BTreeMap<ItemId, Item>,
    characters: Vec<CharacterDetail>,
    latency: Duration,
    character_latency: HashMap<String, Duration>,
    unavailable_items: BTreeSet<ItemId>,
    item_fetches: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog from content data, resolving every character
    /// sheet's item ids.
    pub fn from_content(data: &CatalogData) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for item in &data.items {
            catalog.items.insert(item.id, item.clone());
        }

        for sheet in &data.characters {
            let mut items = Vec::with_capacity(sheet.equipped.len());
            for entry in &sheet.equipped {
                let talismans = entry
                    .talismans
                    .iter()
                    .map(|talisman| talisman.map(|id| catalog.lookup(id)).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                items.push(EquippedItem {
                    slot: entry.slot,
                    item: catalog.lookup(entry.item)?,
                    talismans,
                });
            }
            catalog.characters.push(CharacterDetail {
                id: CharacterId(sheet.id),
                name: sheet.name.clone(),
                career: Some(sheet.career),
                level: sheet.level,
                renown_rank: sheet.renown_rank,
                items,
            });
        }

        Ok(catalog)
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn with_character(mut self, character: CharacterDetail) -> Self {
        self.characters.push(character);
        self
    }

    /// Delay applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay applied to searches and detail fetches for one character name.
    pub fn with_character_latency(mut self, name: &str, latency: Duration) -> Self {
        self.character_latency.insert(name.to_lowercase(), latency);
        self
    }

    /// Makes `get_item_by_id` fail with a network error for `id`.
    pub fn with_unavailable_item(mut self, id: ItemId) -> Self {
        self.unavailable_items.insert(id);
        self
    }

    /// Number of `get_item_by_id` calls served so far.
    pub fn item_fetch_count(&self) -> usize {
        self.item_fetches.load(Ordering::SeqCst)
    }

    fn lookup(&self, id: ItemId) -> Result<Item, CatalogError> {
        self.items.get(&id).cloned().ok_or(CatalogError::ItemNotFound(id))
    }

    async fn delay(&self, character: Option<&str>) {
        let latency = character
            .and_then(|name| self.character_latency.get(&name.to_lowercase()))
            .copied()
            .unwrap_or(self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

fn summary(detail: &CharacterDetail) -> CharacterSummary {
    CharacterSummary {
        id: detail.id,
        name: detail.name.clone(),
        career: detail.career,
        level: detail.level,
        renown_rank: detail.renown_rank,
    }
}

/// Whether an item designated for `own` may be listed for `slot`.
fn fits_slot(own: EquipSlot, slot: EquipSlot) -> bool {
    match own {
        EquipSlot::EitherHand => matches!(slot, EquipSlot::MainHand | EquipSlot::OffHand),
        _ if own == slot => true,
        _ => own.category() == SlotCategory::Pocket && slot.category() == SlotCategory::Pocket,
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn search_characters_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<CharacterSummary>, CatalogError> {
        self.delay(Some(name)).await;
        let needle = name.to_lowercase();
        let mut hits: Vec<_> = self
            .characters
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect();
        // Exact matches first, then by id.
        hits.sort_by_key(|c| (c.name.to_lowercase() != needle, c.id));
        Ok(hits.into_iter().map(summary).collect())
    }

    async fn get_character_by_id(&self, id: CharacterId) -> Result<CharacterDetail, CatalogError> {
        let detail = self
            .characters
            .iter()
            .find(|c| c.id == id)
            .ok_or(CatalogError::CharacterNotFound(id))?;
        self.delay(Some(&detail.name)).await;
        Ok(detail.clone())
    }

    async fn get_item_by_id(&self, id: ItemId) -> Result<Item, CatalogError> {
        self.item_fetches.fetch_add(1, Ordering::SeqCst);
        self.delay(None).await;
        if self.unavailable_items.contains(&id) {
            return Err(CatalogError::Network(format!("item {id} unavailable")));
        }
        self.lookup(id)
    }

    async fn list_items_for_slot(&self, filter: &ItemFilter) -> Result<ItemConnection, CatalogError> {
        self.delay(None).await;
        let offset = match &filter.after {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| CatalogError::Parse(format!("invalid cursor {cursor:?}")))?,
            None => 0,
        };

        let matching: Vec<&Item> = self
            .items
            .values()
            .filter(|item| item.slot.is_some_and(|own| fits_slot(own, filter.slot)))
            .filter(|item| {
                filter.career.is_none_or(|career| {
                    item.career_restriction.is_empty() || item.career_restriction.contains(&career)
                })
            })
            .filter(|item| filter.max_level.is_none_or(|max| item.level_requirement <= max))
            .collect();

        let total_count = matching.len();
        let items: Vec<Item> = matching
            .into_iter()
            .skip(offset)
            .take(filter.first)
            .cloned()
            .collect();
        let end = offset + items.len();

        Ok(ItemConnection {
            page_info: PageInfo {
                has_next_page: end < total_count,
                end_cursor: (!items.is_empty()).then(|| end.to_string()),
            },
            items,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_content::ContentFactory;
    use planner_core::{Career, ItemType};

    fn demo() -> InMemoryCatalog {
        let data = ContentFactory::builtin().load_catalog().expect("builtin catalog");
        InMemoryCatalog::from_content(&data).expect("resolve sheets")
    }

    #[tokio::test]
    async fn search_prefers_exact_matches() {
        let catalog = InMemoryCatalog::new()
            .with_character(detail(1, "Vexillary"))
            .with_character(detail(2, "Vex"));
        let hits = catalog.search_characters_by_name("vex").await.expect("search");
        let names: Vec<_> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Vex", "Vexillary"]);
        assert!(catalog.search_characters_by_name("nobody").await.expect("search").is_empty());
    }

    fn detail(id: u64, name: &str) -> CharacterDetail {
        CharacterDetail {
            id: CharacterId(id),
            name: name.into(),
            career: None,
            level: 40,
            renown_rank: 80,
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn demo_characters_resolve_items() {
        let catalog = demo();
        let hit = catalog.search_characters_by_name("Vexilla").await.expect("search");
        let detail = catalog.get_character_by_id(hit[0].id).await.expect("detail");
        assert_eq!(detail.career, Some(Career::WitchHunter));
        let main_hand = detail
            .items
            .iter()
            .find(|e| e.slot == EquipSlot::MainHand)
            .expect("main hand");
        assert_eq!(main_hand.item.id, ItemId(4021));
        assert_eq!(main_hand.talismans[0].as_ref().map(|t| t.id), Some(ItemId(9012)));
    }

    #[tokio::test]
    async fn list_items_pages_and_filters() {
        let catalog = demo();
        let filter = ItemFilter::for_slot(EquipSlot::MainHand).first(1);
        let first = catalog.list_items_for_slot(&filter).await.expect("page 1");
        assert_eq!(first.items.len(), 1);
        assert!(first.page_info.has_next_page);
        assert!(first.total_count >= 3);

        let cursor = first.page_info.end_cursor.expect("cursor");
        let second = catalog
            .list_items_for_slot(&filter.clone().after(cursor))
            .await
            .expect("page 2");
        assert_ne!(second.items[0].id, first.items[0].id);

        let chosen_only = catalog
            .list_items_for_slot(&ItemFilter::for_slot(EquipSlot::MainHand).career(Career::Chosen))
            .await
            .expect("filtered");
        assert!(chosen_only.items.iter().all(|i| i.item_type != ItemType::Sword));

        let bad = catalog
            .list_items_for_slot(&ItemFilter::for_slot(EquipSlot::Body).after("nope"))
            .await;
        assert!(matches!(bad, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn unavailable_items_fail_with_network_errors() {
        let catalog = demo().with_unavailable_item(ItemId(7300));
        assert!(matches!(
            catalog.get_item_by_id(ItemId(7300)).await,
            Err(CatalogError::Network(_))
        ));
        assert_eq!(
            catalog.get_item_by_id(ItemId(1)).await,
            Err(CatalogError::ItemNotFound(ItemId(1)))
        );
        assert_eq!(catalog.item_fetch_count(), 2);
    }
}
