//! Bounded item cache with in-flight de-duplication.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use indexmap::IndexMap;
use planner_core::{Item, ItemId};
use tracing::{debug, trace};

use crate::api::{CatalogClient, CatalogError};

type SharedFetch = Shared<BoxFuture<'static, Result<Item, CatalogError>>>;

#[derive(Default)]
struct CacheState {
    entries: IndexMap<ItemId, Item>,
    in_flight: HashMap<ItemId, SharedFetch>,
}

/// Item-detail fetch path in front of a [`CatalogClient`].
///
/// Holds at most `capacity` items and evicts in insertion order; storing an
/// item again moves it to the back. Concurrent requests for the same id share
/// one outstanding fetch. A failed fetch is reported to everyone waiting on it
/// and is not cached.
pub struct ItemCache {
    catalog: Arc<dyn CatalogClient>,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl ItemCache {
    pub fn new(catalog: Arc<dyn CatalogClient>, capacity: usize) -> Self {
        Self {
            catalog,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub async fn get(&self, id: ItemId) -> Result<Item, CatalogError> {
        let fetch = {
            let mut state = self.lock();
            if let Some(item) = state.entries.get(&id) {
                trace!(item = %id, "item cache hit");
                return Ok(item.clone());
            }
            match state.in_flight.get(&id) {
                Some(fetch) => fetch.clone(),
                None => {
                    debug!(item = %id, "fetching item");
                    let catalog = Arc::clone(&self.catalog);
                    let fetch = async move { catalog.get_item_by_id(id).await }
                        .boxed()
                        .shared();
                    state.in_flight.insert(id, fetch.clone());
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        let mut state = self.lock();
        if state
            .in_flight
            .get(&id)
            .is_some_and(|current| Shared::ptr_eq(current, &fetch))
        {
            state.in_flight.remove(&id);
        }
        if let Ok(item) = &result {
            Self::store(&mut state, self.capacity, item.clone());
        }
        result
    }

    /// Stores an item without fetching it.
    pub fn insert(&self, item: Item) {
        let mut state = self.lock();
        Self::store(&mut state, self.capacity, item);
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.lock().entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn store(state: &mut CacheState, capacity: usize, item: Item) {
        state.entries.shift_remove(&item.id);
        state.entries.insert(item.id, item);
        while state.entries.len() > capacity {
            if let Some((evicted, _)) = state.entries.shift_remove_index(0) {
                trace!(item = %evicted, "evicted item");
            }
        }
    }

    // The cache map stays consistent across a panicking holder: every update
    // is a single insert or remove.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use planner_core::{EquipSlot, ItemType};
    use std::time::Duration;

    fn item(id: u32) -> Item {
        Item::new(ItemId(id), format!("Item {id}"), ItemType::Other, EquipSlot::Back)
    }

    #[test]
    fn evicts_oldest_insertion_and_refresh_moves_to_back() {
        let catalog: Arc<dyn CatalogClient> = Arc::new(InMemoryCatalog::new());
        let cache = ItemCache::new(catalog, 2);
        cache.insert(item(1));
        cache.insert(item(2));
        cache.insert(item(1));
        cache.insert(item(3));

        assert!(cache.contains(ItemId(1)));
        assert!(!cache.contains(ItemId(2)));
        assert!(cache.contains(ItemId(3)));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_requests_share_one_fetch() {
        let catalog = Arc::new(
            InMemoryCatalog::new()
                .with_item(item(7))
                .with_latency(Duration::from_millis(50)),
        );
        let cache = ItemCache::new(catalog.clone(), 8);

        let (a, b, c) = tokio::join!(
            cache.get(ItemId(7)),
            cache.get(ItemId(7)),
            cache.get(ItemId(7))
        );
        assert_eq!(a.expect("a").id, ItemId(7));
        assert_eq!(b.expect("b").id, ItemId(7));
        assert_eq!(c.expect("c").id, ItemId(7));
        assert_eq!(catalog.item_fetch_count(), 1);

        cache.get(ItemId(7)).await.expect("cached");
        assert_eq!(catalog.item_fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_shared_but_not_cached() {
        let catalog = Arc::new(
            InMemoryCatalog::new()
                .with_unavailable_item(ItemId(9))
                .with_latency(Duration::from_millis(10)),
        );
        let cache = ItemCache::new(catalog.clone(), 8);

        let (a, b) = tokio::join!(cache.get(ItemId(9)), cache.get(ItemId(9)));
        assert!(matches!(a, Err(CatalogError::Network(_))));
        assert_eq!(a, b);
        assert_eq!(catalog.item_fetch_count(), 1);
        assert!(!cache.contains(ItemId(9)));

        let _ = cache.get(ItemId(9)).await;
        assert_eq!(catalog.item_fetch_count(), 2);
    }
}
