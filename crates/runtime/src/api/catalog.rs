//! Asynchronous abstraction over the remote item/character catalog.
//!
//! The planner never talks to the network itself: importers and the URL
//! restore path go through a [`CatalogClient`], so the catalog can be a real
//! remote service, the in-memory demo catalog, or a test fixture.
use async_trait::async_trait;
use planner_core::{Career, EquipSlot, Item, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Catalog identifier of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "character#{}", self.0)
    }
}

/// Search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    pub career: Option<Career>,
    pub level: u8,
    pub renown_rank: u8,
}

/// One worn slot of a character, items resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub slot: EquipSlot,
    pub item: Item,
    pub talismans: Vec<Option<Item>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDetail {
    pub id: CharacterId,
    pub name: String,
    pub career: Option<Career>,
    pub level: u8,
    pub renown_rank: u8,
    pub items: Vec<EquippedItem>,
}

/// Query for [`CatalogClient::list_items_for_slot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemFilter {
    pub slot: EquipSlot,
    /// Only items usable by this career (unrestricted items included).
    pub career: Option<Career>,
    /// Only items whose level requirement is at most this.
    pub max_level: Option<u8>,
    /// Page size.
    pub first: usize,
    /// Cursor returned as `end_cursor` by the previous page.
    pub after: Option<String>,
}

impl ItemFilter {
    pub fn for_slot(slot: EquipSlot) -> Self {
        Self {
            slot,
            career: None,
            max_level: None,
            first: 25,
            after: None,
        }
    }

    pub fn career(mut self, career: Career) -> Self {
        self.career = Some(career);
        self
    }

    pub fn max_level(mut self, level: u8) -> Self {
        self.max_level = Some(level);
        self
    }

    pub fn first(mut self, first: usize) -> Self {
        self.first = first;
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConnection {
    pub items: Vec<Item>,
    pub page_info: PageInfo,
    pub total_count: usize,
}

/// Catalog failures. Cloneable so one failed fetch can be handed to every
/// caller waiting on it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Network(String),

    #[error("malformed catalog response: {0}")]
    Parse(String),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("{0} not found")]
    CharacterNotFound(CharacterId),
}

/// Item and character lookups.
///
/// Implementations are shared across tasks, hence `Send + Sync`. No method
/// retries or times out on its own.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Characters matching `name`, best match first.
    async fn search_characters_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<CharacterSummary>, CatalogError>;

    async fn get_character_by_id(&self, id: CharacterId) -> Result<CharacterDetail, CatalogError>;

    async fn get_item_by_id(&self, id: ItemId) -> Result<Item, CatalogError>;

    async fn list_items_for_slot(&self, filter: &ItemFilter) -> Result<ItemConnection, CatalogError>;
}
