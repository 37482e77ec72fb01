//! Demo catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use planner_core::{Career, EquipSlot, Item, ItemId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One equipped slot on a character sheet, by item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSlot {
    pub slot: EquipSlot,
    pub item: ItemId,
    #[serde(default)]
    pub talismans: Vec<Option<ItemId>>,
}

/// A character as the catalog stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub id: u64,
    pub name: String,
    pub career: Career,
    pub level: u8,
    pub renown_rank: u8,
    #[serde(default)]
    pub equipped: Vec<SheetSlot>,
}

/// Catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    pub items: Vec<Item>,
    #[serde(default)]
    pub characters: Vec<CharacterSheet>,
}

/// Loader for the item catalog and character sheets.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<CatalogData> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse catalog contents.
    ///
    /// Item ids must be unique and every id referenced by a character sheet
    /// must name a catalog item.
    pub fn parse(content: &str) -> LoadResult<CatalogData> {
        let catalog: CatalogData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut ids = BTreeSet::new();
        for item in &catalog.items {
            if !ids.insert(item.id) {
                anyhow::bail!("Duplicate item id {} ({})", item.id, item.name);
            }
        }

        for sheet in &catalog.characters {
            for entry in &sheet.equipped {
                let referenced = std::iter::once(entry.item)
                    .chain(entry.talismans.iter().flatten().copied());
                for id in referenced {
                    if !ids.contains(&id) {
                        anyhow::bail!(
                            "Character {} references unknown item {} in {}",
                            sheet.name,
                            id,
                            entry.slot
                        );
                    }
                }
            }
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = CatalogLoader::parse(builtin::CATALOG_RON).expect("builtin catalog");
        assert!(catalog.items.len() >= 10);
        let vexilla = catalog
            .characters
            .iter()
            .find(|c| c.name == "Vexilla")
            .expect("demo character");
        assert_eq!(vexilla.career, Career::WitchHunter);
        assert!(vexilla.equipped.iter().any(|e| e.slot.is_trophy()));

        let rapier = catalog
            .items
            .iter()
            .find(|i| i.id == ItemId(4021))
            .expect("rapier");
        assert_eq!(rapier.slot, Some(EquipSlot::EitherHand));
        assert_eq!(rapier.talisman_slots, 1);
        assert!(rapier.career_restriction.contains(&Career::WitchHunter));
    }

    #[test]
    fn set_pieces_share_identity() {
        let catalog = CatalogLoader::parse(builtin::CATALOG_RON).expect("builtin catalog");
        let sentinel: Vec<_> = catalog
            .items
            .iter()
            .filter(|i| i.set_id() == Some(planner_core::SetId(10)))
            .collect();
        assert_eq!(sentinel.len(), 3);
    }

    #[test]
    fn dangling_item_reference_is_rejected() {
        let content = r#"(
            items: [(id: 1, name: "Helm", type: heavy_armor, slot: Some(helm))],
            characters: [(id: 1, name: "Ghost", career: chosen, level: 40, renown_rank: 80,
                equipped: [(slot: helm, item: 2)])],
        )"#;
        let err = CatalogLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("unknown item 2"));
    }

    #[test]
    fn duplicate_item_id_is_rejected() {
        let content = r#"(items: [(id: 1, name: "A"), (id: 1, name: "B")])"#;
        assert!(CatalogLoader::parse(content).is_err());
    }
}
