//! Loadouts: one complete build each.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use super::{Career, EquipSlot, Item};
use crate::config::PlannerConfig;
use crate::stats::RenownAbility;

/// Registry-assigned loadout identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LoadoutId(pub u64);

impl fmt::Display for LoadoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loadout#{}", self.0)
    }
}

/// One slot's content: the item plus its talisman sockets.
///
/// `talismans.len()` always equals the item's `talisman_slots` (zero when the
/// slot is empty).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutItem {
    pub item: Option<Item>,
    pub talismans: Vec<Option<Item>>,
}

impl LoadoutItem {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replaces the item; the talisman sockets are reset to the new item's
    /// socket count, all empty.
    pub fn replace(&mut self, item: Option<Item>) -> Option<Item> {
        let sockets = item.as_ref().map_or(0, |i| usize::from(i.talisman_slots));
        self.talismans = vec![None; sockets];
        std::mem::replace(&mut self.item, item)
    }

    pub fn talisman(&self, index: usize) -> Option<&Item> {
        self.talismans.get(index).and_then(Option::as_ref)
    }
}

/// A complete build.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    pub id: LoadoutId,
    pub name: String,
    pub career: Option<Career>,
    pub level: u8,
    pub renown_rank: u8,
    pub items: BTreeMap<EquipSlot, LoadoutItem>,
    pub renown_abilities: BTreeMap<RenownAbility, u8>,
    pub is_from_character: bool,
    pub character_name: Option<String>,
}

impl Loadout {
    /// Creates an empty loadout with every loadout slot present.
    pub fn new(id: LoadoutId, name: impl Into<String>, level: u8, renown_rank: u8) -> Self {
        Self {
            id,
            name: name.into(),
            career: None,
            level: PlannerConfig::clamp_level(level),
            renown_rank: PlannerConfig::clamp_renown_rank(renown_rank),
            items: empty_slots(),
            renown_abilities: BTreeMap::new(),
            is_from_character: false,
            character_name: None,
        }
    }

    pub fn slot(&self, slot: EquipSlot) -> Option<&LoadoutItem> {
        self.items.get(&slot)
    }

    pub fn slot_mut(&mut self, slot: EquipSlot) -> Option<&mut LoadoutItem> {
        self.items.get_mut(&slot)
    }

    pub fn item(&self, slot: EquipSlot) -> Option<&Item> {
        self.slot(slot).and_then(|entry| entry.item.as_ref())
    }

    /// Iterates occupied slots in slot order.
    pub fn equipped(&self) -> impl Iterator<Item = (EquipSlot, &LoadoutItem, &Item)> {
        self.items
            .iter()
            .filter_map(|(slot, entry)| entry.item.as_ref().map(|item| (*slot, entry, item)))
    }

    pub fn renown_ability(&self, ability: RenownAbility) -> u8 {
        self.renown_abilities.get(&ability).copied().unwrap_or(0)
    }

    /// Empties every slot.
    pub fn clear_items(&mut self) {
        self.items = empty_slots();
    }

    /// Copies the build (career, level, renown, renown abilities, items and
    /// talismans) into a new identity. Character provenance is not copied.
    pub fn duplicate(&self, id: LoadoutId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            career: self.career,
            level: self.level,
            renown_rank: self.renown_rank,
            items: self.items.clone(),
            renown_abilities: self.renown_abilities.clone(),
            is_from_character: false,
            character_name: None,
        }
    }
}

fn empty_slots() -> BTreeMap<EquipSlot, LoadoutItem> {
    EquipSlot::LOADOUT
        .iter()
        .map(|slot| (*slot, LoadoutItem::empty()))
        .collect()
}

/// One of the two comparison sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Wire prefix (`a` / `b`).
    pub fn key(self) -> &'static str {
        match self {
            Side::A => "a",
            Side::B => "b",
        }
    }

    /// Default loadout name for the side ("Side A").
    pub fn default_name(self) -> String {
        format!("Side {self}")
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// A value per side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideMap<T> {
    pub a: T,
    pub b: T,
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}
