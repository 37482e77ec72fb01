//! Planner data model.

mod career;
mod item;
mod loadout;
mod slot;

pub use career::{Career, Race, Realm};
pub use item::{
    Item, ItemAbility, ItemId, ItemRarity, ItemSet, ItemStat, ItemType, SetBonus, SetBonusEffect,
    SetId,
};
pub use loadout::{Loadout, LoadoutId, LoadoutItem, Side, SideMap};
pub use slot::{EquipSlot, SlotCategory};
