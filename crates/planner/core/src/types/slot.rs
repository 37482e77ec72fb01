//! Equipment slots.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Slot designations.
///
/// Every variant except [`EquipSlot::EitherHand`] is a real loadout slot.
/// `EitherHand` only ever appears as an item's own slot designation, for
/// weapons that may be wielded in either hand.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipSlot {
    Event,
    MainHand,
    OffHand,
    RangedWeapon,
    Body,
    Gloves,
    Boots,
    Helm,
    Shoulder,
    Pocket1,
    Pocket2,
    Back,
    Belt,
    Jewellery1,
    Jewellery2,
    Jewellery3,
    Jewellery4,
    Trophy1,
    Trophy2,
    Trophy3,
    Trophy4,
    Trophy5,
    EitherHand,
}

/// Coarse grouping of slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotCategory {
    Weapon,
    Armor,
    Jewellery,
    Pocket,
    Trophy,
    Event,
}

impl EquipSlot {
    /// Slots every loadout carries, in display order.
    pub const LOADOUT: [EquipSlot; 22] = [
        EquipSlot::Event,
        EquipSlot::MainHand,
        EquipSlot::OffHand,
        EquipSlot::RangedWeapon,
        EquipSlot::Body,
        EquipSlot::Gloves,
        EquipSlot::Boots,
        EquipSlot::Helm,
        EquipSlot::Shoulder,
        EquipSlot::Pocket1,
        EquipSlot::Pocket2,
        EquipSlot::Back,
        EquipSlot::Belt,
        EquipSlot::Jewellery1,
        EquipSlot::Jewellery2,
        EquipSlot::Jewellery3,
        EquipSlot::Jewellery4,
        EquipSlot::Trophy1,
        EquipSlot::Trophy2,
        EquipSlot::Trophy3,
        EquipSlot::Trophy4,
        EquipSlot::Trophy5,
    ];

    /// Stable key used on the wire (`main_hand`).
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn category(self) -> SlotCategory {
        match self {
            EquipSlot::MainHand
            | EquipSlot::OffHand
            | EquipSlot::RangedWeapon
            | EquipSlot::EitherHand => SlotCategory::Weapon,
            EquipSlot::Body
            | EquipSlot::Gloves
            | EquipSlot::Boots
            | EquipSlot::Helm
            | EquipSlot::Shoulder
            | EquipSlot::Back
            | EquipSlot::Belt => SlotCategory::Armor,
            EquipSlot::Jewellery1
            | EquipSlot::Jewellery2
            | EquipSlot::Jewellery3
            | EquipSlot::Jewellery4 => SlotCategory::Jewellery,
            EquipSlot::Pocket1 | EquipSlot::Pocket2 => SlotCategory::Pocket,
            EquipSlot::Trophy1
            | EquipSlot::Trophy2
            | EquipSlot::Trophy3
            | EquipSlot::Trophy4
            | EquipSlot::Trophy5 => SlotCategory::Trophy,
            EquipSlot::Event => SlotCategory::Event,
        }
    }

    /// Trophy slots are cosmetic: never imported, never put on the wire.
    pub fn is_trophy(self) -> bool {
        self.category() == SlotCategory::Trophy
    }

    pub fn is_loadout_slot(self) -> bool {
        self != EquipSlot::EitherHand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn loadout_slots_cover_everything_but_either_hand() {
        let all: Vec<_> = EquipSlot::iter().filter(|s| s.is_loadout_slot()).collect();
        assert_eq!(all.as_slice(), EquipSlot::LOADOUT.as_slice());
    }

    #[test]
    fn trophy_category() {
        assert!(EquipSlot::Trophy3.is_trophy());
        assert!(!EquipSlot::Pocket1.is_trophy());
        assert_eq!(EquipSlot::MainHand.key(), "main_hand");
    }
}
