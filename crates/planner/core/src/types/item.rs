//! Item records as served by the item catalog.
//!
//! Items are immutable values. A loadout stores whole `Item` copies rather
//! than handles so stats can be computed from a loadout snapshot alone.

use std::collections::BTreeSet;
use std::fmt;

use strum::{Display, EnumString};

use super::{Career, EquipSlot, Race};
use crate::stats::Stat;

/// Catalog identifier of an item (also used for talismans).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of an item set. Set identity is by id only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SetId(pub u32);

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item types as reported by the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemType {
    // Melee weapons
    Sword,
    Axe,
    Hammer,
    Dagger,
    Spear,
    Staff,
    Shield,

    // Ranged weapons
    Bow,
    Crossbow,
    Gun,
    Pistol,
    RepeatingCrossbow,
    ThrowingAxe,
    ThrowingStar,

    // Armor
    Robe,
    LightArmor,
    MediumArmor,
    MediumRobe,
    HeavyArmor,

    Jewellery,
    Enhancement,
    Trophy,
    Charm,

    #[default]
    Other,
}

impl ItemType {
    pub fn is_weapon(self) -> bool {
        matches!(
            self,
            ItemType::Sword
                | ItemType::Axe
                | ItemType::Hammer
                | ItemType::Dagger
                | ItemType::Spear
                | ItemType::Staff
                | ItemType::Bow
                | ItemType::Crossbow
                | ItemType::Gun
                | ItemType::Pistol
                | ItemType::RepeatingCrossbow
                | ItemType::ThrowingAxe
                | ItemType::ThrowingStar
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemRarity {
    #[default]
    Utility,
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Mythic,
}

/// One stat line on an item, talisman or set bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStat {
    pub stat: Stat,
    pub value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub percentage: bool,
}

impl ItemStat {
    pub const fn flat(stat: Stat, value: i32) -> Self {
        Self {
            stat,
            value,
            percentage: false,
        }
    }

    pub const fn percent(stat: Stat, value: i32) -> Self {
        Self {
            stat,
            value,
            percentage: true,
        }
    }
}

/// Named ability or buff granted by an item or set bonus. Display only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemAbility {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

/// Effect of one set-bonus threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetBonusEffect {
    Stat(ItemStat),
    Ability(ItemAbility),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetBonus {
    pub items_required: u8,
    pub bonus: SetBonusEffect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSet {
    pub id: SetId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u8,
    pub bonuses: Vec<SetBonus>,
}

impl ItemSet {
    pub fn new(id: SetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: 0,
            bonuses: Vec::new(),
        }
    }

    pub fn with_stat_bonus(mut self, items_required: u8, stat: ItemStat) -> Self {
        self.bonuses.push(SetBonus {
            items_required,
            bonus: SetBonusEffect::Stat(stat),
        });
        self
    }

    pub fn with_ability_bonus(mut self, items_required: u8, ability: ItemAbility) -> Self {
        self.bonuses.push(SetBonus {
            items_required,
            bonus: SetBonusEffect::Ability(ability),
        });
        self
    }
}

/// Immutable item record.
///
/// `dps` is stored in tenths (a displayed 70.0 DPS is `700`), `speed` in
/// hundredths of a second.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub item_type: ItemType,
    pub slot: Option<EquipSlot>,
    pub rarity: ItemRarity,
    pub armor: u32,
    pub dps: u32,
    pub speed: u32,
    pub level_requirement: u8,
    pub renown_rank_requirement: u8,
    pub item_level: u8,
    pub unique_equipped: bool,
    pub stats: Vec<ItemStat>,
    pub career_restriction: BTreeSet<Career>,
    pub race_restriction: BTreeSet<Race>,
    pub talisman_slots: u8,
    pub item_set: Option<ItemSet>,
    pub abilities: Vec<ItemAbility>,
    pub buffs: Vec<ItemAbility>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, item_type: ItemType, slot: EquipSlot) -> Self {
        Self {
            id,
            name: name.into(),
            item_type,
            slot: Some(slot),
            ..Self::default()
        }
    }

    pub fn with_stat(mut self, stat: ItemStat) -> Self {
        self.stats.push(stat);
        self
    }

    pub fn with_armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_dps(mut self, dps: u32) -> Self {
        self.dps = dps;
        self
    }

    pub fn with_requirements(mut self, level: u8, renown_rank: u8) -> Self {
        self.level_requirement = level;
        self.renown_rank_requirement = renown_rank;
        self
    }

    pub fn with_talisman_slots(mut self, slots: u8) -> Self {
        self.talisman_slots = slots;
        self
    }

    pub fn with_set(mut self, set: ItemSet) -> Self {
        self.item_set = Some(set);
        self
    }

    pub fn with_careers(mut self, careers: impl IntoIterator<Item = Career>) -> Self {
        self.career_restriction.extend(careers);
        self
    }

    pub fn with_races(mut self, races: impl IntoIterator<Item = Race>) -> Self {
        self.race_restriction.extend(races);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique_equipped = true;
        self
    }

    /// Whether the item's level and renown requirements are met.
    pub fn is_eligible(&self, level: u8, renown_rank: u8) -> bool {
        self.level_requirement <= level && self.renown_rank_requirement <= renown_rank
    }

    pub fn set_id(&self) -> Option<SetId> {
        self.item_set.as_ref().map(|set| set.id)
    }
}
