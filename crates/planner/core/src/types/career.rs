//! Careers, races and realms.
//!
//! Careers are the only character identity the planner tracks. Which races a
//! career may be is *not* encoded here: that table is configuration data and
//! lives in [`crate::RulesTables`].

use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// The two warring factions every career belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Realm {
    Order,
    Destruction,
}

/// Playable careers.
///
/// The snake_case string form (`witch_hunter`) is the stable key used by the
/// URL wire format and the content files.
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
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Career {
    // Order
    Ironbreaker,
    Slayer,
    RunePriest,
    Engineer,
    WitchHunter,
    KnightOfTheBlazingSun,
    BrightWizard,
    WarriorPriest,
    Swordmaster,
    ShadowWarrior,
    WhiteLion,
    Archmage,

    // Destruction
    BlackOrc,
    Choppa,
    Shaman,
    SquigHerder,
    Chosen,
    Marauder,
    Zealot,
    Magus,
    Blackguard,
    WitchElf,
    DiscipleOfKhaine,
    Sorcerer,
}

impl Career {
    /// Stable key used on the wire (`witch_hunter`).
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn realm(self) -> Realm {
        match self {
            Career::Ironbreaker
            | Career::Slayer
            | Career::RunePriest
            | Career::Engineer
            | Career::WitchHunter
            | Career::KnightOfTheBlazingSun
            | Career::BrightWizard
            | Career::WarriorPriest
            | Career::Swordmaster
            | Career::ShadowWarrior
            | Career::WhiteLion
            | Career::Archmage => Realm::Order,

            Career::BlackOrc
            | Career::Choppa
            | Career::Shaman
            | Career::SquigHerder
            | Career::Chosen
            | Career::Marauder
            | Career::Zealot
            | Career::Magus
            | Career::Blackguard
            | Career::WitchElf
            | Career::DiscipleOfKhaine
            | Career::Sorcerer => Realm::Destruction,
        }
    }
}

/// Playable races, as used by item race restrictions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Race {
    Dwarf,
    Empire,
    HighElf,
    Orc,
    Goblin,
    Chaos,
    DarkElf,
}
