//! URL query-string wire format for the two comparison sides.
//!
//! ```text
//! a.c=witch_hunter&a.l=40&a.r=80
//! &a.i.main_hand=4021&a.t.main_hand.0=9012
//! &a.ra.might=3
//! &b.c=chosen&...
//! ```
//!
//! Sides are independent: a side is only decoded when at least one key
//! carries its prefix, so a URL holding only `b.*` keys leaves side A alone.
//! Trophy slots are neither emitted nor accepted. Unknown keys and values
//! that do not parse are ignored.

use std::collections::BTreeMap;
use std::str::FromStr;

use strum::IntoEnumIterator;
use url::form_urlencoded;

use crate::config::PlannerConfig;
use crate::stats::RenownAbility;
use crate::types::{Career, EquipSlot, ItemId, Loadout, Side, SideMap};

/// Everything the URL carries for one side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideUrlState {
    pub career: Option<Career>,
    pub level: Option<u8>,
    pub renown_rank: Option<u8>,
    pub items: BTreeMap<EquipSlot, ItemId>,
    pub talismans: BTreeMap<(EquipSlot, usize), ItemId>,
    /// Full mapping; abilities absent from the URL read 0.
    pub renown_abilities: BTreeMap<RenownAbility, u8>,
}

impl SideUrlState {
    fn empty() -> Self {
        Self {
            renown_abilities: RenownAbility::iter().map(|ability| (ability, 0)).collect(),
            ..Self::default()
        }
    }

    /// Captures the URL-visible part of a loadout.
    pub fn from_loadout(loadout: &Loadout) -> Self {
        let mut state = Self::empty();
        state.career = loadout.career;
        state.level = Some(loadout.level);
        state.renown_rank = Some(loadout.renown_rank);
        for (slot, entry, item) in loadout.equipped() {
            if slot.is_trophy() {
                continue;
            }
            state.items.insert(slot, item.id);
            for (index, talisman) in entry.talismans.iter().enumerate() {
                if let Some(talisman) = talisman {
                    state.talismans.insert((slot, index), talisman.id);
                }
            }
        }
        for (ability, level) in &loadout.renown_abilities {
            state.renown_abilities.insert(*ability, *level);
        }
        state
    }
}

/// Decoded URL state: `None` for a side the URL does not mention.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlState {
    pub sides: SideMap<Option<SideUrlState>>,
}

impl UrlState {
    pub fn side(&self, side: Side) -> Option<&SideUrlState> {
        self.sides[side].as_ref()
    }
}

/// Encodes both sides into a query string (no leading `?`).
pub fn encode(state: &UrlState) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for side in Side::BOTH {
        if let Some(side_state) = state.side(side) {
            encode_side(&mut query, side.key(), side_state);
        }
    }
    query.finish()
}

fn encode_side(
    query: &mut form_urlencoded::Serializer<'_, String>,
    prefix: &str,
    state: &SideUrlState,
) {
    if let Some(career) = state.career {
        query.append_pair(&format!("{prefix}.c"), career.key());
    }
    if let Some(level) = state.level {
        query.append_pair(&format!("{prefix}.l"), &level.to_string());
    }
    if let Some(rank) = state.renown_rank {
        query.append_pair(&format!("{prefix}.r"), &rank.to_string());
    }
    for (slot, id) in state.items.iter().filter(|(slot, _)| !slot.is_trophy()) {
        query.append_pair(&format!("{prefix}.i.{}", slot.key()), &id.to_string());
    }
    for ((slot, index), id) in state.talismans.iter().filter(|((slot, _), _)| !slot.is_trophy()) {
        query.append_pair(&format!("{prefix}.t.{}.{index}", slot.key()), &id.to_string());
    }
    for (ability, level) in state.renown_abilities.iter().filter(|(_, level)| **level > 0) {
        query.append_pair(&format!("{prefix}.ra.{}", ability.key()), &level.to_string());
    }
}

/// Decodes a query string (a leading `?` is accepted).
pub fn decode(query: &str) -> UrlState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = UrlState::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let mut parts = key.split('.');
        let side = match parts.next() {
            Some("a") => Side::A,
            Some("b") => Side::B,
            _ => continue,
        };
        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            continue;
        }
        let side_state = state.sides[side].get_or_insert_with(SideUrlState::empty);
        apply_pair(side_state, &rest, &value);
    }

    state
}

fn apply_pair(state: &mut SideUrlState, key: &[&str], value: &str) {
    match key {
        ["c"] => {
            if let Ok(career) = Career::from_str(value) {
                state.career = Some(career);
            }
        }
        ["l"] => {
            if let Ok(level) = value.parse::<u8>() {
                state.level = Some(PlannerConfig::clamp_level(level));
            }
        }
        ["r"] => {
            if let Ok(rank) = value.parse::<u8>() {
                state.renown_rank = Some(PlannerConfig::clamp_renown_rank(rank));
            }
        }
        ["i", slot] => {
            if let (Some(slot), Some(id)) = (url_slot(slot), item_id(value)) {
                state.items.insert(slot, id);
            }
        }
        ["t", slot, index] => {
            if let (Some(slot), Ok(index), Some(id)) =
                (url_slot(slot), index.parse::<usize>(), item_id(value))
            {
                state.talismans.insert((slot, index), id);
            }
        }
        ["ra", ability] => {
            if let (Ok(ability), Ok(level)) = (RenownAbility::from_str(ability), value.parse::<u8>())
            {
                state.renown_abilities.insert(ability, level);
            }
        }
        _ => {}
    }
}

fn url_slot(key: &str) -> Option<EquipSlot> {
    EquipSlot::from_str(key)
        .ok()
        .filter(|slot| slot.is_loadout_slot() && !slot.is_trophy())
}

fn item_id(value: &str) -> Option<ItemId> {
    value.parse().ok().map(ItemId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Item, ItemType, LoadoutId};

    fn equip(loadout: &mut Loadout, slot: EquipSlot, item: Item) {
        if let Some(entry) = loadout.slot_mut(slot) {
            entry.replace(Some(item));
        }
    }

    fn sample() -> Loadout {
        let mut loadout = Loadout::new(LoadoutId(1), "url", 38, 61);
        loadout.career = Some(Career::WitchHunter);
        equip(
            &mut loadout,
            EquipSlot::MainHand,
            Item::new(ItemId(4021), "Rapier", ItemType::Sword, EquipSlot::EitherHand).with_talisman_slots(1),
        );
        if let Some(entry) = loadout.slot_mut(EquipSlot::MainHand) {
            entry.talismans[0] = Some(Item::new(ItemId(9012), "Gem", ItemType::Enhancement, EquipSlot::MainHand));
        }
        equip(&mut loadout, EquipSlot::Body, Item::new(ItemId(5100), "Coat", ItemType::MediumArmor, EquipSlot::Body));
        equip(&mut loadout, EquipSlot::Pocket1, Item::new(ItemId(7300), "Charm", ItemType::Charm, EquipSlot::Pocket1));
        equip(&mut loadout, EquipSlot::Trophy2, Item::new(ItemId(8800), "Skull", ItemType::Trophy, EquipSlot::Trophy2));
        loadout.renown_abilities.insert(RenownAbility::Might, 3);
        loadout.renown_abilities.insert(RenownAbility::Vigor, 0);
        loadout
    }

    #[test]
    fn round_trip_drops_only_trophies() {
        let loadout = sample();
        let mut state = UrlState::default();
        state.sides.a = Some(SideUrlState::from_loadout(&loadout));

        let query = encode(&state);
        assert!(!query.contains("trophy"));
        assert!(!query.contains("8800"));
        assert!(!query.contains("vigor"));

        let decoded = decode(&query);
        let side = decoded.side(Side::A).expect("side a present");
        assert_eq!(side.career, Some(Career::WitchHunter));
        assert_eq!(side.level, Some(38));
        assert_eq!(side.renown_rank, Some(61));
        assert_eq!(side.items.get(&EquipSlot::MainHand), Some(&ItemId(4021)));
        assert_eq!(side.items.get(&EquipSlot::Body), Some(&ItemId(5100)));
        assert_eq!(side.items.get(&EquipSlot::Pocket1), Some(&ItemId(7300)));
        assert_eq!(side.items.len(), 3);
        assert_eq!(side.talismans.get(&(EquipSlot::MainHand, 0)), Some(&ItemId(9012)));
        assert_eq!(side.renown_abilities.get(&RenownAbility::Might), Some(&3));
        assert_eq!(side.renown_abilities.get(&RenownAbility::Vigor), Some(&0));
        assert_eq!(decoded.side(Side::B), None);
    }

    #[test]
    fn sides_are_independent() {
        let mut other = sample();
        other.career = Some(Career::Chosen);
        let mut state = UrlState::default();
        state.sides.a = Some(SideUrlState::from_loadout(&sample()));
        state.sides.b = Some(SideUrlState::from_loadout(&other));

        let decoded = decode(&format!("?{}", encode(&state)));
        assert_eq!(decoded.side(Side::A).and_then(|s| s.career), Some(Career::WitchHunter));
        assert_eq!(decoded.side(Side::B).and_then(|s| s.career), Some(Career::Chosen));
        assert_eq!(decoded, state);
    }

    #[test]
    fn trophy_and_garbage_keys_are_ignored() {
        let decoded = decode("a.i.trophy1=5&a.i.either_hand=6&a.l=abc&a.x=1&c.l=3&a.t.body.x=4");
        let side = decoded.side(Side::A).expect("prefix present");
        assert!(side.items.is_empty());
        assert!(side.talismans.is_empty());
        assert_eq!(side.level, None);
        assert_eq!(decoded.side(Side::B), None);
    }

    #[test]
    fn absent_prefix_means_absent_side() {
        let decoded = decode("b.l=12");
        assert_eq!(decoded.side(Side::A), None);
        assert_eq!(decoded.side(Side::B).and_then(|s| s.level), Some(12));
    }
}
