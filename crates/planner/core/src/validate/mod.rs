//! Equip validation.
//!
//! Pure predicates run before any item or talisman write. Each returns
//! `Ok(())` or the [`EquipError`] naming the rule that rejected the write; the
//! composite [`validate_item`] and [`validate_talisman`] stop at the first
//! failure. Validation only ever looks at the target loadout.

mod weapon;

pub use weapon::{DpsTier, TwoHandedRule};

use crate::error::EquipError;
use crate::tables::RulesTables;
use crate::types::{EquipSlot, Item, Loadout};

/// Where a write lands inside a loadout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquipTarget {
    Item(EquipSlot),
    Talisman { slot: EquipSlot, index: usize },
}

/// Career and race gating.
///
/// A non-empty career restriction must contain the loadout's career. A
/// non-empty race restriction must share at least one race with the races
/// the loadout's career may be.
pub fn can_equip_by_restriction(
    item: &Item,
    loadout: &Loadout,
    tables: &RulesTables,
) -> Result<(), EquipError> {
    if !item.career_restriction.is_empty()
        && !loadout
            .career
            .is_some_and(|career| item.career_restriction.contains(&career))
    {
        return Err(EquipError::CareerMismatch {
            item: item.id,
            item_name: item.name.clone(),
            career: loadout.career,
        });
    }

    if !item.race_restriction.is_empty() {
        let allowed = loadout.career.is_some_and(|career| {
            tables
                .races_for(career)
                .any(|race| item.race_restriction.contains(&race))
        });
        if !allowed {
            return Err(EquipError::RaceMismatch {
                item: item.id,
                item_name: item.name.clone(),
                career: loadout.career,
            });
        }
    }

    Ok(())
}

/// Unique-equipped gating, scoped to `loadout`.
///
/// Scans every item and talisman for the same id, ignoring `target` itself so
/// that re-equipping into the occupied position is a replacement, not a
/// duplicate.
pub fn can_equip_unique(
    item: &Item,
    loadout: &Loadout,
    target: EquipTarget,
) -> Result<(), EquipError> {
    if !item.unique_equipped {
        return Ok(());
    }

    for (slot, entry) in &loadout.items {
        if target != EquipTarget::Item(*slot)
            && entry.item.as_ref().is_some_and(|worn| worn.id == item.id)
        {
            return Err(duplicate(item, *slot));
        }
        for (index, talisman) in entry.talismans.iter().enumerate() {
            let here = EquipTarget::Talisman { slot: *slot, index };
            if here != target && talisman.as_ref().is_some_and(|worn| worn.id == item.id) {
                return Err(duplicate(item, *slot));
            }
        }
    }

    Ok(())
}

fn duplicate(item: &Item, slot: EquipSlot) -> EquipError {
    EquipError::DuplicateUnique {
        item: item.id,
        item_name: item.name.clone(),
        slot,
    }
}

/// Hand gating: nothing may go into the off hand while the main hand holds a
/// weapon inferred two-handed. Main-hand writes are unrestricted, which is
/// what admits `EitherHand` weapons there.
pub fn can_equip_weapon_slot(
    _item: &Item,
    slot: EquipSlot,
    loadout: &Loadout,
    rule: &TwoHandedRule,
) -> Result<(), EquipError> {
    if slot != EquipSlot::OffHand {
        return Ok(());
    }
    match loadout.item(EquipSlot::MainHand) {
        Some(main_hand) if rule.is_two_handed(main_hand) => Err(EquipError::TwoHandedConflict {
            main_hand: main_hand.name.clone(),
        }),
        _ => Ok(()),
    }
}

/// Every predicate that gates putting `item` into `slot`.
pub fn validate_item(
    item: &Item,
    slot: EquipSlot,
    loadout: &Loadout,
    tables: &RulesTables,
) -> Result<(), EquipError> {
    can_equip_by_restriction(item, loadout, tables)?;
    can_equip_unique(item, loadout, EquipTarget::Item(slot))?;
    can_equip_weapon_slot(item, slot, loadout, &tables.two_handed)
}

/// Socket checks plus the restriction and uniqueness predicates, applied to
/// the talisman.
pub fn validate_talisman(
    talisman: &Item,
    slot: EquipSlot,
    index: usize,
    loadout: &Loadout,
    tables: &RulesTables,
) -> Result<(), EquipError> {
    check_socket(slot, index, loadout)?;
    can_equip_by_restriction(talisman, loadout, tables)?;
    can_equip_unique(talisman, loadout, EquipTarget::Talisman { slot, index })
}

/// The slot holds an item and `index` addresses one of its sockets.
pub fn check_socket(slot: EquipSlot, index: usize, loadout: &Loadout) -> Result<(), EquipError> {
    let entry = loadout
        .slot(slot)
        .filter(|entry| entry.item.is_some())
        .ok_or(EquipError::NoItemInSlot { slot })?;
    if index >= entry.talismans.len() {
        return Err(EquipError::TalismanIndexOutOfRange {
            slot,
            index,
            capacity: entry.talismans.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Career, ItemId, ItemType, LoadoutId, Race};

    fn tables() -> RulesTables {
        RulesTables::new()
            .with_career_races(Career::WitchHunter, [Race::Empire])
            .with_career_races(Career::Ironbreaker, [Race::Dwarf])
    }

    fn loadout(career: Option<Career>) -> Loadout {
        let mut loadout = Loadout::new(LoadoutId(1), "test", 40, 80);
        loadout.career = career;
        loadout
    }

    fn item(id: u32, item_type: ItemType, slot: EquipSlot) -> Item {
        Item::new(ItemId(id), format!("item {id}"), item_type, slot)
    }

    fn equip(loadout: &mut Loadout, slot: EquipSlot, item: Item) {
        if let Some(entry) = loadout.slot_mut(slot) {
            entry.replace(Some(item));
        }
    }

    #[test]
    fn career_restriction() {
        let hat = item(1, ItemType::LightArmor, EquipSlot::Helm).with_careers([Career::WitchHunter]);
        assert!(can_equip_by_restriction(&hat, &loadout(Some(Career::WitchHunter)), &tables()).is_ok());

        let err = can_equip_by_restriction(&hat, &loadout(Some(Career::Ironbreaker)), &tables())
            .unwrap_err();
        assert!(matches!(err, EquipError::CareerMismatch { .. }));

        let err = can_equip_by_restriction(&hat, &loadout(None), &tables()).unwrap_err();
        assert!(matches!(err, EquipError::CareerMismatch { career: None, .. }));
    }

    #[test]
    fn race_restriction_uses_career_table() {
        let beard_comb = item(2, ItemType::Jewellery, EquipSlot::Jewellery1).with_races([Race::Dwarf]);
        assert!(can_equip_by_restriction(&beard_comb, &loadout(Some(Career::Ironbreaker)), &tables()).is_ok());

        let err = can_equip_by_restriction(&beard_comb, &loadout(Some(Career::WitchHunter)), &tables())
            .unwrap_err();
        assert!(matches!(err, EquipError::RaceMismatch { .. }));

        // Careers missing from the table permit no races.
        let err = can_equip_by_restriction(&beard_comb, &loadout(Some(Career::Slayer)), &tables())
            .unwrap_err();
        assert!(matches!(err, EquipError::RaceMismatch { .. }));
    }

    #[test]
    fn unrestricted_items_pass_without_career() {
        let ring = item(3, ItemType::Jewellery, EquipSlot::Jewellery2);
        assert!(can_equip_by_restriction(&ring, &loadout(None), &tables()).is_ok());
    }

    #[test]
    fn unique_is_loadout_scoped() {
        let ring = item(4, ItemType::Jewellery, EquipSlot::Jewellery1).unique();
        let mut first = loadout(None);
        let second = loadout(None);
        equip(&mut first, EquipSlot::Jewellery1, ring.clone());

        let err = can_equip_unique(&ring, &first, EquipTarget::Item(EquipSlot::Jewellery2)).unwrap_err();
        assert_eq!(
            err,
            EquipError::DuplicateUnique {
                item: ItemId(4),
                item_name: "item 4".into(),
                slot: EquipSlot::Jewellery1,
            }
        );

        // Replacing the occupant of the same slot is fine.
        assert!(can_equip_unique(&ring, &first, EquipTarget::Item(EquipSlot::Jewellery1)).is_ok());
        // Another loadout is untouched by the first.
        assert!(can_equip_unique(&ring, &second, EquipTarget::Item(EquipSlot::Jewellery2)).is_ok());
    }

    #[test]
    fn unique_talismans_are_scanned() {
        let socketed = item(5, ItemType::HeavyArmor, EquipSlot::Body).with_talisman_slots(2);
        let talisman = item(6, ItemType::Enhancement, EquipSlot::Body).unique();
        let mut build = loadout(None);
        equip(&mut build, EquipSlot::Body, socketed);
        if let Some(entry) = build.slot_mut(EquipSlot::Body) {
            entry.talismans[0] = Some(talisman.clone());
        }

        let second_socket = EquipTarget::Talisman {
            slot: EquipSlot::Body,
            index: 1,
        };
        assert!(can_equip_unique(&talisman, &build, second_socket).is_err());
    }

    #[test]
    fn off_hand_blocked_by_two_handed_main_hand() {
        let rule = TwoHandedRule::default();
        let shield = item(7, ItemType::Shield, EquipSlot::OffHand);
        let mut build = loadout(None);

        // Empty main hand.
        assert!(can_equip_weapon_slot(&shield, EquipSlot::OffHand, &build, &rule).is_ok());

        // One-handed sword.
        equip(
            &mut build,
            EquipSlot::MainHand,
            item(8, ItemType::Sword, EquipSlot::EitherHand).with_dps(420).with_talisman_slots(1),
        );
        assert!(can_equip_weapon_slot(&shield, EquipSlot::OffHand, &build, &rule).is_ok());

        // DPS-700 axe.
        equip(
            &mut build,
            EquipSlot::MainHand,
            item(9, ItemType::Axe, EquipSlot::MainHand).with_dps(700).with_talisman_slots(3),
        );
        let err = can_equip_weapon_slot(&shield, EquipSlot::OffHand, &build, &rule).unwrap_err();
        assert!(matches!(err, EquipError::TwoHandedConflict { .. }));
    }

    #[test]
    fn either_hand_weapon_accepted_in_main_hand() {
        let rule = TwoHandedRule::default();
        let mut build = loadout(None);
        equip(&mut build, EquipSlot::OffHand, item(10, ItemType::Shield, EquipSlot::OffHand));
        let dagger = item(11, ItemType::Dagger, EquipSlot::EitherHand);
        assert!(can_equip_weapon_slot(&dagger, EquipSlot::MainHand, &build, &rule).is_ok());
    }

    #[test]
    fn talisman_socket_checks() {
        let tables = tables();
        let talisman = item(12, ItemType::Enhancement, EquipSlot::Helm);
        let mut build = loadout(None);

        let err = validate_talisman(&talisman, EquipSlot::Helm, 0, &build, &tables).unwrap_err();
        assert_eq!(err, EquipError::NoItemInSlot { slot: EquipSlot::Helm });

        equip(&mut build, EquipSlot::Helm, item(13, ItemType::HeavyArmor, EquipSlot::Helm).with_talisman_slots(1));
        assert!(validate_talisman(&talisman, EquipSlot::Helm, 0, &build, &tables).is_ok());
        let err = validate_talisman(&talisman, EquipSlot::Helm, 1, &build, &tables).unwrap_err();
        assert!(matches!(err, EquipError::TalismanIndexOutOfRange { capacity: 1, .. }));
    }
}
