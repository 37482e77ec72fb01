//! Loadout edits behind the façade's write path.
//!
//! Each function validates first and only then mutates, so a rejected write
//! leaves the loadout untouched. The returned payloads are the specific
//! events for the edit; the caller adds character-mode and stats events.

use planner_core::{
    Career, EquipSlot, Item, Loadout, PlannerConfig, RenownAbility, RulesTables, check_socket,
    validate_item, validate_talisman,
};

use crate::api::{PlannerError, Result};
use crate::events::EventPayload;

/// One edit to a single loadout.
#[derive(Clone, Debug)]
pub(crate) enum Edit {
    Item {
        slot: EquipSlot,
        item: Option<Item>,
    },
    Talisman {
        slot: EquipSlot,
        index: usize,
        talisman: Option<Item>,
    },
    Career(Option<Career>),
    Level(u8),
    RenownRank(u8),
    RenownAbility {
        ability: RenownAbility,
        level: u8,
    },
    Name(String),
    CharacterName(Option<String>),
    ClearItems,
    ClearRenownAbilities,
}

pub(crate) fn apply(
    loadout: &mut Loadout,
    tables: &RulesTables,
    edit: Edit,
) -> Result<Vec<EventPayload>> {
    let id = loadout.id;
    match edit {
        Edit::Item { slot, item } => {
            if let Some(item) = &item {
                validate_item(item, slot, loadout, tables)?;
            }
            let item_id = item.as_ref().map(|item| item.id);
            loadout
                .slot_mut(slot)
                .ok_or(PlannerError::InvalidSlot { slot })?
                .replace(item);
            Ok(vec![EventPayload::ItemUpdated {
                loadout: id,
                slot,
                item: item_id,
            }])
        }
        Edit::Talisman {
            slot,
            index,
            talisman,
        } => {
            match &talisman {
                Some(talisman) => validate_talisman(talisman, slot, index, loadout, tables)?,
                None => check_socket(slot, index, loadout)?,
            }
            let talisman_id = talisman.as_ref().map(|talisman| talisman.id);
            let socket = loadout
                .slot_mut(slot)
                .and_then(|entry| entry.talismans.get_mut(index))
                .ok_or(PlannerError::InvalidSlot { slot })?;
            *socket = talisman;
            Ok(vec![EventPayload::TalismanUpdated {
                loadout: id,
                slot,
                index,
                talisman: talisman_id,
            }])
        }
        Edit::Career(career) => {
            loadout.career = career;
            Ok(vec![EventPayload::CareerChanged {
                loadout: id,
                career,
            }])
        }
        Edit::Level(level) => {
            loadout.level = PlannerConfig::clamp_level(level);
            Ok(vec![EventPayload::LevelChanged {
                loadout: id,
                level: loadout.level,
            }])
        }
        Edit::RenownRank(rank) => {
            loadout.renown_rank = PlannerConfig::clamp_renown_rank(rank);
            Ok(vec![EventPayload::RenownRankChanged {
                loadout: id,
                renown_rank: loadout.renown_rank,
            }])
        }
        Edit::RenownAbility { ability, level } => {
            let max = tables
                .renown_table(ability)
                .map_or(0, |table| table.max_level());
            if level > max {
                return Err(PlannerError::InvalidRenownLevel {
                    ability,
                    level,
                    max,
                });
            }
            if level == 0 {
                loadout.renown_abilities.remove(&ability);
            } else {
                loadout.renown_abilities.insert(ability, level);
            }
            Ok(vec![EventPayload::RenownAbilityChanged {
                loadout: id,
                ability,
                level,
            }])
        }
        Edit::Name(name) => {
            loadout.name = name.clone();
            Ok(vec![EventPayload::LoadoutNameChanged { loadout: id, name }])
        }
        Edit::CharacterName(name) => {
            loadout.character_name = name;
            Ok(Vec::new())
        }
        Edit::ClearItems => {
            let cleared: Vec<EquipSlot> = loadout.equipped().map(|(slot, _, _)| slot).collect();
            loadout.clear_items();
            Ok(cleared
                .into_iter()
                .map(|slot| EventPayload::ItemUpdated {
                    loadout: id,
                    slot,
                    item: None,
                })
                .collect())
        }
        Edit::ClearRenownAbilities => {
            let cleared = std::mem::take(&mut loadout.renown_abilities);
            Ok(cleared
                .into_keys()
                .map(|ability| EventPayload::RenownAbilityChanged {
                    loadout: id,
                    ability,
                    level: 0,
                })
                .collect())
        }
    }
}
