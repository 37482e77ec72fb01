//! Rules tables loader.
//!
//! Assembles [`RulesTables`] from three files:
//! `careers.ron` (career → races), `renown.ron` (ability tables) and
//! `two_handed.toml` (two-handed weapon calibration).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use planner_core::{Career, Race, RenownAbility, RenownTable, RulesTables, TwoHandedRule};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Career table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CareerTableRon {
    career_races: BTreeMap<Career, BTreeSet<Race>>,
}

/// Renown table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RenownTablesRon {
    abilities: BTreeMap<RenownAbility, RenownTable>,
}

/// Loader for the static rules tables.
pub struct RulesLoader;

impl RulesLoader {
    /// Load and assemble all three rules files.
    pub fn load(careers: &Path, renown: &Path, two_handed: &Path) -> LoadResult<RulesTables> {
        Self::assemble(
            &read_file(careers)?,
            &read_file(renown)?,
            &read_file(two_handed)?,
        )
    }

    /// Assemble rules tables from file contents.
    pub fn assemble(careers: &str, renown: &str, two_handed: &str) -> LoadResult<RulesTables> {
        let mut tables = RulesTables::new();
        tables.career_races = Self::parse_career_races(careers)?;
        tables.renown = Self::parse_renown(renown)?;
        tables.two_handed = Self::parse_two_handed(two_handed)?;
        Ok(tables)
    }

    pub fn parse_career_races(content: &str) -> LoadResult<BTreeMap<Career, BTreeSet<Race>>> {
        let table: CareerTableRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse career table RON: {}", e))?;

        for (career, races) in &table.career_races {
            if races.is_empty() {
                anyhow::bail!("Career {} has no playable race", career);
            }
        }

        Ok(table.career_races)
    }

    pub fn parse_renown(content: &str) -> LoadResult<BTreeMap<RenownAbility, RenownTable>> {
        let tables: RenownTablesRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse renown tables RON: {}", e))?;

        for (ability, table) in &tables.abilities {
            if table.values.is_empty() {
                anyhow::bail!("Renown table for {} has no levels", ability);
            }
            if !table.costs.is_empty() && table.costs.len() != table.values.len() {
                anyhow::bail!(
                    "Renown table for {} has {} values but {} costs",
                    ability,
                    table.values.len(),
                    table.costs.len()
                );
            }
        }

        Ok(tables.abilities)
    }

    pub fn parse_two_handed(content: &str) -> LoadResult<TwoHandedRule> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse two-handed rule TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use planner_core::{EquipSlot, Item, ItemId, ItemType, Stat};
    use strum::IntoEnumIterator;

    fn builtin_tables() -> RulesTables {
        RulesLoader::assemble(
            builtin::CAREERS_RON,
            builtin::RENOWN_RON,
            builtin::TWO_HANDED_TOML,
        )
        .expect("builtin rules parse")
    }

    #[test]
    fn builtin_tables_cover_every_career_and_ability() {
        let tables = builtin_tables();
        for career in Career::iter() {
            assert!(tables.races_for(career).next().is_some(), "{career} has no race");
        }
        for ability in RenownAbility::iter() {
            assert!(tables.renown_table(ability).is_some(), "{ability} has no table");
        }
        assert_eq!(tables.races_for(Career::WitchHunter).collect::<Vec<_>>(), [Race::Empire]);
        let might = tables.renown_table(RenownAbility::Might).expect("might");
        assert_eq!(might.stat, Stat::Strength);
        assert_eq!(might.max_level(), 5);
    }

    #[test]
    fn builtin_two_handed_rule_matches_default_calibration() {
        let tables = builtin_tables();
        assert_eq!(tables.two_handed, TwoHandedRule::default());

        let great_axe = Item::new(ItemId(1), "Axe", ItemType::Axe, EquipSlot::MainHand)
            .with_dps(700)
            .with_talisman_slots(2);
        assert!(tables.two_handed.is_two_handed(&great_axe));
    }

    #[test]
    fn mismatched_cost_table_is_rejected() {
        let bad = "(abilities: { might: (stat: strength, values: [0, 4, 8], costs: [0, 1]) })";
        let err = RulesLoader::parse_renown(bad).unwrap_err();
        assert!(err.to_string().contains("costs"));
    }

    #[test]
    fn career_without_races_is_rejected() {
        assert!(RulesLoader::parse_career_races("(career_races: { chosen: [] })").is_err());
    }
}
