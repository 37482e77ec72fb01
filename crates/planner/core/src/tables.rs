//! Static rules data injected into the validator and the stats engine.
//!
//! None of this is computed: the career → races mapping, the renown ability
//! tables and the two-handed calibration are supplied by content files (see
//! the `planner-content` crate) or built by hand in tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::stats::{RenownAbility, RenownTable};
use crate::types::{Career, Race};
use crate::validate::TwoHandedRule;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesTables {
    /// Races each career may be played as.
    pub career_races: BTreeMap<Career, BTreeSet<Race>>,
    pub renown: BTreeMap<RenownAbility, RenownTable>,
    pub two_handed: TwoHandedRule,
}

impl RulesTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Races available to `career`; empty when the table has no entry.
    pub fn races_for(&self, career: Career) -> impl Iterator<Item = Race> + '_ {
        self.career_races
            .get(&career)
            .into_iter()
            .flat_map(|races| races.iter().copied())
    }

    pub fn renown_table(&self, ability: RenownAbility) -> Option<&RenownTable> {
        self.renown.get(&ability)
    }

    pub fn with_career_races(
        mut self,
        career: Career,
        races: impl IntoIterator<Item = Race>,
    ) -> Self {
        self.career_races.entry(career).or_default().extend(races);
        self
    }

    pub fn with_renown_table(mut self, ability: RenownAbility, table: RenownTable) -> Self {
        self.renown.insert(ability, table);
        self
    }

    pub fn with_two_handed_rule(mut self, rule: TwoHandedRule) -> Self {
        self.two_handed = rule;
        self
    }
}
