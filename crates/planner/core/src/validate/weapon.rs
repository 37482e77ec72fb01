//! Two-handed inference.
//!
//! The catalog does not say whether a weapon is two-handed. Some types are
//! always two-handed; swords, axes and hammers come in both flavors and are
//! told apart by DPS, compared against a threshold for the weapon's tier
//! (its talisman socket count). Thresholds are calibration data.

use std::collections::BTreeSet;

use crate::types::{Item, ItemType};

/// DPS threshold for one talisman-socket tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DpsTier {
    pub talisman_slots: u8,
    /// Minimum DPS (tenths) at which an ambiguous weapon is two-handed.
    pub min_two_handed_dps: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TwoHandedRule {
    /// Types that are two-handed regardless of stats.
    pub always: BTreeSet<ItemType>,
    /// Types that may be either; decided by DPS.
    pub ambiguous: BTreeSet<ItemType>,
    pub tiers: Vec<DpsTier>,
    /// Threshold for tiers missing from `tiers`.
    pub default_min_dps: u32,
}

impl TwoHandedRule {
    pub fn is_two_handed(&self, item: &Item) -> bool {
        if self.always.contains(&item.item_type) {
            return true;
        }
        if !self.ambiguous.contains(&item.item_type) {
            return false;
        }
        item.dps >= self.threshold_for(item.talisman_slots)
    }

    fn threshold_for(&self, talisman_slots: u8) -> u32 {
        self.tiers
            .iter()
            .find(|tier| tier.talisman_slots == talisman_slots)
            .map_or(self.default_min_dps, |tier| tier.min_two_handed_dps)
    }
}

impl Default for TwoHandedRule {
    fn default() -> Self {
        Self {
            always: BTreeSet::from([ItemType::Staff]),
            ambiguous: BTreeSet::from([ItemType::Sword, ItemType::Axe, ItemType::Hammer]),
            tiers: vec![
                DpsTier {
                    talisman_slots: 0,
                    min_two_handed_dps: 350,
                },
                DpsTier {
                    talisman_slots: 1,
                    min_two_handed_dps: 450,
                },
                DpsTier {
                    talisman_slots: 2,
                    min_two_handed_dps: 550,
                },
            ],
            default_min_dps: 600,
        }
    }
}
