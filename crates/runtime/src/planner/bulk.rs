//! Bulk-apply scopes.

use planner_core::{Career, EquipSlot, Item, LoadoutId, RenownAbility};
use tracing::warn;

use super::writes::Edit;
use super::{Planner, WriteOrigin};
use crate::api::Result;

/// Open bulk-apply scope.
///
/// Writes made through the scope keep character mode and do not touch the
/// URL. Scopes nest; the URL is synced once when the outermost one closes,
/// either through [`BulkApply::finish`] or on drop. Writes made directly on
/// the [`Planner`] while a scope is open still exit character mode.
pub struct BulkApply {
    planner: Planner,
    open: bool,
}

impl BulkApply {
    pub(super) fn new(planner: Planner) -> Self {
        Self {
            planner,
            open: true,
        }
    }

    pub fn set_item(&self, id: LoadoutId, slot: EquipSlot, item: Option<Item>) -> Result<()> {
        self.write(id, Edit::Item { slot, item })
    }

    pub fn set_talisman(
        &self,
        id: LoadoutId,
        slot: EquipSlot,
        index: usize,
        talisman: Option<Item>,
    ) -> Result<()> {
        self.write(
            id,
            Edit::Talisman {
                slot,
                index,
                talisman,
            },
        )
    }

    pub fn set_career(&self, id: LoadoutId, career: Option<Career>) -> Result<()> {
        self.write(id, Edit::Career(career))
    }

    pub fn set_level(&self, id: LoadoutId, level: u8) -> Result<()> {
        self.write(id, Edit::Level(level))
    }

    pub fn set_renown_rank(&self, id: LoadoutId, rank: u8) -> Result<()> {
        self.write(id, Edit::RenownRank(rank))
    }

    pub fn set_renown_ability(&self, id: LoadoutId, ability: RenownAbility, level: u8) -> Result<()> {
        self.write(id, Edit::RenownAbility { ability, level })
    }

    pub fn set_loadout_name(&self, id: LoadoutId, name: impl Into<String>) -> Result<()> {
        self.write(id, Edit::Name(name.into()))
    }

    pub fn set_character_name(&self, id: LoadoutId, name: Option<String>) -> Result<()> {
        self.write(id, Edit::CharacterName(name))
    }

    /// Empties every slot.
    pub fn clear_items(&self, id: LoadoutId) -> Result<()> {
        self.write(id, Edit::ClearItems)
    }

    pub fn clear_renown_abilities(&self, id: LoadoutId) -> Result<()> {
        self.write(id, Edit::ClearRenownAbilities)
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Closes the scope, syncing the URL if it was the outermost one.
    pub fn finish(mut self) -> Result<()> {
        self.close()
    }

    fn write(&self, id: LoadoutId, edit: Edit) -> Result<()> {
        self.planner.write(id, WriteOrigin::Bulk, edit)
    }

    fn close(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.open, false) {
            return Ok(());
        }
        self.planner.end_bulk_apply()
    }
}

impl Drop for BulkApply {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close bulk apply");
        }
    }
}
