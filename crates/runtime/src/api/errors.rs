//! Unified error types surfaced by the planner API.
//!
//! Wraps validator rejections, registry lookups and catalog failures so
//! clients can bubble them up with consistent context.
use planner_core::{
    EquipError, EquipSlot, ErrorSeverity, LoadoutId, PlannerErrorKind, RenownAbility,
};
use thiserror::Error;

pub use super::catalog::CatalogError;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Equip(#[from] EquipError),

    #[error("unknown loadout {0}")]
    UnknownLoadout(LoadoutId),

    #[error("no loadout is current")]
    NoCurrentLoadout,

    #[error("{slot} is not a loadout slot")]
    InvalidSlot { slot: EquipSlot },

    #[error("no character named {name:?}")]
    NotFound { name: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{ability} level {level} exceeds the table maximum of {max}")]
    InvalidRenownLevel {
        ability: RenownAbility,
        level: u8,
        max: u8,
    },

    #[error("planner state lock was poisoned")]
    LockPoisoned,
}

impl PlannerErrorKind for PlannerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Equip(err) => err.severity(),
            Self::InvalidRenownLevel { .. } | Self::NotFound { .. } | Self::Catalog(_) => {
                ErrorSeverity::Validation
            }
            Self::UnknownLoadout(_) | Self::NoCurrentLoadout | Self::InvalidSlot { .. } => {
                ErrorSeverity::Structural
            }
            Self::LockPoisoned => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Equip(err) => err.error_code(),
            Self::UnknownLoadout(_) => "UNKNOWN_LOADOUT",
            Self::NoCurrentLoadout => "NO_CURRENT_LOADOUT",
            Self::InvalidSlot { .. } => "INVALID_SLOT",
            Self::NotFound { .. } => "CHARACTER_NOT_FOUND",
            Self::Catalog(_) => "CATALOG",
            Self::InvalidRenownLevel { .. } => "INVALID_RENOWN_LEVEL",
            Self::LockPoisoned => "LOCK_POISONED",
        }
    }
}

impl PlannerError {
    /// Whether the import pipeline records this failure against one slot and
    /// carries on.
    pub fn is_slot_failure(&self) -> bool {
        matches!(
            self,
            Self::Equip(_) | Self::InvalidSlot { .. } | Self::InvalidRenownLevel { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_errors_keep_their_classification() {
        let err = PlannerError::from(EquipError::NoItemInSlot {
            slot: EquipSlot::Helm,
        });
        assert_eq!(err.severity(), ErrorSeverity::Structural);
        assert_eq!(err.error_code(), "NO_ITEM_IN_SLOT");
        assert!(err.is_slot_failure());
        assert!(!PlannerError::LockPoisoned.is_slot_failure());
    }
}
