//! Error infrastructure for planner-core.
//!
//! Every equip rejection is an [`EquipError`] variant naming the rule that
//! fired. Errors are classified with [`ErrorSeverity`] so callers can decide
//! between surfacing a message and skipping the offending write (the import
//! pipeline skips, interactive edits surface).

use crate::types::{Career, EquipSlot, ItemId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input; the write was rejected and state is untouched.
    Validation,

    /// The write addressed something that does not exist (empty slot,
    /// out-of-range socket).
    Structural,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Structural => "structural",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for classified planner errors.
pub trait PlannerErrorKind: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the error variant, for tests and metrics.
    fn error_code(&self) -> &'static str;
}

/// Rejection reasons raised by the equip validator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipError {
    #[error("{item_name} cannot be used by {}", career_label(.career))]
    CareerMismatch {
        item: ItemId,
        item_name: String,
        career: Option<Career>,
    },

    #[error("{item_name} is restricted to races unavailable to {}", career_label(.career))]
    RaceMismatch {
        item: ItemId,
        item_name: String,
        career: Option<Career>,
    },

    #[error("{item_name} is unique-equipped and already worn in {slot}")]
    DuplicateUnique {
        item: ItemId,
        item_name: String,
        slot: EquipSlot,
    },

    #[error("cannot equip an off-hand item while {main_hand} is wielded two-handed")]
    TwoHandedConflict { main_hand: String },

    #[error("no item equipped in {slot} to hold a talisman")]
    NoItemInSlot { slot: EquipSlot },

    #[error("{slot} has {capacity} talisman slot(s); index {index} is out of range")]
    TalismanIndexOutOfRange {
        slot: EquipSlot,
        index: usize,
        capacity: usize,
    },
}

fn career_label(career: &Option<Career>) -> &'static str {
    career.map_or("a loadout without a career", Career::key)
}

impl PlannerErrorKind for EquipError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CareerMismatch { .. }
            | Self::RaceMismatch { .. }
            | Self::DuplicateUnique { .. }
            | Self::TwoHandedConflict { .. } => ErrorSeverity::Validation,
            Self::NoItemInSlot { .. } | Self::TalismanIndexOutOfRange { .. } => {
                ErrorSeverity::Structural
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CareerMismatch { .. } => "CAREER_MISMATCH",
            Self::RaceMismatch { .. } => "RACE_MISMATCH",
            Self::DuplicateUnique { .. } => "DUPLICATE_UNIQUE",
            Self::TwoHandedConflict { .. } => "TWO_HANDED_CONFLICT",
            Self::NoItemInSlot { .. } => "NO_ITEM_IN_SLOT",
            Self::TalismanIndexOutOfRange { .. } => "TALISMAN_INDEX_OUT_OF_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_rule() {
        let err = EquipError::CareerMismatch {
            item: ItemId(1),
            item_name: "Blessed Hammer".into(),
            career: Some(Career::WitchHunter),
        };
        assert_eq!(err.to_string(), "Blessed Hammer cannot be used by witch_hunter");
        assert_eq!(err.error_code(), "CAREER_MISMATCH");
        assert_eq!(err.severity(), ErrorSeverity::Validation);

        let err = EquipError::TwoHandedConflict {
            main_hand: "Greataxe".into(),
        };
        assert!(err.to_string().contains("two-handed"));
    }
}
