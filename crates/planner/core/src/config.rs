/// Planner constants and tunable defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Level given to loadouts created without an explicit level.
    pub default_level: u8,
    /// Renown rank given to loadouts created without an explicit rank.
    pub default_renown_rank: u8,
}

impl PlannerConfig {
    // ===== hard bounds =====
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 40;
    pub const MIN_RENOWN_RANK: u8 = 1;
    pub const MAX_RENOWN_RANK: u8 = 255;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LEVEL: u8 = 40;
    pub const DEFAULT_RENOWN_RANK: u8 = 80;

    pub fn new() -> Self {
        Self {
            default_level: Self::DEFAULT_LEVEL,
            default_renown_rank: Self::DEFAULT_RENOWN_RANK,
        }
    }

    pub fn clamp_level(level: u8) -> u8 {
        level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL)
    }

    pub fn clamp_renown_rank(rank: u8) -> u8 {
        rank.clamp(Self::MIN_RENOWN_RANK, Self::MAX_RENOWN_RANK)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
