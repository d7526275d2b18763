//! Score-driven difficulty ramp.
//!
//! Pure functions: level is derived from cumulative score every time it is
//! asked for, so there is no drift no matter how often a tick consults it.

use super::config::{DIFFICULTY_TIERS, DifficultyTier, Tuning};

/// `floor(score / interval) + 1`, clamped to the configured maximum.
pub fn level_for_score(score: i64, tuning: &Tuning) -> u32 {
    let level = (score / tuning.difficulty_score_interval) as u32 + 1;
    level.clamp(1, tuning.max_difficulty_level)
}

/// Tier parameters for a level. Levels past the table reuse the last row.
pub fn tier_for_level(level: u32) -> &'static DifficultyTier {
    let idx = (level.max(1) as usize - 1).min(DIFFICULTY_TIERS.len() - 1);
    &DIFFICULTY_TIERS[idx]
}
