//! Scoring rules - pure functions over the settings table
//!
//! Classic rules:
//! - Clearing N rows awards `line_points[N] * level`.
//! - A hard drop awards `distance * multiplier` before the piece locks.
//! - A manual soft drop awards one point per row.
//! - Level is `floor(score / threshold) + 1` and never goes down in a game.
//! - Gravity speeds up linearly with level down to a floor.

use crate::settings::GameSettings;

/// Milliseconds per automatic row at `level` (1-based):
/// `max(min, initial - (level - 1) * step)`
pub fn drop_interval_ms(level: u32, settings: &GameSettings) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(settings.drop_step_ms);
    settings
        .initial_drop_interval_ms
        .saturating_sub(reduction)
        .max(settings.min_drop_interval_ms)
}

/// Points for clearing `lines` rows at `level`. Counts beyond the table score 0.
pub fn line_clear_points(lines: u32, level: u32, settings: &GameSettings) -> u32 {
    settings
        .line_points
        .get(lines as usize)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Bonus for a hard drop of `distance` rows
pub fn hard_drop_bonus(distance: u32, settings: &GameSettings) -> u32 {
    distance.saturating_mul(settings.hard_drop_bonus_multiplier)
}

/// Level implied by a score
pub fn level_for_score(score: u32, settings: &GameSettings) -> u32 {
    score / settings.level_score_threshold.max(1) + 1
}
