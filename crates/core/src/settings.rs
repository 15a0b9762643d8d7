//! Tunable game settings.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{
    DEFAULT_COLS, DEFAULT_ROWS, DROP_STEP_MS, HARD_DROP_BONUS_MULTIPLIER,
    INITIAL_DROP_INTERVAL_MS, LEVEL_SCORE_THRESHOLD, LINE_POINTS, MAX_SCORE_HISTORY,
    MIN_DROP_INTERVAL_MS,
};

/// Smallest and largest accepted board edge
pub const MIN_BOARD_EDGE: u8 = 4;
pub const MAX_BOARD_EDGE: u8 = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error(
        "board size {cols}x{rows} is outside {min}..={max}",
        min = MIN_BOARD_EDGE,
        max = MAX_BOARD_EDGE
    )]
    BoardSize { cols: u8, rows: u8 },
    #[error("level_score_threshold must be positive")]
    ZeroLevelThreshold,
    #[error("initial_drop_interval_ms must be positive")]
    ZeroInitialInterval,
    #[error("min_drop_interval_ms ({min}) exceeds initial_drop_interval_ms ({initial})")]
    IntervalFloorAboveStart { min: u32, initial: u32 },
}

/// Every knob of the rule set. Missing fields take the classic defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub rows: u8,
    pub cols: u8,
    pub initial_drop_interval_ms: u32,
    pub min_drop_interval_ms: u32,
    pub drop_step_ms: u32,
    pub hard_drop_bonus_multiplier: u32,
    pub level_score_threshold: u32,
    pub max_score_history: usize,
    /// Points for clearing 0..=4 rows, before the level multiplier
    pub line_points: [u32; 5],
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            initial_drop_interval_ms: INITIAL_DROP_INTERVAL_MS,
            min_drop_interval_ms: MIN_DROP_INTERVAL_MS,
            drop_step_ms: DROP_STEP_MS,
            hard_drop_bonus_multiplier: HARD_DROP_BONUS_MULTIPLIER,
            level_score_threshold: LEVEL_SCORE_THRESHOLD,
            max_score_history: MAX_SCORE_HISTORY,
            line_points: LINE_POINTS,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let edge = MIN_BOARD_EDGE..=MAX_BOARD_EDGE;
        if !edge.contains(&self.rows) || !edge.contains(&self.cols) {
            return Err(SettingsError::BoardSize {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.level_score_threshold == 0 {
            return Err(SettingsError::ZeroLevelThreshold);
        }
        if self.initial_drop_interval_ms == 0 {
            return Err(SettingsError::ZeroInitialInterval);
        }
        if self.min_drop_interval_ms > self.initial_drop_interval_ms {
            return Err(SettingsError::IntervalFloorAboveStart {
                min: self.min_drop_interval_ms,
                initial: self.initial_drop_interval_ms,
            });
        }
        Ok(())
    }
}
