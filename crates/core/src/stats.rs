//! Score, level and lifetime statistics.
//!
//! Lifetime stats are loaded once from the store and written back on every
//! change.

use tracing::{info, warn};

use crate::scoring::{drop_interval_ms, hard_drop_bonus, level_for_score, line_clear_points};
use crate::settings::GameSettings;
use crate::store::{write_through, KeyValueStore};
use crate::types::keys;

/// Totals that survive across games and sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeStats {
    pub high_score: u32,
    pub high_level: u32,
    pub total_lines: u32,
    pub total_pieces: u32,
}

impl Default for LifetimeStats {
    fn default() -> Self {
        Self {
            high_score: 0,
            high_level: 1,
            total_lines: 0,
            total_pieces: 0,
        }
    }
}

pub struct GameStats<S: KeyValueStore> {
    settings: GameSettings,
    store: S,
    score: u32,
    level: u32,
    lines_this_game: u32,
    lifetime: LifetimeStats,
}

fn load_u32<S: KeyValueStore>(store: &S, key: &str) -> Option<u32> {
    let raw = store.get(key)?;
    // Older saves may hold negative numbers; those clamp to zero.
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value.clamp(0, u32::MAX as i64) as u32),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable stored stat");
            None
        }
    }
}

impl<S: KeyValueStore> GameStats<S> {
    /// Load lifetime stats from `store` and start at score 0, level 1.
    pub fn load(settings: GameSettings, store: S) -> Self {
        let mut lifetime = LifetimeStats::default();
        if let Some(v) = load_u32(&store, keys::HIGH_SCORE) {
            lifetime.high_score = v;
        }
        if let Some(v) = load_u32(&store, keys::HIGH_LEVEL) {
            lifetime.high_level = v.max(1);
        }
        if let Some(v) = load_u32(&store, keys::TOTAL_LINES) {
            lifetime.total_lines = v;
        }
        if let Some(v) = load_u32(&store, keys::TOTAL_PIECES) {
            lifetime.total_pieces = v;
        }

        Self {
            settings,
            store,
            score: 0,
            level: 1,
            lines_this_game: 0,
            lifetime,
        }
    }

    pub fn reset_for_new_game(&mut self) {
        self.score = 0;
        self.level = 1;
        self.lines_this_game = 0;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_this_game(&self) -> u32 {
        self.lines_this_game
    }

    pub fn lifetime(&self) -> LifetimeStats {
        self.lifetime
    }

    /// Current gravity interval
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level, &self.settings)
    }

    /// Add points, then update the high score and level.
    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.check_high_score();
        self.check_level_up();
    }

    pub fn add_hard_drop_bonus(&mut self, distance: u32) {
        self.add_score(hard_drop_bonus(distance, &self.settings));
    }

    pub fn record_piece_placed(&mut self) {
        self.lifetime.total_pieces = self.lifetime.total_pieces.saturating_add(1);
        write_through(
            &mut self.store,
            keys::TOTAL_PIECES,
            self.lifetime.total_pieces.to_string(),
        );
    }

    /// Count cleared rows and award `line_points[count] * level`.
    pub fn record_lines_cleared(&mut self, count: u32) -> u32 {
        if count == 0 {
            return 0;
        }
        self.lines_this_game = self.lines_this_game.saturating_add(count);
        self.lifetime.total_lines = self.lifetime.total_lines.saturating_add(count);
        write_through(
            &mut self.store,
            keys::TOTAL_LINES,
            self.lifetime.total_lines.to_string(),
        );

        let points = line_clear_points(count, self.level, &self.settings);
        self.add_score(points);
        points
    }

    fn check_high_score(&mut self) {
        if self.score <= self.lifetime.high_score {
            return;
        }
        self.lifetime.high_score = self.score;
        write_through(&mut self.store, keys::HIGH_SCORE, self.score.to_string());
    }

    fn check_level_up(&mut self) {
        let target = level_for_score(self.score, &self.settings);
        if target <= self.level {
            return;
        }
        self.level = target;
        info!(level = self.level, "level up");

        if self.level > self.lifetime.high_level {
            self.lifetime.high_level = self.level;
            write_through(&mut self.store, keys::HIGH_LEVEL, self.level.to_string());
        }
    }
}
