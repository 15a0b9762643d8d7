//! Game state module - the engine that drives one session
//!
//! Ties together the board, the sequencer, scoring and persistence. Every
//! player input arrives as a [`GameAction`] through [`GameState::apply_action`];
//! gravity arrives through [`GameState::tick`] (elapsed milliseconds) or
//! [`GameState::frame`] (display timestamps run through a [`FrameClock`]).
//!
//! Illegal moves are not errors: they return `false` and leave the state
//! untouched.

use tracing::{debug, info};

use crate::board::Board;
use crate::clock::FrameClock;
use crate::history::ScoreHistory;
use crate::pieces::{build_piece, try_rotate, Piece};
use crate::prefs::ThemePreference;
use crate::rng::Sequencer;
use crate::settings::{GameSettings, SettingsError};
use crate::snapshot::GameSnapshot;
use crate::stats::GameStats;
use crate::store::{shared, KeyValueStore, MemoryStore, SharedStore};
use crate::types::{GameAction, PieceKind, RunState, Theme, SOFT_DROP_POINTS};

/// Outcome of the most recent lock, consumed by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub line_clear_points: u32,
    /// The next piece could not spawn
    pub game_over: bool,
}

pub struct GameState<S: KeyValueStore + Clone = SharedStore<MemoryStore>> {
    settings: GameSettings,
    board: Board,
    active: Option<Piece>,
    next: Option<Piece>,
    sequencer: Sequencer,
    run_state: RunState,
    drop_accumulator_ms: u32,
    clock: FrameClock,
    stats: GameStats<S>,
    history: ScoreHistory<S>,
    theme: ThemePreference<S>,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Default rules backed by an in-memory store
    pub fn new(seed: u32) -> Self {
        Self::build(GameSettings::default(), seed, shared(MemoryStore::new()))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<S: KeyValueStore + Clone> GameState<S> {
    /// Build an idle game. Lifetime stats, history and theme are loaded from
    /// `store`, and every later change is written back to it.
    ///
    /// Fails when `settings` do not pass [`GameSettings::validate`].
    pub fn with_store(settings: GameSettings, seed: u32, store: S) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings, seed, store))
    }

    fn build(settings: GameSettings, seed: u32, store: S) -> Self {
        let stats = GameStats::load(settings.clone(), store.clone());
        let history = ScoreHistory::load(store.clone(), settings.max_score_history);
        let theme = ThemePreference::load(store);

        Self {
            board: Board::new(settings.cols, settings.rows),
            active: None,
            next: None,
            sequencer: Sequencer::new(seed, settings.cols),
            run_state: RunState::Idle,
            drop_accumulator_ms: 0,
            clock: FrameClock::new(),
            stats,
            history,
            theme,
            last_event: None,
            settings,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_piece(&self) -> Option<Piece> {
        self.next
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    pub fn lines(&self) -> u32 {
        self.stats.lines_this_game()
    }

    pub fn stats(&self) -> &GameStats<S> {
        &self.stats
    }

    pub fn history(&self) -> &ScoreHistory<S> {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.stats.drop_interval_ms()
    }

    /// Start a game from `Idle` or `GameOver`. Ignored otherwise.
    pub fn start(&mut self) -> bool {
        match self.run_state {
            RunState::Idle | RunState::GameOver => {
                self.begin_game();
                true
            }
            RunState::Running | RunState::Paused => false,
        }
    }

    /// Abandon the current game and start a fresh one. Ignored in `Idle`.
    pub fn restart(&mut self) -> bool {
        if self.run_state == RunState::Idle {
            return false;
        }
        self.begin_game();
        true
    }

    fn begin_game(&mut self) {
        self.board.clear();
        self.stats.reset_for_new_game();
        self.drop_accumulator_ms = 0;
        self.last_event = None;
        self.active = Some(self.sequencer.next());
        self.next = Some(self.sequencer.next());
        self.run_state = RunState::Running;
        self.clock.start();
        info!(
            cols = self.board.width(),
            rows = self.board.height(),
            "game started"
        );
    }

    /// Toggle `Running` and `Paused`. Returns whether the state changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.run_state {
            RunState::Running => {
                self.run_state = RunState::Paused;
                self.clock.stop();
                info!(score = self.score(), "paused");
                true
            }
            RunState::Paused => {
                self.run_state = RunState::Running;
                self.clock.start();
                info!("resumed");
                true
            }
            RunState::Idle | RunState::GameOver => false,
        }
    }

    /// Feed a display-frame timestamp. Paused or finished games ignore it,
    /// and the first frame after a (re)start counts as zero elapsed time.
    pub fn frame(&mut self, timestamp_ms: u64) -> bool {
        match self.clock.delta(timestamp_ms) {
            Some(elapsed) => self.tick(elapsed),
            None => false,
        }
    }

    /// Advance gravity by `elapsed_ms`. Returns true when the piece dropped
    /// (or locked) this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.playable() {
            return false;
        }
        self.drop_accumulator_ms = self.drop_accumulator_ms.saturating_add(elapsed_ms);
        if self.drop_accumulator_ms < self.drop_interval_ms() {
            return false;
        }
        self.soft_drop(false);
        self.drop_accumulator_ms = 0;
        true
    }

    fn playable(&self) -> bool {
        self.run_state == RunState::Running && self.active.is_some()
    }

    /// Shift the active piece sideways by `dx` columns.
    pub fn move_horizontal(&mut self, dx: i8) -> bool {
        self.try_move(dx, 0)
    }

    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !self.board.is_valid_move(active, dx, dy) {
            return false;
        }
        active.x += dx;
        active.y += dy;
        true
    }

    /// Drop one row. A manual drop scores a point. When the piece cannot
    /// fall it locks and this returns false.
    pub fn soft_drop(&mut self, manual: bool) -> bool {
        if !self.playable() {
            return false;
        }
        if self.try_move(0, 1) {
            if manual {
                self.stats.add_score(SOFT_DROP_POINTS);
            }
            return true;
        }
        self.lock();
        false
    }

    /// Drop to the lowest legal row, award the bonus and lock at once.
    /// Returns the distance travelled.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.playable() {
            return 0;
        }
        let Some(active) = self.active.as_mut() else {
            return 0;
        };

        let mut distance: i8 = 0;
        while self.board.is_valid_move(active, 0, distance + 1) {
            distance += 1;
        }
        active.y += distance;

        let distance = distance as u32;
        self.stats.add_hard_drop_bonus(distance);
        self.lock();
        distance
    }

    /// Rotate clockwise, trying the kick offsets in order. A rotation that
    /// fits nowhere leaves the piece exactly as it was.
    pub fn rotate(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };
        let board = &self.board;
        match try_rotate(&active, |candidate, dx, dy| {
            board.is_valid_move(candidate, dx, dy)
        }) {
            Some((rotated, _kick)) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.board.merge_piece(&piece);
        self.stats.record_piece_placed();

        let lines_cleared = self.board.clear_completed_lines();
        let line_clear_points = self.stats.record_lines_cleared(lines_cleared);
        self.drop_accumulator_ms = 0;
        debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            lines_cleared,
            "piece locked"
        );

        let spawned = self.spawn_next();
        self.last_event = Some(LockEvent {
            lines_cleared,
            line_clear_points,
            game_over: !spawned,
        });
    }

    /// Promote the next piece and draw a new one. A spawn that collides ends
    /// the game.
    fn spawn_next(&mut self) -> bool {
        let piece = self.next.take().unwrap_or_else(|| self.sequencer.next());
        self.next = Some(self.sequencer.next());
        self.place_active(piece)
    }

    /// Replace the active piece with a fresh `kind` at its spawn position,
    /// leaving the next piece alone. Only a running game accepts this; a
    /// spawn that collides ends the game.
    pub fn spawn(&mut self, kind: PieceKind) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        self.place_active(build_piece(kind, self.board.width()))
    }

    fn place_active(&mut self, piece: Piece) -> bool {
        if !self.board.is_valid_move(&piece, 0, 0) {
            self.game_over();
            return false;
        }
        self.active = Some(piece);
        true
    }

    fn game_over(&mut self) {
        self.run_state = RunState::GameOver;
        self.active = None;
        self.clock.stop();
        let score = self.score();
        self.history.add(score);
        info!(score, level = self.level(), lines = self.lines(), "game over");
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Copy of the active piece moved down as far as it legally goes.
    pub fn ghost_piece(&self) -> Option<Piece> {
        let mut ghost = self.active?;
        while self.board.is_valid_move(&ghost, 0, 1) {
            ghost.y += 1;
        }
        Some(ghost)
    }

    /// Single dispatch point for player input.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            // A soft drop that locks still consumed the input.
            GameAction::SoftDrop => {
                let was_playable = self.playable();
                self.soft_drop(true);
                was_playable
            }
            GameAction::HardDrop => {
                let was_playable = self.playable();
                self.hard_drop();
                was_playable
            }
            GameAction::Rotate => self.rotate(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => self.restart(),
            GameAction::Start => self.start(),
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            active: self.active,
            ghost: self.ghost_piece(),
            next: self.next,
            run_state: self.run_state,
            score: self.score(),
            level: self.level(),
            lines: self.lines(),
            lifetime: self.stats.lifetime(),
            history: self.history.entries().to_vec(),
            theme: self.theme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::shape_of;
    use crate::types::keys;

    fn started(seed: u32) -> GameState {
        let mut game = GameState::new(seed);
        assert!(game.start());
        game
    }

    fn set_active(game: &mut GameState, kind: PieceKind) -> Piece {
        let piece = Piece::new(kind, game.board().width());
        game.active = Some(piece);
        piece
    }

    #[test]
    fn test_new_game_state_is_idle() {
        let game = GameState::new(1);
        assert_eq!(game.run_state(), RunState::Idle);
        assert!(game.active().is_none());
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.board().width(), 12);
        assert_eq!(game.board().height(), 20);
    }

    #[test]
    fn test_start_spawns_active_and_next() {
        let game = started(7);
        assert_eq!(game.run_state(), RunState::Running);
        let active = game.active().unwrap();
        assert!(game.next_piece().is_some());
        assert!(game.board().is_valid_move(&active, 0, 0));
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut game = started(1);
        game.move_horizontal(1);
        let before = game.active();
        assert!(!game.start());
        assert_eq!(game.active(), before);
    }

    #[test]
    fn test_restart_ignored_when_idle() {
        let mut game = GameState::new(1);
        assert!(!game.restart());
        assert_eq!(game.run_state(), RunState::Idle);
    }

    #[test]
    fn test_restart_resets_game_without_history() {
        let mut game = started(1);
        game.hard_drop();
        assert!(game.board().filled_count() > 0);
        assert!(game.restart());
        assert_eq!(game.board().filled_count(), 0);
        assert_eq!(game.score(), 0);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_inputs_ignored_before_start() {
        let mut game = GameState::new(1);
        assert!(!game.apply_action(GameAction::MoveLeft));
        assert!(!game.apply_action(GameAction::HardDrop));
        assert!(!game.apply_action(GameAction::Pause));
        assert!(!game.tick(10_000));
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut game = started(1);
        set_active(&mut game, PieceKind::O);
        let mut moves = 0;
        while game.move_horizontal(-1) {
            moves += 1;
        }
        assert_eq!(moves, 5);
        assert_eq!(game.active().unwrap().x, 0);
    }

    #[test]
    fn test_manual_soft_drop_scores() {
        let mut game = started(1);
        assert!(game.apply_action(GameAction::SoftDrop));
        assert_eq!(game.score(), 1);
        assert_eq!(game.active().unwrap().y, 1);
    }

    #[test]
    fn test_gravity_drop_does_not_score() {
        let mut game = started(1);
        assert!(!game.tick(999));
        assert!(game.tick(1));
        assert_eq!(game.active().unwrap().y, 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_hard_drop_lands_and_locks() {
        let mut game = started(1);
        set_active(&mut game, PieceKind::O);
        let distance = game.hard_drop();
        assert_eq!(distance, 18);
        assert_eq!(game.score(), 18);
        assert_eq!(game.board().filled_count(), 4);
        assert!(game.board().is_occupied(5, 19));
        assert!(game.board().is_occupied(6, 18));
        assert_eq!(game.stats().lifetime().total_pieces, 1);

        let event = game.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 0);
        assert!(!event.game_over);
        assert!(game.take_last_event().is_none());
    }

    #[test]
    fn test_soft_drop_locks_when_grounded() {
        let mut game = started(1);
        set_active(&mut game, PieceKind::O);
        for _ in 0..18 {
            assert!(game.soft_drop(true));
        }
        assert!(!game.soft_drop(true));
        assert_eq!(game.board().filled_count(), 4);
        assert_eq!(game.score(), 18);
    }

    #[test]
    fn test_lock_resets_drop_accumulator() {
        let mut game = started(1);
        game.tick(500);
        game.hard_drop();
        assert_eq!(game.drop_accumulator_ms, 0);
    }

    #[test]
    fn test_rotate_kicks_off_left_wall() {
        let mut game = started(1);
        let vertical = Piece {
            kind: PieceKind::I,
            shape: shape_of(PieceKind::I).rotate_cw(),
            x: -2,
            y: 4,
        };
        assert!(game.board().is_valid_move(&vertical, 0, 0));
        game.active = Some(vertical);

        assert!(game.rotate());
        let rotated = game.active().unwrap();
        assert_eq!(rotated.shape, vertical.shape.rotate_cw());
        assert_eq!(rotated.x, 0);
        assert_eq!(rotated.y, 4);
    }

    #[test]
    fn test_rotate_reverts_when_no_kick_fits() {
        let mut game = started(1);
        let piece = set_active(&mut game, PieceKind::T);
        let moved = piece.shifted(0, 5);
        game.active = Some(moved);
        // Wall the piece in so every rotated position collides.
        for y in 0..20 {
            for x in 0..12 {
                let inside = moved.cells().any(|c| c == (x, y));
                if !inside {
                    game.board_mut().set(x, y, Some(PieceKind::Z));
                }
            }
        }
        assert!(!game.rotate());
        assert_eq!(game.active(), Some(moved));
    }

    #[test]
    fn test_line_clear_scores_with_level() {
        let mut game = started(1);
        set_active(&mut game, PieceKind::O);
        // Two bottom rows full except where the O lands.
        game.board_mut().fill_row_except(19, PieceKind::J, &[5, 6]);
        game.board_mut().fill_row_except(18, PieceKind::J, &[5, 6]);
        game.hard_drop();

        let event = game.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 2);
        assert_eq!(event.line_clear_points, 100);
        assert_eq!(game.lines(), 2);
        assert_eq!(game.score(), 18 + 100);
        assert_eq!(game.board().filled_count(), 0);
    }

    #[test]
    fn test_pause_blocks_input_and_gravity() {
        let mut game = started(1);
        assert!(game.apply_action(GameAction::Pause));
        assert_eq!(game.run_state(), RunState::Paused);
        let before = game.active();
        assert!(!game.apply_action(GameAction::MoveLeft));
        assert!(!game.apply_action(GameAction::Rotate));
        assert!(!game.tick(5_000));
        assert_eq!(game.active(), before);

        assert!(game.apply_action(GameAction::Pause));
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn test_frame_clock_skips_paused_time() {
        let mut game = started(1);
        assert!(!game.frame(0));
        assert!(!game.frame(900));
        game.toggle_pause();
        assert!(!game.frame(60_000));
        game.toggle_pause();
        assert!(!game.frame(120_000));
        // Only 900ms accumulated before the pause; 100 more tips it over.
        assert!(game.frame(120_100));
        assert_eq!(game.active().unwrap().y, 1);
    }

    #[test]
    fn test_game_over_on_blocked_spawn() {
        let mut game = started(1);
        // Block the spawn area without completing any row.
        for y in 0..2 {
            game.board_mut().fill_row_except(y, PieceKind::Z, &[0]);
        }
        set_active(&mut game, PieceKind::O);
        game.active = Some(game.active().unwrap().shifted(-5, 4));
        game.hard_drop();

        assert_eq!(game.run_state(), RunState::GameOver);
        assert!(game.active().is_none());
        assert!(game.take_last_event().unwrap().game_over);
        assert_eq!(game.history().len(), 1);

        let board = game.board().clone();
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::Rotate,
            GameAction::Pause,
        ] {
            assert!(!game.apply_action(action));
        }
        assert!(!game.tick(10_000));
        assert!(!game.frame(10_000));
        assert_eq!(game.board(), &board);

        assert!(game.apply_action(GameAction::Start));
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn test_spawn_replaces_active_piece() {
        let mut idle = GameState::new(1);
        assert!(!idle.spawn(PieceKind::I));

        let mut game = started(1);
        let next = game.next_piece();
        assert!(game.spawn(PieceKind::S));
        let active = game.active().unwrap();
        assert_eq!(active.kind, PieceKind::S);
        assert_eq!((active.x, active.y), (4, 0));
        assert_eq!(game.next_piece(), next);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut game = started(1);
        game.board_mut().fill_row_except(1, PieceKind::Z, &[0]);
        assert!(!game.spawn(PieceKind::T));
        assert_eq!(game.run_state(), RunState::GameOver);
        assert!(game.active().is_none());
    }

    #[test]
    fn test_ghost_matches_hard_drop() {
        let mut game = started(3);
        let ghost = game.ghost_piece().unwrap();
        assert_eq!(ghost.x, game.active().unwrap().x);
        game.hard_drop();
        for (x, y) in ghost.cells() {
            assert!(game.board().is_occupied(x, y));
        }
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = started(1);
        game.apply_action(GameAction::SoftDrop);
        let snap = game.snapshot();
        assert!(snap.playable());
        assert_eq!(snap.score, 1);
        assert_eq!(snap.active, game.active());
        assert_eq!(snap.ghost, game.ghost_piece());
        assert_eq!(snap.theme, Theme::Dark);
    }

    #[test]
    fn test_with_store_rejects_invalid_settings() {
        let settings = GameSettings {
            cols: 200,
            ..GameSettings::default()
        };
        let result = GameState::with_store(settings, 1, shared(MemoryStore::new()));
        assert!(matches!(result, Err(SettingsError::BoardSize { cols: 200, .. })));
    }

    #[test]
    fn test_shared_store_sees_all_writes() {
        let store = shared(MemoryStore::new());
        let mut game = GameState::with_store(GameSettings::default(), 1, store.clone()).unwrap();
        game.start();
        game.hard_drop();
        game.toggle_theme();
        assert_eq!(store.get(keys::TOTAL_PIECES).as_deref(), Some("1"));
        assert_eq!(store.get(keys::DARK_MODE).as_deref(), Some("false"));
        assert!(store.get(keys::HIGH_SCORE).is_some());
    }
}
