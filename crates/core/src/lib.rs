//! Core game logic - deterministic, storage-agnostic and testable
//!
//! Everything that decides how the game plays lives here. The crate does no
//! terminal or file I/O; persistence goes through the [`KeyValueStore`] trait
//! so a front end can plug in whatever backing it has.
//!
//! # Module Structure
//!
//! - [`pieces`]: shape matrices, rotation and the piece factory
//! - [`board`]: the grid of locked cells, collision tests and line clears
//! - [`rng`]: seeded bag randomizer
//! - [`scoring`]: pure scoring and speed-curve functions
//! - [`stats`]: running score and level plus persisted lifetime stats
//! - [`history`]: last final scores
//! - [`prefs`]: theme preference
//! - [`clock`]: frame timestamps to elapsed time
//! - [`game_state`]: the engine state machine
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::{GameAction, RunState};
//!
//! let mut game = GameState::new(12345);
//! game.apply_action(GameAction::Start);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.run_state(), RunState::Running);
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! Gravity is wall-clock based. Call [`GameState::tick`] with elapsed
//! milliseconds, or [`GameState::frame`] with raw frame timestamps. At level 1
//! a piece falls one row per second; each level takes 85ms off, down to 90ms.

pub mod board;
pub mod clock;
pub mod game_state;
pub mod history;
pub mod pieces;
pub mod prefs;
pub mod rng;
pub mod scoring;
pub mod settings;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clock::FrameClock;
pub use game_state::{GameState, LockEvent};
pub use history::{HistoryEntry, ScoreHistory};
pub use pieces::{build_piece, shape_of, try_rotate, Piece, Shape, ROTATION_KICKS};
pub use prefs::ThemePreference;
pub use rng::{Sequencer, SimpleRng};
pub use scoring::{drop_interval_ms, hard_drop_bonus, level_for_score, line_clear_points};
pub use settings::{GameSettings, SettingsError};
pub use snapshot::GameSnapshot;
pub use stats::{GameStats, LifetimeStats};
pub use store::{shared, KeyValueStore, MemoryStore, SharedStore, StoreError};
