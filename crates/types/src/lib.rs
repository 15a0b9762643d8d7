//! Shared data types and tuning constants.
//!
//! Everything here is plain data with no external dependencies, so the
//! engine, the terminal front end and the persistence layer can all agree on
//! the same vocabulary.
//!
//! # Default tuning
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_ROWS` | 20 | Board height |
//! | `DEFAULT_COLS` | 12 | Board width |
//! | `INITIAL_DROP_INTERVAL_MS` | 1000 | Gravity at level 1 |
//! | `MIN_DROP_INTERVAL_MS` | 90 | Gravity floor |
//! | `DROP_STEP_MS` | 85 | Interval reduction per level |
//! | `HARD_DROP_BONUS_MULTIPLIER` | 1 | Points per row of hard drop |
//! | `LEVEL_SCORE_THRESHOLD` | 1000 | Score per level |
//! | `MAX_SCORE_HISTORY` | 10 | Remembered final scores |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, Theme};
//!
//! assert_eq!(PieceKind::ALL.len(), 7);
//! assert_eq!(Theme::default().toggled(), Theme::Light);
//! ```

/// Default board height in rows
pub const DEFAULT_ROWS: u8 = 20;

/// Default board width in columns
pub const DEFAULT_COLS: u8 = 12;

/// Drop interval at level 1 (milliseconds per row)
pub const INITIAL_DROP_INTERVAL_MS: u32 = 1000;

/// Fastest possible drop interval
pub const MIN_DROP_INTERVAL_MS: u32 = 90;

/// Interval reduction applied for every level above 1
pub const DROP_STEP_MS: u32 = 85;

/// Points awarded per row travelled by a hard drop
pub const HARD_DROP_BONUS_MULTIPLIER: u32 = 1;

/// Score needed per level
pub const LEVEL_SCORE_THRESHOLD: u32 = 1000;

/// Number of final scores kept in the history list
pub const MAX_SCORE_HISTORY: usize = 10;

/// Points for clearing 0..=4 rows at once, multiplied by the current level.
pub const LINE_POINTS: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points for a manual one-row soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Keys used with the persistent key-value store.
pub mod keys {
    pub const HIGH_SCORE: &str = "tetris-highscore";
    pub const HIGH_LEVEL: &str = "tetris-highlevel";
    pub const TOTAL_LINES: &str = "tetris-linescleared";
    pub const TOTAL_PIECES: &str = "tetris-piecesplaced";
    pub const PREVIOUS_SCORES: &str = "tetris-previousscores";
    pub const DARK_MODE: &str = "tetris-darkmode";
}

/// The seven piece kinds.
///
/// The tag is also what a locked board cell remembers, so renderers can
/// recolor locked blocks by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Single uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// A board cell: `None` is empty, `Some(kind)` is a locked block.
pub type Cell = Option<PieceKind>;

/// Lifecycle of one game.
///
/// `Idle` → `Running` ⇄ `Paused` → `GameOver` → (restart) → `Running`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Discrete player actions consumed by the engine's single dispatch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Drop piece one row (scores a point), locking it if it cannot fall
    SoftDrop,
    /// Drop to the lowest legal row and lock immediately
    HardDrop,
    /// Rotate clockwise with wall kicks
    Rotate,
    /// Toggle between running and paused
    Pause,
    /// Start a fresh game from a running, paused or finished one
    Restart,
    /// Start the first game (or a new one after game over)
    Start,
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}
