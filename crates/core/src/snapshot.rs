use crate::board::Board;
use crate::history::HistoryEntry;
use crate::pieces::Piece;
use crate::stats::LifetimeStats;
use crate::types::{RunState, Theme};

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub board: Board,
    pub active: Option<Piece>,
    /// Where the active piece would land; `None` without an active piece.
    pub ghost: Option<Piece>,
    pub next: Option<Piece>,
    pub run_state: RunState,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub lifetime: LifetimeStats,
    pub history: Vec<HistoryEntry>,
    pub theme: Theme,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.run_state == RunState::Running
    }
}
