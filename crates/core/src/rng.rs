//! Piece sequencer - bag randomizer
//!
//! The bag holds one of each of the seven kinds. Draws pop from the bag; an
//! empty bag is refilled with a freshly shuffled set. Every run of seven draws
//! that starts at a refill therefore contains each kind exactly once.
//!
//! The shuffle uses a small seeded LCG so a seed reproduces the whole
//! sequence.

use crate::pieces::{build_piece, Piece};
use crate::types::PieceKind;

/// Linear congruential generator (Numerical Recipes constants)
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Neighbouring seeds are scrambled first so their streams start far
    /// apart.
    pub fn new(seed: u32) -> Self {
        Self {
            state: mix_seed(seed),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform value in `[0, bound)`.
    ///
    /// Uses the high bits of the state; the low bits of an LCG cycle quickly.
    pub fn below(&mut self, bound: u32) -> u32 {
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Golden-ratio offset followed by the murmur3 finalizer.
fn mix_seed(seed: u32) -> u32 {
    let mut z = seed.wrapping_add(0x9E37_79B9);
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Infinite supply of pieces drawn from shuffled bags of seven.
#[derive(Debug, Clone)]
pub struct Sequencer {
    bag: [PieceKind; 7],
    /// Number of kinds still in the bag; draws pop from the back.
    remaining: usize,
    rng: SimpleRng,
    board_width: u8,
}

impl Sequencer {
    /// Sequencer for a board `board_width` columns wide
    pub fn new(seed: u32, board_width: u8) -> Self {
        Self {
            bag: PieceKind::ALL,
            remaining: 0,
            rng: SimpleRng::new(seed),
            board_width,
        }
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.remaining = self.bag.len();
    }

    /// Pop the next kind, refilling the bag first when it is empty.
    pub fn next_kind(&mut self) -> PieceKind {
        if self.remaining == 0 {
            self.refill();
        }
        self.remaining -= 1;
        self.bag[self.remaining]
    }

    /// Next piece, built at its spawn position.
    pub fn next(&mut self) -> Piece {
        build_piece(self.next_kind(), self.board_width)
    }
}
