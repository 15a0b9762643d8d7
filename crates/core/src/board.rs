//! Board module - the fixed-size grid of locked cells
//!
//! Cells are stored in a flat row-major vector (`y * width + x`).
//! Coordinates: x grows left to right, y grows top to bottom. Rows above the
//! board (y < 0) are never stored; pieces may poke into them while spawning
//! or rotating.

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `width` x `height` board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Cell at (x, y), or `None` when out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        let w = self.width as usize;
        &self.cells[y * w..(y + 1) * w]
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.height as usize && self.row(y).iter().all(Option::is_some)
    }

    /// Whether `piece` shifted by (dx, dy) fits.
    ///
    /// A cell is illegal when its column leaves `[0, width)`, its row reaches
    /// `height`, or it lands on a filled cell. Rows above the board are clear.
    pub fn is_valid_move(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece.cells().all(|(x, y)| {
            let x = x + dx;
            let y = y + dy;
            if x < 0 || x >= self.width as i8 || y >= self.height as i8 {
                return false;
            }
            y < 0 || !self.is_occupied(x, y)
        })
    }

    /// Write the piece's kind into every empty board cell it covers.
    ///
    /// Cells above row 0 are dropped. Already-filled cells are left alone.
    pub fn merge_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if let Some(None) = self.get(x, y) {
                self.set(x, y, Some(piece.kind));
            }
        }
    }

    /// Remove row `y`, shift every row above it down by one and empty row 0.
    pub fn clear_row(&mut self, y: usize) {
        if y >= self.height as usize {
            return;
        }
        let w = self.width as usize;
        // copy_within handles the overlapping ranges.
        self.cells.copy_within(0..y * w, w);
        self.cells[..w].fill(None);
    }

    /// Remove every full row, scanning bottom to top.
    ///
    /// After a removal the same row index is examined again, since the row
    /// that was above has just moved into it. Returns the number of rows
    /// removed.
    pub fn clear_completed_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height as usize;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.clear_row(row);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Flat row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Fill row `y` with `kind`, leaving the listed columns empty.
    pub fn fill_row_except(&mut self, y: i8, kind: PieceKind, holes: &[i8]) {
        for x in 0..self.width as i8 {
            if !holes.contains(&x) {
                self.set(x, y, Some(kind));
            }
        }
    }
}
