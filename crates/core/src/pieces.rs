//! Piece catalog - shape matrices, matrix rotation and the piece factory
//!
//! Every shape is a small square 0/1 matrix (2x2, 3x3 or 4x4). Rotation is a
//! pure transpose-and-reverse that returns a new matrix; nothing here mutates
//! in place.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Largest supported shape edge
pub const MAX_SHAPE: usize = 4;

/// Offset of a single mino relative to the shape's top-left corner, as (x, y)
pub type MinoOffset = (i8, i8);

/// Positional offsets tried, in order, when a rotation collides.
///
/// The first entry is the plain rotation; the rest shift the piece sideways
/// by one and two columns, then one row up.
pub const ROTATION_KICKS: [(i8, i8); 6] = [(0, 0), (1, 0), (-1, 0), (2, 0), (-2, 0), (0, -1)];

/// A rows x cols occupancy matrix, at most 4x4.
///
/// Cells outside `rows x cols` are always empty so that equality compares only
/// the meaningful part of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE]; MAX_SHAPE],
}

const fn square<const N: usize>(src: [[u8; N]; N]) -> Shape {
    let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
    let mut y = 0;
    while y < N {
        let mut x = 0;
        while x < N {
            cells[y][x] = src[y][x] != 0;
            x += 1;
        }
        y += 1;
    }
    Shape {
        rows: N as u8,
        cols: N as u8,
        cells,
    }
}

const I_SHAPE: Shape = square([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
const J_SHAPE: Shape = square([[1, 0, 0], [1, 1, 1], [0, 0, 0]]);
const L_SHAPE: Shape = square([[0, 0, 1], [1, 1, 1], [0, 0, 0]]);
const O_SHAPE: Shape = square([[1, 1], [1, 1]]);
const S_SHAPE: Shape = square([[0, 1, 1], [1, 1, 0], [0, 0, 0]]);
const T_SHAPE: Shape = square([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
const Z_SHAPE: Shape = square([[1, 1, 0], [0, 1, 1], [0, 0, 0]]);

/// Spawn-orientation shape for a piece kind
pub fn shape_of(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::Z => Z_SHAPE,
    }
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    ///
    /// Returns `None` for an empty, ragged or oversized matrix.
    pub fn from_rows(rows: &[&[u8]]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if height > MAX_SHAPE || width == 0 || width > MAX_SHAPE {
            return None;
        }
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }

        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                cells[y][x] = value != 0;
            }
        }
        Some(Self {
            rows: height as u8,
            cols: width as u8,
            cells,
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether the cell at row `y`, column `x` is occupied.
    /// Out-of-range coordinates are empty.
    pub fn is_filled(&self, y: usize, x: usize) -> bool {
        y < self.rows as usize && x < self.cols as usize && self.cells[y][x]
    }

    /// Occupied cells as (x, y) offsets, scanned row by row.
    pub fn minos(&self) -> ArrayVec<MinoOffset, { MAX_SHAPE * MAX_SHAPE }> {
        let mut out = ArrayVec::new();
        for y in 0..self.rows as usize {
            for x in 0..self.cols as usize {
                if self.cells[y][x] {
                    out.push((x as i8, y as i8));
                }
            }
        }
        out
    }

    /// Rotate 90° clockwise: an R x C matrix becomes C x R with
    /// `out[x][R-1-y] = in[y][x]`.
    pub fn rotate_cw(&self) -> Shape {
        let r = self.rows as usize;
        let c = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for y in 0..r {
            for x in 0..c {
                cells[x][r - 1 - y] = self.cells[y][x];
            }
        }
        Shape {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Rotate 90° counter-clockwise: `out[C-1-x][y] = in[y][x]`.
    pub fn rotate_ccw(&self) -> Shape {
        let r = self.rows as usize;
        let c = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for y in 0..r {
            for x in 0..c {
                cells[c - 1 - x][y] = self.cells[y][x];
            }
        }
        Shape {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

/// A piece on (or above) the board: kind, current shape and the board
/// position of the shape's top-left corner.
///
/// `Piece` is `Copy`; trial positions (ghost, rotation kicks) work on copies
/// and never alias the live piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece in spawn orientation, centered horizontally at row 0.
    pub fn new(kind: PieceKind, board_width: u8) -> Self {
        let shape = shape_of(kind);
        Self {
            kind,
            shape,
            x: spawn_x(shape.cols(), board_width),
            y: 0,
        }
    }

    /// Absolute board coordinates of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .minos()
            .into_iter()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Copy of this piece moved by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Copy of this piece with its shape rotated clockwise (position kept)
    pub fn rotated_cw(&self) -> Self {
        Self {
            shape: self.shape.rotate_cw(),
            ..*self
        }
    }
}

/// Instantiate a piece at its spawn position.
pub fn build_piece(kind: PieceKind, board_width: u8) -> Piece {
    Piece::new(kind, board_width)
}

/// `floor((board_width - shape_width) / 2)`
pub fn spawn_x(shape_width: u8, board_width: u8) -> i8 {
    (board_width as i16 - shape_width as i16).div_euclid(2) as i8
}

/// Rotate clockwise, trying [`ROTATION_KICKS`] in order.
///
/// `fits(candidate, dx, dy)` reports whether `candidate` shifted by the kick is
/// legal. Returns the rotated, kicked piece and the kick used, or `None` when
/// every kick collides (the caller keeps the original piece untouched).
pub fn try_rotate(
    piece: &Piece,
    fits: impl Fn(&Piece, i8, i8) -> bool,
) -> Option<(Piece, (i8, i8))> {
    let rotated = piece.rotated_cw();
    ROTATION_KICKS
        .iter()
        .find(|&&(dx, dy)| fits(&rotated, dx, dy))
        .map(|&(dx, dy)| (rotated.shifted(dx, dy), (dx, dy)))
}
