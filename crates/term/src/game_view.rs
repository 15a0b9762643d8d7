//! GameView: maps a core [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O).

use crate::core::{GameSnapshot, Piece};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, RunState, Theme};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub screen: Rgb,
    pub well: Rgb,
    pub grid: Rgb,
    pub border: Rgb,
    pub label: Rgb,
    pub text: Rgb,
    pub ghost: Rgb,
    pub overlay_fg: Rgb,
    pub overlay_bg: Rgb,
    pieces: [Rgb; 7],
}

const PIECE_COLORS: [Rgb; 7] = [
    Rgb::new(0, 240, 240), // I
    Rgb::new(0, 0, 240),   // J
    Rgb::new(240, 160, 0), // L
    Rgb::new(240, 240, 0), // O
    Rgb::new(0, 240, 0),   // S
    Rgb::new(160, 0, 240), // T
    Rgb::new(240, 0, 0),   // Z
];

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                screen: Rgb::new(0, 0, 0),
                well: Rgb::new(18, 18, 24),
                grid: Rgb::new(60, 60, 72),
                border: Rgb::new(200, 200, 200),
                label: Rgb::new(230, 230, 230),
                text: Rgb::new(190, 190, 190),
                ghost: Rgb::new(120, 120, 130),
                overlay_fg: Rgb::new(255, 255, 255),
                overlay_bg: Rgb::new(0, 0, 0),
                pieces: PIECE_COLORS,
            },
            Theme::Light => Self {
                screen: Rgb::new(245, 245, 245),
                well: Rgb::new(255, 255, 255),
                grid: Rgb::new(215, 215, 220),
                border: Rgb::new(60, 60, 60),
                label: Rgb::new(20, 20, 20),
                text: Rgb::new(70, 70, 70),
                ghost: Rgb::new(150, 150, 160),
                overlay_fg: Rgb::new(0, 0, 0),
                overlay_bg: Rgb::new(245, 245, 245),
                pieces: PIECE_COLORS,
            },
        }
    }

    pub fn piece(&self, kind: PieceKind) -> Rgb {
        self.pieces[kind as usize]
    }
}

/// Columns between the board and the side panel
const PANEL_GAP: u16 = 2;
/// Narrowest side panel worth drawing
const MIN_PANEL_WIDTH: u16 = 12;

/// Key reference drawn left of the board
const KEY_HELP: [(&str, &str); 9] = [
    ("←/→", "move"),
    ("↑", "rotate"),
    ("↓", "soft drop"),
    ("spc", "hard drop"),
    ("p", "pause"),
    ("r", "restart"),
    ("ret", "start"),
    ("t", "theme"),
    ("esc", "quit"),
];
/// Widest key-help line: key column plus the longest description
const KEY_HELP_WIDTH: u16 = 14;

/// Draws the board, side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 2 }
    }
}

/// Where the board frame sits on screen.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Size of the bordered board for `snap`, in terminal cells.
    pub fn frame_size(&self, snap: &GameSnapshot) -> (u16, u16) {
        (
            snap.board.width() as u16 * self.cell_w + 2,
            snap.board.height() as u16 + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        let palette = Palette::for_theme(snap.theme);
        fb.resize(viewport.width, viewport.height);
        fb.fill(Cell::new(' ', CellStyle::new(palette.text, palette.screen)));

        let (w, h) = self.frame_size(snap);
        let layout = Layout {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        };

        self.draw_border(fb, layout, CellStyle::new(palette.border, palette.screen));
        self.draw_well(fb, snap, layout, &palette);

        if let Some(ghost) = snap.ghost {
            let style = CellStyle::new(palette.ghost, palette.well).dim();
            self.draw_piece(fb, snap, layout, &ghost, '░', style);
        }
        if let Some(active) = snap.active {
            let style = CellStyle::new(palette.piece(active.kind), palette.well).bold();
            self.draw_piece(fb, snap, layout, &active, '█', style);
        }

        self.draw_side_panel(fb, snap, viewport, layout, &palette);
        self.draw_key_help(fb, layout, &palette);

        match snap.run_state {
            RunState::Idle => self.draw_banner(fb, layout, &palette, &["PRESS ENTER", "TO START"]),
            RunState::Paused => self.draw_banner(fb, layout, &palette, &["PAUSED", "P TO RESUME"]),
            RunState::GameOver => {
                let score = format!("SCORE {}", snap.score);
                self.draw_banner(fb, layout, &palette, &["GAME OVER", score.as_str(), "ENTER OR R"])
            }
            RunState::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, at: Layout, style: CellStyle) {
        if at.w < 2 || at.h < 2 {
            return;
        }
        let right = at.x + at.w - 1;
        let bottom = at.y + at.h - 1;

        for x in at.x + 1..right {
            fb.put_char(x, at.y, '─', style);
            fb.put_char(x, bottom, '─', style);
        }
        for y in at.y + 1..bottom {
            fb.put_char(at.x, y, '│', style);
            fb.put_char(right, y, '│', style);
        }
        fb.put_char(at.x, at.y, '┌', style);
        fb.put_char(right, at.y, '┐', style);
        fb.put_char(at.x, bottom, '└', style);
        fb.put_char(right, bottom, '┘', style);
    }

    fn draw_well(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, at: Layout, palette: &Palette) {
        let empty = CellStyle::new(palette.grid, palette.well).dim();
        for y in 0..snap.board.height() as i8 {
            for x in 0..snap.board.width() as i8 {
                let (ch, style) = match snap.board.get(x, y).flatten() {
                    Some(kind) => ('█', CellStyle::new(palette.piece(kind), palette.well)),
                    None => ('·', empty),
                };
                self.fill_board_cell(fb, at, x as u16, y as u16, ch, style);
            }
        }
    }

    fn draw_piece(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        at: Layout,
        piece: &Piece,
        ch: char,
        style: CellStyle,
    ) {
        let (w, h) = (snap.board.width() as i8, snap.board.height() as i8);
        for (x, y) in piece.cells() {
            // Rows above the board are not drawn.
            if (0..w).contains(&x) && (0..h).contains(&y) {
                self.fill_board_cell(fb, at, x as u16, y as u16, ch, style);
            }
        }
    }

    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        at: Layout,
        x: u16,
        y: u16,
        ch: char,
        style: CellStyle,
    ) {
        fb.fill_rect(at.x + 1 + x * self.cell_w, at.y + 1 + y, self.cell_w, 1, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        at: Layout,
        palette: &Palette,
    ) {
        let px = at.x.saturating_add(at.w).saturating_add(PANEL_GAP);
        if viewport.width.saturating_sub(px) < MIN_PANEL_WIDTH {
            return;
        }
        let label = CellStyle::new(palette.label, palette.screen).bold();
        let value = CellStyle::new(palette.text, palette.screen);
        let mut y = at.y;

        for (name, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(px, y, name, label);
            fb.put_str(px, y + 1, &number.to_string(), value);
            y += 3;
        }

        fb.put_str(px, y, "NEXT", label);
        y += 1;
        if let Some(next) = snap.next {
            let style = CellStyle::new(palette.piece(next.kind), palette.screen);
            for (dx, dy) in next.shape.minos() {
                fb.fill_rect(
                    px + dx as u16 * self.cell_w,
                    y + dy as u16,
                    self.cell_w,
                    1,
                    '█',
                    style,
                );
            }
            y += next.shape.rows() as u16;
        }
        y += 1;

        let lifetime = snap.lifetime;
        for (name, number) in [
            ("HIGH SCORE", lifetime.high_score),
            ("HIGH LEVEL", lifetime.high_level),
            ("TOTAL LINES", lifetime.total_lines),
            ("TOTAL PIECES", lifetime.total_pieces),
        ] {
            let end = fb.put_str(px, y, name, label);
            fb.put_str(end + 1, y, &number.to_string(), value);
            y += 1;
        }
        y += 1;

        fb.put_str(px, y, "RECENT", label);
        y += 1;
        if snap.history.is_empty() {
            fb.put_str(px, y, "-", value);
        }
        for (i, entry) in snap.history.iter().enumerate() {
            if y >= viewport.height {
                break;
            }
            let line = format!("{:>2}. {:>6}  {}", i + 1, entry.score, entry.date);
            fb.put_str(px, y, &line, value);
            y += 1;
        }
    }

    fn draw_key_help(&self, fb: &mut FrameBuffer, at: Layout, palette: &Palette) {
        if at.x < KEY_HELP_WIDTH + PANEL_GAP {
            return;
        }
        let x = at.x - PANEL_GAP - KEY_HELP_WIDTH;
        let label = CellStyle::new(palette.label, palette.screen).bold();
        let value = CellStyle::new(palette.text, palette.screen);

        fb.put_str(x, at.y, "CONTROLS", label);
        for (i, (key, what)) in KEY_HELP.iter().enumerate() {
            let y = at.y + 1 + i as u16;
            fb.put_str(x, y, key, label);
            fb.put_str(x + 5, y, what, value);
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, at: Layout, palette: &Palette, lines: &[&str]) {
        let style = CellStyle::new(palette.overlay_fg, palette.overlay_bg).bold();
        let top = (at.y + at.h / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, text) in lines.iter().enumerate() {
            let text_w = text.chars().count() as u16;
            let x = at.x + at.w.saturating_sub(text_w) / 2;
            fb.put_str(x, top + i as u16, text, style);
        }
    }
}
