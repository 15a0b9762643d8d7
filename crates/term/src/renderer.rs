//! TerminalRenderer: writes framebuffers to a terminal.
//!
//! After the first full paint only runs of changed cells are re-emitted.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    previous: Option<FrameBuffer>,
    scratch: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
            scratch: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.scratch.clear();
        self.scratch
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.flush_scratch()
    }

    /// Undo [`enter`](Self::enter). Safe to call after a partial failure.
    pub fn leave(&mut self) -> Result<()> {
        self.scratch.clear();
        self.scratch
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        let flushed = self.flush_scratch();
        terminal::disable_raw_mode()?;
        flushed
    }

    /// Force a full repaint on the next draw (after a resize, say).
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Draw `frame`, diffing against the last one drawn.
    pub fn draw(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.scratch.clear();
        encode_frame_into(self.previous.as_ref(), frame, &mut self.scratch)?;
        self.flush_scratch()?;

        match self.previous.as_mut() {
            Some(prev) => prev.clone_from(frame),
            None => self.previous = Some(frame.clone()),
        }
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode the commands that turn `prev` into `next`.
///
/// Without a previous frame, or when the size changed, the whole screen is
/// cleared and repainted.
pub fn encode_frame_into(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let prev = prev.filter(|p| (p.width(), p.height()) == (next.width(), next.height()));
    if prev.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut pen: Option<CellStyle> = None;
    for y in 0..next.height() {
        for (start, end) in dirty_runs(prev, next, y) {
            out.queue(cursor::MoveTo(start, y))?;
            for x in start..end {
                let cell = next.get(x, y).unwrap_or_default();
                if pen != Some(cell.style) {
                    queue_style(out, cell.style)?;
                    pen = Some(cell.style);
                }
                out.queue(Print(cell.ch))?;
            }
        }
    }

    if pen.is_some() {
        out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Half-open column ranges of row `y` that differ from `prev`.
fn dirty_runs(prev: Option<&FrameBuffer>, next: &FrameBuffer, y: u16) -> Vec<(u16, u16)> {
    let Some(prev) = prev else {
        return vec![(0, next.width())];
    };

    let mut runs = Vec::new();
    let mut start = None;
    for x in 0..next.width() {
        let changed = prev.get(x, y) != next.get(x, y);
        match (changed, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                runs.push((s, x));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, next.width()));
    }
    runs
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?
        .queue(SetForegroundColor(color(style.fg)))?
        .queue(SetBackgroundColor(color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
