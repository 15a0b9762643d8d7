//! Terminal rendering for the game.
//!
//! Rendering is split in two steps. [`GameView`] turns a core snapshot into a
//! [`FrameBuffer`] of styled cells with no I/O at all, so it can be tested.
//! [`TerminalRenderer`] then writes only the cells that changed since the
//! previous frame.
//!
//! Board cells are two columns wide to offset the tall aspect ratio of
//! terminal glyphs.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Palette, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
