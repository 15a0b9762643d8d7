//! Terminal input module.
//!
//! Maps `crossterm` key events to [`KeyCommand`]s: either a
//! [`crate::types::GameAction`] for the engine or an app-level command the
//! front end handles itself (theme toggle, quit).

pub mod map;

pub use blockfall_types as types;

pub use map::{map_key, should_quit, KeyCommand};
