//! Blockfall (workspace facade crate).
//!
//! The game lives in dedicated crates under `crates/`; this package re-exports
//! them as `blockfall::{core, input, persist, term, types}` and owns the
//! binary's configuration loading.

pub mod config;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_persist as persist;
pub use blockfall_term as term;
pub use blockfall_types as types;
