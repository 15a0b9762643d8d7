//! Settings file loading.
//!
//! Settings come from a TOML file whose keys mirror
//! [`GameSettings`](crate::core::GameSettings); any key left out keeps its
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::GameSettings;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// `<config_dir>/blockfall/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blockfall").join(CONFIG_FILE_NAME))
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(text: &str) -> Result<GameSettings> {
    let settings: GameSettings = toml::from_str(text).context("invalid settings file")?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings.
///
/// An explicit `path` must exist. Without one the default location is tried
/// and a missing file there means defaults.
pub fn load_settings(path: Option<&Path>) -> Result<GameSettings> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(GameSettings::default()),
        },
    };

    if !required && !path.exists() {
        return Ok(GameSettings::default());
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("in {}", path.display()))
}
