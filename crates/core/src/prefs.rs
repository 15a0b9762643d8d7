//! Persisted display preferences.

use tracing::warn;

use crate::store::{write_through, KeyValueStore};
use crate::types::{keys, Theme};

pub struct ThemePreference<S: KeyValueStore> {
    theme: Theme,
    store: S,
}

impl<S: KeyValueStore> ThemePreference<S> {
    /// Stored as `"true"` for dark and `"false"` for light. Missing means dark.
    pub fn load(store: S) -> Self {
        let theme = match store.get(keys::DARK_MODE).as_deref() {
            None | Some("true") => Theme::Dark,
            Some("false") => Theme::Light,
            Some(other) => {
                warn!(value = other, "ignoring unknown theme flag");
                Theme::Dark
            }
        };
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        write_through(&mut self.store, keys::DARK_MODE, theme.is_dark().to_string());
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }
}
