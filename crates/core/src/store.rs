//! Key-value store seam for persisted stats, history and preferences.
//!
//! The engine never touches storage. Components that persist (stats, history,
//! theme) are handed a store and write through on every change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Single-threaded shared handle, so several components can write to one store.
pub type SharedStore<T> = Rc<RefCell<T>>;

pub fn shared<T: KeyValueStore>(store: T) -> SharedStore<T> {
    Rc::new(RefCell::new(store))
}

impl<T: KeyValueStore> KeyValueStore for Rc<RefCell<T>> {
    fn get(&self, key: &str) -> Option<String> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.borrow_mut().set(key, value)
    }
}

/// In-memory store, used by tests and when no data directory is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Write `value` and log (rather than propagate) a failure.
pub(crate) fn write_through<S: KeyValueStore>(store: &mut S, key: &str, value: String) {
    if let Err(err) = store.set(key, value) {
        tracing::warn!(key, error = %err, "failed to persist value");
    }
}
