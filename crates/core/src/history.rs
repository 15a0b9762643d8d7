//! Recent final scores, newest first.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::store::{write_through, KeyValueStore};
use crate::types::keys;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub score: u32,
    /// Local time the game ended, human readable
    pub date: String,
}

pub struct ScoreHistory<S: KeyValueStore> {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    store: S,
}

impl<S: KeyValueStore> ScoreHistory<S> {
    /// Load the persisted list. Anything that is not a JSON array yields an
    /// empty history; array items that are not valid entries are skipped.
    pub fn load(store: S, capacity: usize) -> Self {
        let mut entries = match store.get(keys::PREVIOUS_SCORES) {
            Some(raw) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(items) => parse_entries(items),
                Err(err) => {
                    warn!(error = %err, "discarding unreadable score history");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        entries.truncate(capacity);
        Self {
            entries,
            capacity,
            store,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a final score stamped with the current local time.
    pub fn add(&mut self, score: u32) {
        let date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.add_at(score, date);
    }

    pub fn add_at(&mut self, score: u32, date: impl Into<String>) {
        self.entries.insert(
            0,
            HistoryEntry {
                score,
                date: date.into(),
            },
        );
        self.entries.truncate(self.capacity);
        self.persist();
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => write_through(&mut self.store, keys::PREVIOUS_SCORES, json),
            Err(err) => warn!(error = %err, "failed to encode score history"),
        }
    }
}

fn parse_entries(items: Vec<Value>) -> Vec<HistoryEntry> {
    let total = items.len();
    let entries: Vec<HistoryEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if entries.len() < total {
        warn!(skipped = total - entries.len(), "skipped malformed history entries");
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn newest_first_and_capped() {
        let mut history = ScoreHistory::load(MemoryStore::new(), 3);
        for score in [10, 20, 30, 40] {
            history.add_at(score, format!("day {score}"));
        }
        let scores: Vec<u32> = history.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![40, 30, 20]);
    }

    #[test]
    fn persists_json_array() {
        let mut history = ScoreHistory::load(MemoryStore::new(), 10);
        history.add_at(120, "then");
        let raw = history.store.get(keys::PREVIOUS_SCORES).unwrap();
        assert_eq!(raw, r#"[{"score":120,"date":"then"}]"#);
    }

    #[test]
    fn corrupt_data_loads_empty() {
        for raw in ["not json", r#"{"score": 1}"#, "42", r#"[{"points": 3}]"#, "[7, null]"] {
            let store = MemoryStore::with_entries([(keys::PREVIOUS_SCORES, raw)]);
            assert!(ScoreHistory::load(store, 10).is_empty(), "{raw}");
        }
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let raw = r#"[{"score": 900, "date": "a"}, {"points": 3}, "junk", {"score": 50, "date": "b"}]"#;
        let store = MemoryStore::with_entries([(keys::PREVIOUS_SCORES, raw)]);
        let history = ScoreHistory::load(store, 10);
        let scores: Vec<u32> = history.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 50]);
    }

    #[test]
    fn oversized_list_is_truncated_on_load() {
        let list: Vec<HistoryEntry> = (0..15)
            .map(|i| HistoryEntry {
                score: i,
                date: String::new(),
            })
            .collect();
        let raw = serde_json::to_string(&list).unwrap();
        let store = MemoryStore::with_entries([(keys::PREVIOUS_SCORES, raw.as_str())]);
        let history = ScoreHistory::load(store, 10);
        assert_eq!(history.len(), 10);
        assert_eq!(history.entries()[0].score, 0);
    }

    #[test]
    fn add_stamps_a_date() {
        let mut history = ScoreHistory::load(MemoryStore::new(), 10);
        history.add(5);
        assert!(!history.entries()[0].date.is_empty());
    }
}
