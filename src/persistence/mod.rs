//! Key-value persistence
//!
//! Progress is stored as one flag per level under `level<N>Completed`, with
//! the literal value `"true"` meaning completed. Settings live under their
//! own key as JSON.
//!
//! Stores are best effort: backends log failures and carry on, so the
//! trait methods are infallible.

use std::collections::BTreeMap;

use crate::consts::LEVEL_COUNT;

/// Value written for a completed level
pub const COMPLETED_VALUE: &str = "true";

/// String key-value store (LocalStorage on web, in-memory elsewhere)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Storage key for a level's completion flag
pub fn completion_key(level: u32) -> String {
    format!("level{}Completed", level)
}

/// Read the completion flag of every level
pub fn load_completion_flags(store: &impl KeyValueStore) -> BTreeMap<u32, bool> {
    (1..=LEVEL_COUNT)
        .map(|id| {
            let done = store.get(&completion_key(id)).as_deref() == Some(COMPLETED_VALUE);
            (id, done)
        })
        .collect()
}

/// Mark a level completed (written by the level pages themselves)
pub fn record_completion(store: &mut impl KeyValueStore, level: u32) {
    store.set(&completion_key(level), COMPLETED_VALUE);
}

/// Remove every level's completion flag
pub fn clear_completion_flags(store: &mut impl KeyValueStore) {
    for id in 1..=LEVEL_COUNT {
        store.remove(&completion_key(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(completion_key(1), "level1Completed");
        assert_eq!(completion_key(7), "level7Completed");
    }

    #[test]
    fn test_flags_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        record_completion(&mut store, 2);
        let flags = load_completion_flags(&store);
        assert_eq!(flags.len(), LEVEL_COUNT as usize);
        assert_eq!(flags.get(&2), Some(&true));
        assert_eq!(flags.get(&1), Some(&false));
    }

    #[test]
    fn test_clear_leaves_other_keys() {
        let mut store = MemoryStore::new();
        store.set("level_map_settings", "{}");
        for id in 1..=LEVEL_COUNT {
            record_completion(&mut store, id);
        }
        clear_completion_flags(&mut store);
        assert_eq!(store.len(), 1);
        assert!(store.get("level_map_settings").is_some());
    }
}
