// SPDX-License-Identifier: GPL-3.0

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;

/// In-memory [`KeyValueStore`], the fake the repositories are tested against
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `bytes` under `key`
    pub fn with_entry(key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.insert(key, bytes.into());
        store
    }

    /// Synchronous read, used by tests to inspect what was written
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn insert(&self, key: &str, bytes: Vec<u8>) {
        self.lock().insert(key.to_string(), bytes);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a valid map
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, anywho::Error> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), anywho::Error> {
        self.insert(key, bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_loads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load("Cards").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_previous_value() {
        let store = MemoryStore::with_entry("Cards", b"old".to_vec());
        store.save("Cards", b"new".to_vec()).await.unwrap();
        assert_eq!(store.load("Cards").await.unwrap(), Some(b"new".to_vec()));
    }
}
