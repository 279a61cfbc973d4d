/// Fallback-capable wrapper around a [`KeyValueStore`].
///
/// On first use the wrapped store is probed with a throwaway write + delete.
/// Probe succeeds → the store is used for the rest of the session.
/// Probe fails → a warning is logged and all traffic goes to an in-process map.
/// The probe result is cached and never re-evaluated.
use std::collections::HashMap;

use super::KeyValueStore;

pub const PROBE_KEY: &str = "__storage_test__";

pub struct SafeStorage<S> {
    store: S,
    memory: HashMap<String, String>,
    available: Option<bool>,
}

impl<S: KeyValueStore> SafeStorage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            memory: HashMap::new(),
            available: None,
        }
    }

    /// Whether the wrapped store is in use. Probes on the first call.
    pub fn is_available(&mut self) -> bool {
        if let Some(available) = self.available {
            return available;
        }
        let available = self.probe();
        self.available = Some(available);
        available
    }

    /// Whether the adapter has switched to in-memory mode.
    pub fn is_fallback(&mut self) -> bool {
        !self.is_available()
    }

    fn probe(&mut self) -> bool {
        let result = self
            .store
            .set(PROBE_KEY, PROBE_KEY)
            .and_then(|_| self.store.remove(PROBE_KEY));
        match result {
            Ok(()) => true,
            Err(e) => {
                // The write may have landed before the failure
                let _ = self.store.remove(PROBE_KEY);
                log::warn!(
                    "[kaybee.storage] Persistent storage unavailable, falling back to memory: {}",
                    e
                );
                false
            }
        }
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        if !self.is_available() {
            return self.memory.get(key).cloned();
        }
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("[kaybee.storage] Read of {} failed: {}", key, e);
                None
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if !self.is_available() {
            self.memory.insert(key.to_string(), value.to_string());
            return;
        }
        if let Err(e) = self.store.set(key, value) {
            log::warn!("[kaybee.storage] Write of {} failed: {}", key, e);
        }
    }

    pub fn remove(&mut self, key: &str) {
        if !self.is_available() {
            self.memory.remove(key);
            return;
        }
        if let Err(e) = self.store.remove(key) {
            log::warn!("[kaybee.storage] Removal of {} failed: {}", key, e);
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    /// Store whose removals always fail, leaving probe writes behind.
    struct StickyStore {
        inner: MemoryStore,
        removals: usize,
    }

    impl KeyValueStore for StickyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.removals += 1;
            if self.removals == 1 {
                return Err(StorageError::Unavailable("sandboxed".into()));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_available_store_is_used() {
        let mut storage = SafeStorage::new(MemoryStore::new());
        storage.set("k", "v");
        assert!(storage.is_available());
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        assert_eq!(storage.store().get("k").unwrap().as_deref(), Some("v"));
        // Probe key cleaned up
        assert!(!storage.store().contains_key(PROBE_KEY));
    }

    #[test]
    fn test_quota_failure_falls_back_to_memory() {
        let mut storage = SafeStorage::new(MemoryStore::with_quota(0));
        assert!(storage.is_fallback());

        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k");
        assert_eq!(storage.get("k"), None);
        assert!(storage.store().is_empty());
    }

    #[test]
    fn test_probe_result_is_cached() {
        let mut storage = SafeStorage::new(MemoryStore::new());
        assert!(storage.is_available());
        // Fill the real store; the adapter keeps using it without re-probing
        storage.set("a", "1");
        assert!(storage.is_available());
        assert_eq!(storage.store().len(), 1);
    }

    #[test]
    fn test_failed_probe_cleans_up_probe_key() {
        let store = StickyStore {
            inner: MemoryStore::new(),
            removals: 0,
        };
        let mut storage = SafeStorage::new(store);
        assert!(storage.is_fallback());
        assert!(!storage.store().inner.contains_key(PROBE_KEY));
    }
}
