use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use campus_types::StoreKey;

use crate::error::{StoreError, StoreResult};
use crate::traits::DurableStorage;

/// In-memory, HashMap-based storage.
///
/// Intended for tests and embedding. Values are held behind a `RwLock`.
/// An optional byte quota makes `set` fail the way a full browser storage
/// area does, and the store can be switched read-only to simulate storage
/// becoming unavailable.
pub struct InMemoryStorage {
    values: RwLock<HashMap<StoreKey, String>>,
    quota: Option<usize>,
    read_only: AtomicBool,
}

impl InMemoryStorage {
    /// Create a new empty, unlimited store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota: None,
            read_only: AtomicBool::new(false),
        }
    }

    /// Create a store that refuses writes once the total stored bytes
    /// (keys plus values) would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Make subsequent `set` and `remove` calls fail (or succeed again).
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Overwrite the raw text under `key`, bypassing quota and read-only
    /// checks. Used to plant corrupt data in tests.
    pub fn insert_raw(&self, key: &StoreKey, text: impl Into<String>) {
        if let Ok(mut map) = self.values.write() {
            map.insert(key.clone(), text.into());
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored keys and values.
    pub fn used_bytes(&self) -> usize {
        self.values
            .read()
            .map(|m| m.iter().map(|(k, v)| entry_size(k, v)).sum())
            .unwrap_or(0)
    }

    /// Remove everything, like wiping device storage.
    pub fn wipe(&self) {
        if let Ok(mut map) = self.values.write() {
            map.clear();
        }
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage is read-only".into()));
        }
        Ok(())
    }
}

fn entry_size(key: &StoreKey, value: &str) -> usize {
    key.as_str().len() + value.len()
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {e}"))
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableStorage for InMemoryStorage {
    fn get(&self, key: &StoreKey) -> StoreResult<Option<String>> {
        let map = self.values.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &StoreKey, value: &str) -> StoreResult<()> {
        self.check_writable()?;
        let mut map = self.values.write().map_err(poisoned)?;
        if let Some(quota) = self.quota {
            // The entry being replaced does not count against the new write.
            let others: usize = map
                .iter()
                .filter(|(k, _)| *k != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = entry_size(key, value);
            let available = quota.saturating_sub(others);
            if needed > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.clone(),
                    needed,
                    available,
                });
            }
        }
        map.insert(key.clone(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> StoreResult<bool> {
        self.check_writable()?;
        let mut map = self.values.write().map_err(poisoned)?;
        Ok(map.remove(key).is_some())
    }

    fn contains(&self, key: &StoreKey) -> StoreResult<bool> {
        let map = self.values.read().map_err(poisoned)?;
        Ok(map.contains_key(key))
    }

    fn keys(&self) -> StoreResult<Vec<StoreKey>> {
        let map = self.values.read().map_err(poisoned)?;
        let mut keys: Vec<StoreKey> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("key_count", &self.len())
            .field("quota", &self.quota)
            .field("read_only", &self.read_only.load(Ordering::SeqCst))
            .finish()
    }
}
