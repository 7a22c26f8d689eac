use std::sync::Arc;

use campus_types::StoreKey;

use crate::error::StoreResult;

/// Device-local text store addressed by key.
///
/// All implementations must satisfy these invariants:
/// - A key that was never set, or was removed, reads as `Ok(None)`.
/// - `set` replaces the whole value; last write under a key wins.
/// - The store never interprets values; it is a pure key-value store.
/// - Failures are returned, never silently ignored.
pub trait DurableStorage: Send + Sync {
    /// Read the text stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    fn get(&self, key: &StoreKey) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &StoreKey, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if a value was present.
    fn remove(&self, key: &StoreKey) -> StoreResult<bool>;

    /// Check whether a value is stored under `key`.
    ///
    /// Default implementation calls `get()`. Backends may override to avoid
    /// reading the value.
    fn contains(&self, key: &StoreKey) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All keys currently stored, sorted.
    fn keys(&self) -> StoreResult<Vec<StoreKey>>;
}

/// Storage handle shared by every binding in a process.
pub type SharedStorage = Arc<dyn DurableStorage>;
