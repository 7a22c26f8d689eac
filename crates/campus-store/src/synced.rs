//! Write-through binding between one [`StoreKey`] and a typed value.

use std::fmt;

use campus_types::StoreKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::{Codec, JsonCodec};
use crate::error::{StoreError, StoreResult};
use crate::traits::SharedStorage;

/// How the current value relates to the durable copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hydration {
    /// Nothing was stored; the default is in use.
    Absent,
    /// The value came from storage, or has since been written to it.
    Restored,
    /// A durable value was present but could not be decoded; the default is
    /// in use and the bad text stays in storage until the next write.
    Corrupt { reason: String },
    /// Storage could not be read; the default is in use. Writes re-read
    /// storage first and are refused while it stays unreadable.
    Unavailable { reason: String },
}

impl Hydration {
    /// Returns `true` if the current value came from the caller's default.
    pub fn used_default(&self) -> bool {
        !matches!(self, Self::Restored)
    }
}

/// A change to a bound value: a literal replacement or a function of the
/// old value.
pub enum Update<T> {
    Replace(T),
    Apply(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    pub fn apply(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::Apply(Box::new(f))
    }

    fn resolve(self, current: &T) -> T {
        match self {
            Self::Replace(v) => v,
            Self::Apply(f) => f(current),
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Self::Replace(value)
    }
}

impl<T> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(_) => f.write_str("Update::Replace(..)"),
            Self::Apply(_) => f.write_str("Update::Apply(..)"),
        }
    }
}

/// Result of a successful write-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Encoded size written to storage.
    pub bytes: usize,
}

/// Typed read/write binding for a single logical value.
///
/// On open the durable copy wins: if storage holds a decodable value under
/// the key it becomes the current value, otherwise the caller's default is
/// used without being written. Every update replaces the in-memory value
/// first and then writes the encoded value through to storage before
/// returning.
///
/// A failed write leaves the binding dirty: the in-memory value is ahead of
/// storage until [`SyncedStore::flush`] or a later update succeeds.
pub struct SyncedStore<T, C = JsonCodec> {
    storage: SharedStorage,
    key: StoreKey,
    default: T,
    value: T,
    hydration: Hydration,
    dirty: bool,
    codec: C,
}

impl<T> SyncedStore<T, JsonCodec>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Bind `key` with the JSON codec.
    pub fn open(storage: SharedStorage, key: StoreKey, default: T) -> Self {
        Self::open_with_codec(storage, key, default, JsonCodec)
    }
}

impl<T, C> SyncedStore<T, C>
where
    T: Serialize + DeserializeOwned + Clone,
    C: Codec,
{
    /// Bind `key` with an explicit codec.
    pub fn open_with_codec(storage: SharedStorage, key: StoreKey, default: T, codec: C) -> Self {
        let (value, hydration) = hydrate(storage.as_ref(), &key, &codec, &default);
        info!(%key, ?hydration, "synced store opened");
        Self {
            storage,
            key,
            default,
            value,
            hydration,
            dirty: false,
            codec,
        }
    }

    /// The current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// A clone of the current value.
    pub fn value(&self) -> T {
        self.value.clone()
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    pub fn hydration(&self) -> &Hydration {
        &self.hydration
    }

    /// Returns `true` if the last write failed and storage is behind.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply `update` and write the result through to storage.
    ///
    /// The new value is visible through [`get`](Self::get) even when the
    /// write fails; the error is returned and the binding stays dirty.
    ///
    /// A binding whose storage was unreadable at open re-reads it first, so
    /// the update applies to the durable value. If storage is still
    /// unreadable the update is refused with [`StoreError::NotHydrated`]
    /// and nothing changes.
    pub fn update(&mut self, update: impl Into<Update<T>>) -> StoreResult<WriteOutcome> {
        self.ensure_hydrated()?;
        self.value = update.into().resolve(&self.value);
        self.persist()
    }

    /// Replace the value.
    pub fn set(&mut self, value: T) -> StoreResult<WriteOutcome> {
        self.update(Update::Replace(value))
    }

    /// Derive the new value from the old one.
    pub fn modify(&mut self, f: impl FnOnce(&T) -> T + 'static) -> StoreResult<WriteOutcome> {
        self.update(Update::apply(f))
    }

    /// Write the current value again. Used to reconcile a dirty binding
    /// once storage has recovered.
    pub fn flush(&mut self) -> StoreResult<WriteOutcome> {
        self.ensure_hydrated()?;
        self.persist()
    }

    /// Remove the key from storage and reset to the default. Afterwards the
    /// binding behaves as if the key had never been written.
    ///
    /// Returns `true` if a durable value was present. On failure nothing
    /// changes.
    pub fn clear(&mut self) -> StoreResult<bool> {
        let existed = self.storage.remove(&self.key)?;
        self.value = self.default.clone();
        self.hydration = Hydration::Absent;
        self.dirty = false;
        debug!(key = %self.key, existed, "synced store cleared");
        Ok(existed)
    }

    /// Re-read the durable copy, discarding unsaved in-memory state.
    pub fn reload(&mut self) {
        let (value, hydration) = hydrate(self.storage.as_ref(), &self.key, &self.codec, &self.default);
        self.value = value;
        self.hydration = hydration;
        self.dirty = false;
    }

    fn ensure_hydrated(&mut self) -> StoreResult<()> {
        if !matches!(self.hydration, Hydration::Unavailable { .. }) {
            return Ok(());
        }
        self.reload();
        match &self.hydration {
            Hydration::Unavailable { reason } => Err(StoreError::NotHydrated {
                key: self.key.clone(),
                reason: reason.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn persist(&mut self) -> StoreResult<WriteOutcome> {
        let result = self
            .codec
            .encode(&self.value)
            .map_err(|reason| StoreError::Encode {
                key: self.key.clone(),
                reason,
            })
            .and_then(|text| {
                self.storage.set(&self.key, &text)?;
                Ok(WriteOutcome { bytes: text.len() })
            });

        match &result {
            Ok(outcome) => {
                self.dirty = false;
                self.hydration = Hydration::Restored;
                debug!(key = %self.key, bytes = outcome.bytes, "value written through");
            }
            Err(e) => {
                self.dirty = true;
                warn!(key = %self.key, error = %e, "write-through failed; in-memory value is ahead of storage");
            }
        }
        result
    }
}

fn hydrate<T, C>(
    storage: &dyn crate::traits::DurableStorage,
    key: &StoreKey,
    codec: &C,
    default: &T,
) -> (T, Hydration)
where
    T: DeserializeOwned + Clone,
    C: Codec,
{
    match storage.get(key) {
        Ok(None) => (default.clone(), Hydration::Absent),
        Ok(Some(text)) => match codec.decode::<T>(&text) {
            Ok(value) => (value, Hydration::Restored),
            Err(reason) => {
                warn!(%key, %reason, "stored value is corrupt; using default");
                (default.clone(), Hydration::Corrupt { reason })
            }
        },
        Err(StoreError::Corrupt { reason, .. }) => {
            warn!(%key, %reason, "stored value is unreadable; using default");
            (default.clone(), Hydration::Corrupt { reason })
        }
        Err(e) => {
            warn!(%key, error = %e, "storage read failed; using default");
            (
                default.clone(),
                Hydration::Unavailable {
                    reason: e.to_string(),
                },
            )
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SyncedStore<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncedStore")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("hydration", &self.hydration)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use proptest::prelude::*;
    use serde::Deserialize;

    use super::*;
    use crate::memory::InMemoryStorage;
    use crate::traits::DurableStorage;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        tags: Vec<String>,
        visits: u32,
    }

    fn key(s: &str) -> StoreKey {
        StoreKey::new(s).unwrap()
    }

    fn storage() -> Arc<InMemoryStorage> {
        Arc::new(InMemoryStorage::new())
    }

    // -----------------------------------------------------------------------
    // Hydration
    // -----------------------------------------------------------------------

    #[test]
    fn absent_key_uses_default_without_writing() {
        let backing = storage();
        let store = SyncedStore::open(backing.clone(), key("k"), vec![1, 2, 3]);

        assert_eq!(store.get(), &vec![1, 2, 3]);
        assert_eq!(store.hydration(), &Hydration::Absent);
        assert!(backing.is_empty(), "reading must not persist the default");
    }

    #[test]
    fn stored_empty_value_is_not_absent() {
        let backing = storage();
        backing.set(&key("k"), "[]").unwrap();

        let store = SyncedStore::open(backing, key("k"), vec![1, 2, 3]);
        assert!(store.get().is_empty());
        assert_eq!(store.hydration(), &Hydration::Restored);
    }

    #[test]
    fn corrupt_value_falls_back_to_default() {
        let backing = storage();
        backing.insert_raw(&key("k"), "{\"name\": \"trunc");

        let default = Profile {
            name: "guest".into(),
            tags: vec![],
            visits: 0,
        };
        let store = SyncedStore::open(backing.clone(), key("k"), default.clone());
        assert_eq!(store.get(), &default);
        assert!(matches!(store.hydration(), Hydration::Corrupt { .. }));
        assert!(store.hydration().used_default());
        // Corrupt text is left alone until something is written.
        assert_eq!(
            backing.get(&key("k")).unwrap().as_deref(),
            Some("{\"name\": \"trunc")
        );
    }

    #[test]
    fn wrong_shape_counts_as_corrupt() {
        let backing = storage();
        backing.set(&key("k"), "{\"unexpected\":true}").unwrap();
        let store = SyncedStore::open(backing, key("k"), vec![0u8]);
        assert_eq!(store.get(), &vec![0u8]);
        assert!(matches!(store.hydration(), Hydration::Corrupt { .. }));
    }

    // -----------------------------------------------------------------------
    // Write-through
    // -----------------------------------------------------------------------

    #[test]
    fn update_writes_through_and_survives_reopen() {
        let backing = storage();
        let mut store = SyncedStore::open(backing.clone(), key("k"), vec![1, 2, 3]);
        let outcome = store.set(vec![9]).unwrap();
        assert_eq!(outcome.bytes, 3);
        assert_eq!(backing.get(&key("k")).unwrap().as_deref(), Some("[9]"));

        let reopened = SyncedStore::open(backing, key("k"), vec![1, 2, 3]);
        assert_eq!(reopened.get(), &vec![9]);
        assert_eq!(reopened.hydration(), &Hydration::Restored);
    }

    #[test]
    fn updates_apply_in_issue_order() {
        let backing = storage();
        let mut store = SyncedStore::open(backing.clone(), key("k"), 1i64);
        store.modify(|v| v + 10).unwrap();
        store.modify(|v| v * 2).unwrap();
        assert_eq!(*store.get(), 22);

        let reopened = SyncedStore::open(backing, key("k"), 0i64);
        assert_eq!(*reopened.get(), 22);
    }

    #[test]
    fn literal_and_function_updates_mix() {
        let mut store = SyncedStore::open(storage(), key("k"), String::new());
        store.update("hello".to_string()).unwrap();
        store.update(Update::apply(|s: &String| format!("{s}, world"))).unwrap();
        assert_eq!(store.get(), "hello, world");
    }

    #[test]
    fn write_after_corruption_repairs_storage() {
        let backing = storage();
        backing.insert_raw(&key("k"), "not json");
        let mut store = SyncedStore::open(backing.clone(), key("k"), 0u32);
        assert!(store.hydration().used_default());
        store.set(5).unwrap();
        assert_eq!(store.hydration(), &Hydration::Restored);
        assert!(!store.hydration().used_default());

        let reopened = SyncedStore::open(backing, key("k"), 0u32);
        assert_eq!(*reopened.get(), 5);
        assert_eq!(reopened.hydration(), &Hydration::Restored);
    }

    #[test]
    fn keys_are_independent() {
        let backing = storage();
        let mut a = SyncedStore::open(backing.clone(), key("a"), 0u32);
        let b = SyncedStore::open(backing.clone(), key("b"), 0u32);
        a.set(7).unwrap();
        assert_eq!(*b.get(), 0);
        assert!(!backing.contains(&key("b")).unwrap());
    }

    // -----------------------------------------------------------------------
    // Write failures
    // -----------------------------------------------------------------------

    #[test]
    fn failed_write_keeps_memory_value_and_marks_dirty() {
        let backing = Arc::new(InMemoryStorage::with_quota(16));
        let mut store = SyncedStore::open(backing.clone(), key("k"), String::new());
        store.set("ok".into()).unwrap();

        let err = store.set("this will not fit in sixteen bytes".into()).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(err.is_retryable());
        assert!(store.is_dirty());
        assert_eq!(store.get(), "this will not fit in sixteen bytes");
        // Storage still holds the last successful value.
        assert_eq!(backing.get(&key("k")).unwrap().as_deref(), Some("\"ok\""));
    }

    #[test]
    fn flush_reconciles_after_recovery() {
        let backing = storage();
        let mut store = SyncedStore::open(backing.clone(), key("k"), 0u32);
        backing.set_read_only(true);
        assert!(store.set(3).is_err());
        assert!(store.is_dirty());

        backing.set_read_only(false);
        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(backing.get(&key("k")).unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn encode_failure_is_reported() {
        // JSON object keys must be strings.
        let mut store = SyncedStore::open(storage(), key("k"), BTreeMap::<Vec<u8>, u8>::new());
        let err = store
            .modify(|m| {
                let mut m = m.clone();
                m.insert(vec![1], 1);
                m
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Encode { .. }));
        assert!(store.is_dirty());
        assert_eq!(store.get().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Clear / reload
    // -----------------------------------------------------------------------

    #[test]
    fn clear_behaves_like_never_written() {
        let backing = storage();
        let mut store = SyncedStore::open(backing.clone(), key("k"), 1u8);
        store.set(2).unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(*store.get(), 1);
        assert_eq!(store.hydration(), &Hydration::Absent);
        assert!(!backing.contains(&key("k")).unwrap());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn reload_discards_unsaved_state() {
        let backing = storage();
        let mut store = SyncedStore::open(backing.clone(), key("k"), 0u32);
        store.set(1).unwrap();
        backing.set_read_only(true);
        let _ = store.set(2);
        store.reload();
        assert_eq!(*store.get(), 1);
        assert!(!store.is_dirty());
    }

    #[test]
    fn unavailable_storage_hydrates_default() {
        struct Broken;
        impl DurableStorage for Broken {
            fn get(&self, _: &StoreKey) -> StoreResult<Option<String>> {
                Err(StoreError::Unavailable("disk gone".into()))
            }
            fn set(&self, _: &StoreKey, _: &str) -> StoreResult<()> {
                Err(StoreError::Unavailable("disk gone".into()))
            }
            fn remove(&self, _: &StoreKey) -> StoreResult<bool> {
                Ok(false)
            }
            fn keys(&self) -> StoreResult<Vec<StoreKey>> {
                Ok(vec![])
            }
        }

        let mut store = SyncedStore::open(Arc::new(Broken), key("k"), 42u32);
        assert_eq!(*store.get(), 42);
        assert!(matches!(store.hydration(), Hydration::Unavailable { .. }));

        let err = store.modify(|v| v + 1).unwrap_err();
        assert!(matches!(err, StoreError::NotHydrated { .. }));
        assert!(err.is_retryable());
        assert_eq!(*store.get(), 42);
        assert!(!store.is_dirty());
        assert!(matches!(store.flush(), Err(StoreError::NotHydrated { .. })));
    }

    /// Storage whose reads fail until switched back on.
    struct FlakyReads {
        inner: InMemoryStorage,
        failing: AtomicBool,
    }

    impl DurableStorage for FlakyReads {
        fn get(&self, key: &StoreKey) -> StoreResult<Option<String>> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("read timed out".into()));
            }
            self.inner.get(key)
        }
        fn set(&self, key: &StoreKey, value: &str) -> StoreResult<()> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &StoreKey) -> StoreResult<bool> {
            self.inner.remove(key)
        }
        fn keys(&self) -> StoreResult<Vec<StoreKey>> {
            self.inner.keys()
        }
    }

    #[test]
    fn update_after_read_recovers_keeps_durable_data() {
        let backing = Arc::new(FlakyReads {
            inner: InMemoryStorage::new(),
            failing: AtomicBool::new(false),
        });
        backing.set(&key("k"), "[10,20,30]").unwrap();
        backing.failing.store(true, Ordering::SeqCst);

        let mut store = SyncedStore::open(backing.clone(), key("k"), vec![1u32]);
        assert_eq!(store.get(), &vec![1]);
        assert!(matches!(store.hydration(), Hydration::Unavailable { .. }));

        backing.failing.store(false, Ordering::SeqCst);
        store
            .modify(|v| {
                let mut v = v.clone();
                v.push(2);
                v
            })
            .unwrap();

        assert_eq!(store.get(), &vec![10, 20, 30, 2]);
        assert_eq!(store.hydration(), &Hydration::Restored);
        assert_eq!(
            backing.get(&key("k")).unwrap().as_deref(),
            Some("[10,20,30,2]")
        );
    }

    #[test]
    fn write_marks_absent_binding_restored() {
        let mut store = SyncedStore::open(storage(), key("k"), 0u32);
        assert_eq!(store.hydration(), &Hydration::Absent);
        store.set(1).unwrap();
        assert_eq!(store.hydration(), &Hydration::Restored);
        store.clear().unwrap();
        assert_eq!(store.hydration(), &Hydration::Absent);
    }

    // -----------------------------------------------------------------------
    // Round-trip property
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn rehydration_returns_last_written(
            name in ".*",
            tags in proptest::collection::vec("[a-z]{0,8}", 0..6),
            visits in any::<u32>(),
        ) {
            let backing = storage();
            let profile = Profile { name, tags, visits };
            let default = Profile { name: String::new(), tags: vec![], visits: 0 };

            let mut store = SyncedStore::open(backing.clone(), key("profile"), default.clone());
            store.set(profile.clone()).unwrap();

            let reopened = SyncedStore::open(backing, key("profile"), default);
            prop_assert_eq!(reopened.get(), &profile);
        }
    }
}
