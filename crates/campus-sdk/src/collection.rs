use campus_store::{Hydration, SharedStorage, SyncedStore, WriteOutcome};
use campus_types::{Record, RecordId, StoreKey};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// A synced list of records edited by whole-record replacement.
///
/// Every mutation writes the full list back through the underlying
/// [`SyncedStore`]. Record shape is not validated beyond a non-empty id.
pub struct Collection<R: Record> {
    store: SyncedStore<Vec<R>>,
}

impl<R: Record> Collection<R> {
    /// Bind the record type's key, defaulting to `seed` if nothing is
    /// stored.
    pub fn open(storage: SharedStorage, seed: Vec<R>) -> Self {
        Self {
            store: SyncedStore::open(storage, R::store_key(), seed),
        }
    }

    pub fn list(&self) -> &[R] {
        self.store.get()
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.list().iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn key(&self) -> &StoreKey {
        self.store.key()
    }

    pub fn hydration(&self) -> &Hydration {
        self.store.hydration()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Replace the record with the same id, or append it.
    pub fn upsert(&mut self, record: R) -> SdkResult<WriteOutcome> {
        if record.id().as_str().trim().is_empty() {
            return Err(SdkError::InvalidRecord("record id must not be empty".into()));
        }
        debug!(key = %self.key(), id = %record.id(), "upsert");
        Ok(self.store.modify(move |items| {
            let mut items = items.clone();
            match items.iter_mut().find(|r| r.id() == record.id()) {
                Some(slot) => *slot = record,
                None => items.push(record),
            }
            items
        })?)
    }

    /// Remove the record with `id`. Returns `false` (and writes nothing) if
    /// no such record exists.
    pub fn remove(&mut self, id: &RecordId) -> SdkResult<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let id = id.clone();
        debug!(key = %self.key(), %id, "remove");
        self.store.modify(move |items| {
            items.iter().filter(|r| *r.id() != id).cloned().collect()
        })?;
        Ok(true)
    }

    /// Replace the whole list.
    pub fn replace_all(&mut self, records: Vec<R>) -> SdkResult<WriteOutcome> {
        Ok(self.store.set(records)?)
    }

    /// Forget stored edits and return to the seed list.
    pub fn reset(&mut self) -> SdkResult<()> {
        self.store.clear()?;
        Ok(())
    }

    /// Retry persisting after a failed write.
    pub fn flush(&mut self) -> SdkResult<WriteOutcome> {
        Ok(self.store.flush()?)
    }
}
