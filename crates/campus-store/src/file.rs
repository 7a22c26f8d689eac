//! Directory-backed storage: one `<key>.json` file per key.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so a crash mid-write leaves either the old value or the
//! new one, never a torn file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use campus_types::StoreKey;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::DurableStorage;

const EXTENSION: &str = "json";

/// File-per-key [`DurableStorage`] rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (or create) a storage directory.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "file storage opened");
        Ok(Self { root })
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StoreKey) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", key.as_str()))
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &StoreKey) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 bytes are corruption, not an I/O fault.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(StoreError::Corrupt {
                key: key.clone(),
                reason: e.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &StoreKey, value: &str) -> StoreResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key))
            .map_err(|e| StoreError::Io(e.error))?;
        debug!(%key, bytes = value.len(), "value persisted");
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &StoreKey) -> StoreResult<bool> {
        Ok(self.path_for(key).is_file())
    }

    fn keys(&self) -> StoreResult<Vec<StoreKey>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| StoreKey::new(s).ok())
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
