use campus_types::StoreKey;

/// Errors from durable storage and synced bindings.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Writing would exceed the storage quota.
    #[error("quota exceeded writing {key}: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        key: StoreKey,
        needed: usize,
        available: usize,
    },

    /// Storage backend is read-only or otherwise unavailable.
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    /// Encoding a value for storage failed.
    #[error("encode error for {key}: {reason}")]
    Encode { key: StoreKey, reason: String },

    /// Durable data is present but cannot be decoded.
    #[error("corrupt value under {key}: {reason}")]
    Corrupt { key: StoreKey, reason: String },

    /// The binding never read its durable copy, so writing would
    /// overwrite data it has not seen.
    #[error("{key} has not been read from storage: {reason}")]
    NotHydrated { key: StoreKey, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if retrying the same write later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded { .. }
                | Self::Unavailable(_)
                | Self::NotHydrated { .. }
                | Self::Io(_)
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
