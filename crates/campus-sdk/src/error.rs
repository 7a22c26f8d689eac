use campus_types::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("{role} may not {action}")]
    PermissionDenied { role: Role, action: &'static str },

    #[error("invalid login: {0}")]
    InvalidLogin(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] campus_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Returns `true` if the in-memory state changed but could not be
    /// persisted. The change is kept and can be flushed later.
    pub fn is_unsaved_write(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
