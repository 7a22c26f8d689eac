use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("record id must not be empty")]
    EmptyId,
}
