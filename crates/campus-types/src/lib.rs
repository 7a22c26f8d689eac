//! Foundation types for the campus OS.
//!
//! This crate provides the key, record, and session types shared by every
//! other campus crate. It has no I/O of its own.
//!
//! # Key Types
//!
//! - [`StoreKey`] — Namespace tag under which one logical value is persisted
//! - [`Record`] — Trait implemented by every collection entry (buildings, courses, ...)
//! - [`User`] — Authenticated identity produced by the login boundary
//! - [`Session`] — Ephemeral attendance-session payload carried by the bridge
//! - [`RecordId`] — UUID v7 record identifier

pub mod error;
pub mod key;
pub mod record;
pub mod session;
pub mod user;

pub use error::TypeError;
pub use key::StoreKey;
pub use record::{
    BrandLogo, Building, CampusEvent, Course, Faculty, Job, MediaItem, Record, RecordId, Student,
};
pub use session::Session;
pub use user::{Role, User};
