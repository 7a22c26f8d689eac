//! High-level campus OS API.
//!
//! [`Campus`] opens every synced dataset (identity, logo, buildings,
//! courses, faculty, students, media, events, jobs) against one durable
//! storage, and owns the attendance [`SessionManager`](campus_bridge::SessionManager).
//! [`Collection`] is the CRUD surface the admin views edit through.

pub mod campus;
pub mod collection;
pub mod config;
pub mod error;
pub mod seed;

pub use campus::{Campus, KeyStatus};
pub use collection::Collection;
pub use config::CampusConfig;
pub use error::{SdkError, SdkResult};
pub use seed::Seed;
