//! Synced local persistence for the campus OS.
//!
//! This crate keeps an in-memory value and a durable on-device copy
//! consistent, with the durable copy as the source of truth at startup.
//!
//! # Storage Backends
//!
//! All backends implement the [`DurableStorage`] trait, a text store
//! addressed by [`StoreKey`](campus_types::StoreKey):
//!
//! - [`InMemoryStorage`] -- `HashMap`-based store for tests and embedding,
//!   with an optional quota to simulate full storage
//! - [`FileStorage`] -- one JSON file per key in a data directory
//!
//! # Bindings
//!
//! [`SyncedStore`] binds one key to a typed value. Every update is written
//! through to storage as part of the update call.
//!
//! # Design Rules
//!
//! 1. Absent keys hydrate to the caller's default, and reading never writes.
//! 2. Undecodable durable data hydrates to the default; it is never an error.
//! 3. Write failures are returned to the caller and leave the binding dirty;
//!    the in-memory value stays authoritative.
//! 4. Writes to different keys are independent; there is no cross-key
//!    transaction.

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod synced;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{Codec, JsonCodec};
pub use error::{StoreError, StoreResult};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use synced::{Hydration, SyncedStore, Update, WriteOutcome};
pub use traits::{DurableStorage, SharedStorage};
