//! Attendance session broadcast for the campus OS.
//!
//! An instructor view starts an attendance session; a student view shows a
//! prompt until the student acknowledges it. The two views share one
//! [`SessionBridge`], an in-process channel with a single listener and a
//! single pending session.
//!
//! # Delivery Rules
//!
//! 1. At most one listener. Registering a new one replaces the old one.
//! 2. At most one live session. A new `notify` supersedes the pending one;
//!    sessions are never queued.
//! 3. With no listener, `notify` drops the session. A listener registered
//!    later does not see it.
//! 4. Delivery is synchronous and in-process only. Other processes, tabs
//!    and devices never see a session.

pub mod bridge;
pub mod manager;
pub mod prompt;
pub mod slot;

pub use bridge::{Delivery, ListenerHandle, SessionBridge};
pub use manager::SessionManager;
pub use prompt::PromptState;
pub use slot::SessionSlot;
