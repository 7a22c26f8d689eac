use std::sync::{Mutex, MutexGuard, PoisonError};

use campus_types::Session;

/// Single-slot channel holding at most one [`Session`].
///
/// `send` overwrites instead of queueing, so only the most recent session
/// is ever observable.
#[derive(Debug, Default)]
pub struct SessionSlot {
    slot: Mutex<Option<Session>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `session` in the slot. Returns the session it superseded, if any.
    pub fn send(&self, session: Session) -> Option<Session> {
        self.lock().replace(session)
    }

    /// Take the session out of the slot.
    pub fn receive(&self) -> Option<Session> {
        self.lock().take()
    }

    /// Look at the session without taking it.
    pub fn peek(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Empty the slot. Returns `true` if it held a session.
    pub fn clear(&self) -> bool {
        self.receive().is_some()
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    // A panic while holding the lock cannot leave an `Option` half-written.
    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
