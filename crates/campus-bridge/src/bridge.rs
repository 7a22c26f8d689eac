use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use campus_types::Session;
use tracing::debug;

use crate::slot::SessionSlot;

type Listener = Arc<dyn Fn(&Session) + Send + Sync>;

/// What happened to a notified session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The listener was invoked with the session.
    Delivered,
    /// No listener was registered; the session was discarded.
    Dropped,
}

/// The installed listener, tagged with the registration that installed it.
#[derive(Default)]
struct ListenerSlot {
    generation: u64,
    listener: Option<Listener>,
}

struct BridgeInner {
    listener: Mutex<ListenerSlot>,
    pending: SessionSlot,
    registrations: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl BridgeInner {
    fn listener(&self) -> MutexGuard<'_, ListenerSlot> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process, single-listener, single-slot session channel.
///
/// Cloning a bridge yields another handle to the same channel; the producer
/// and consumer views each hold one.
#[derive(Clone)]
pub struct SessionBridge {
    inner: Arc<BridgeInner>,
}

impl SessionBridge {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                listener: Mutex::new(ListenerSlot::default()),
                pending: SessionSlot::new(),
                registrations: AtomicU64::new(0),
                delivered: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    /// Install `callback` as the only listener, replacing any previous one.
    ///
    /// The returned handle removes this listener and no other: once a newer
    /// registration has replaced it, deregistering is a no-op.
    pub fn register_listener<F>(&self, callback: F) -> ListenerHandle
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let generation = self.inner.registrations.fetch_add(1, Ordering::SeqCst) + 1;
        let replaced = {
            let mut slot = self.inner.listener();
            slot.generation = generation;
            slot.listener.replace(Arc::new(callback)).is_some()
        };
        debug!(generation, replaced, "session listener registered");
        ListenerHandle {
            bridge: Arc::downgrade(&self.inner),
            generation,
        }
    }

    /// Publish `session` to the current listener.
    ///
    /// The session supersedes any pending one and the listener is called
    /// synchronously before this returns. With no listener the session is
    /// dropped and the pending slot emptied.
    pub fn notify(&self, session: Session) -> Delivery {
        // Clone the listener out so the callback may re-enter the bridge.
        let listener = self.inner.listener().listener.clone();
        match listener {
            Some(listener) => {
                if let Some(prior) = self.inner.pending.send(session.clone()) {
                    debug!(instructor = %prior.instructor, "pending session superseded");
                }
                listener(&session);
                self.inner.delivered.fetch_add(1, Ordering::Relaxed);
                debug!(instructor = %session.instructor, active = session.active, "session delivered");
                Delivery::Delivered
            }
            None => {
                self.inner.pending.clear();
                self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(instructor = %session.instructor, "no listener; session dropped");
                Delivery::Dropped
            }
        }
    }

    /// Consumer acknowledgment: clear the pending session and return it.
    /// The producer is not told.
    pub fn acknowledge(&self) -> Option<Session> {
        self.inner.pending.receive()
    }

    /// Clear the pending session. Returns `true` if one was pending.
    pub fn clear(&self) -> bool {
        self.inner.pending.clear()
    }

    /// The pending (delivered, unacknowledged) session.
    pub fn current(&self) -> Option<Session> {
        self.inner.pending.peek()
    }

    pub fn has_listener(&self) -> bool {
        self.inner.listener().listener.is_some()
    }

    /// Sessions handed to a listener since the bridge was created.
    pub fn delivered_count(&self) -> u64 {
        self.inner.delivered.load(Ordering::Relaxed)
    }

    /// Sessions discarded for lack of a listener.
    pub fn dropped_count(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }
}

impl Default for SessionBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBridge")
            .field("has_listener", &self.has_listener())
            .field("pending", &self.inner.pending.is_occupied())
            .field("delivered", &self.delivered_count())
            .field("dropped", &self.dropped_count())
            .finish()
    }
}

/// Handle returned by [`SessionBridge::register_listener`].
///
/// Dropping the handle leaves the listener installed.
#[derive(Debug)]
pub struct ListenerHandle {
    bridge: Weak<BridgeInner>,
    generation: u64,
}

impl ListenerHandle {
    /// Remove the listener this handle installed.
    ///
    /// Returns `true` if it was removed now. Calling it again, after a newer
    /// registration, or after the bridge is gone returns `false`.
    pub fn deregister(&self) -> bool {
        let Some(inner) = self.bridge.upgrade() else {
            return false;
        };
        let mut slot = inner.listener();
        if slot.generation != self.generation || slot.listener.is_none() {
            return false;
        }
        slot.listener = None;
        debug!(generation = self.generation, "session listener deregistered");
        true
    }

    /// Returns `true` while this handle's listener is the installed one.
    pub fn is_active(&self) -> bool {
        self.bridge.upgrade().is_some_and(|inner| {
            let slot = inner.listener();
            slot.generation == self.generation && slot.listener.is_some()
        })
    }
}
