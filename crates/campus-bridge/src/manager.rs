use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use campus_types::Session;
use tracing::info;

use crate::bridge::{Delivery, ListenerHandle, SessionBridge};
use crate::prompt::PromptState;

/// Owns the attendance bridge and the student-facing prompt.
///
/// The instructor side calls [`start_session`](Self::start_session) and
/// [`cancel_session`](Self::cancel_session); the student side calls
/// [`attach_student`](Self::attach_student) when its view opens, reads
/// [`prompt`](Self::prompt), and calls [`acknowledge`](Self::acknowledge).
#[derive(Debug, Default)]
pub struct SessionManager {
    bridge: SessionBridge,
    prompt: Arc<Mutex<PromptState>>,
    student: Option<ListenerHandle>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying channel, for callers that register their own listener.
    pub fn bridge(&self) -> &SessionBridge {
        &self.bridge
    }

    /// Start observing sessions on behalf of the student view. Replaces any
    /// other listener on the bridge.
    pub fn attach_student(&mut self) {
        let prompt = Arc::clone(&self.prompt);
        let handle = self.bridge.register_listener(move |session| {
            lock(&prompt).on_notify(session.clone());
        });
        self.student = Some(handle);
    }

    /// Stop observing (the student view closed). The prompt is reset and
    /// any pending session is discarded, so a later attach starts clean.
    pub fn detach_student(&mut self) {
        if let Some(handle) = self.student.take() {
            handle.deregister();
        }
        self.bridge.clear();
        *lock(&self.prompt) = PromptState::Idle;
    }

    /// Returns `true` while the student view owns the bridge's listener.
    pub fn is_student_attached(&self) -> bool {
        self.student.as_ref().is_some_and(ListenerHandle::is_active)
    }

    /// Instructor starts taking attendance.
    pub fn start_session(&self, instructor: &str, course: Option<String>) -> Delivery {
        let session = Session::start(instructor, course);
        let delivery = self.bridge.notify(session);
        info!(instructor, ?delivery, "attendance session started");
        delivery
    }

    /// Instructor cancels the live session. The student prompt is dismissed
    /// if it is showing.
    pub fn cancel_session(&self) -> Delivery {
        let Some(session) = self.bridge.current() else {
            return Delivery::Dropped;
        };
        let delivery = self.bridge.notify(session.cancelled());
        self.bridge.clear();
        info!(?delivery, "attendance session cancelled");
        delivery
    }

    /// Student acknowledges the prompt. Returns the acknowledged session.
    pub fn acknowledge(&self) -> Option<Session> {
        self.bridge.acknowledge();
        lock(&self.prompt).acknowledge()
    }

    /// What the student view currently shows.
    pub fn prompt(&self) -> PromptState {
        lock(&self.prompt).clone()
    }
}

fn lock(prompt: &Mutex<PromptState>) -> MutexGuard<'_, PromptState> {
    prompt.lock().unwrap_or_else(PoisonError::into_inner)
}
