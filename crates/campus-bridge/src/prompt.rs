use campus_types::Session;

/// Consumer-side view of the attendance prompt.
///
/// ```text
/// Idle ──notify──▶ Prompted ──acknowledge──▶ Idle
///                   │    ▲
///                   └────┘ notify (supersedes)
/// ```
///
/// There is no terminal state. An inactive (cancelled) session dismisses
/// the prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PromptState {
    #[default]
    Idle,
    Prompted(Session),
}

impl PromptState {
    /// Handle a delivered session. Returns the prompt it superseded.
    pub fn on_notify(&mut self, session: Session) -> Option<Session> {
        let next = if session.active {
            Self::Prompted(session)
        } else {
            Self::Idle
        };
        match std::mem::replace(self, next) {
            Self::Prompted(prior) => Some(prior),
            Self::Idle => None,
        }
    }

    /// Dismiss the prompt. Returns the acknowledged session, or `None` if
    /// nothing was showing.
    pub fn acknowledge(&mut self) -> Option<Session> {
        match std::mem::take(self) {
            Self::Prompted(session) => Some(session),
            Self::Idle => None,
        }
    }

    pub fn is_prompted(&self) -> bool {
        matches!(self, Self::Prompted(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Prompted(s) => Some(s),
            Self::Idle => None,
        }
    }
}
