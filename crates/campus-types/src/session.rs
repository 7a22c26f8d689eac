use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An in-progress attendance session, broadcast from an instructor view to
/// the student view. Lives only in memory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub active: bool,
    pub instructor: String,
    pub course: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// A new active session stamped with the current time.
    pub fn start(instructor: impl Into<String>, course: Option<String>) -> Self {
        Self {
            active: true,
            instructor: instructor.into(),
            course,
            started_at: Utc::now(),
        }
    }

    /// The same session marked inactive (instructor cancelled it).
    pub fn cancelled(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_active() {
        let s = Session::start("Dr. Rao", Some("CS101".into()));
        assert!(s.active);
        assert_eq!(s.instructor, "Dr. Rao");
        assert!(!s.clone().cancelled().active);
    }
}
