use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier under which one logical value is persisted.
///
/// Keys are plain strings. Uniqueness is the caller's responsibility; two
/// bindings opened with the same key share the same durable slot.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);

impl StoreKey {
    /// Current authenticated identity.
    pub const USER: &'static str = "unistone-user";
    /// Brand logo shown in the shell header.
    pub const LOGO: &'static str = "unistone-logo";
    pub const BUILDINGS: &'static str = "unistone-buildings";
    pub const COURSES: &'static str = "unistone-courses";
    pub const FACULTY: &'static str = "unistone-faculty";
    pub const STUDENTS: &'static str = "unistone-students";
    pub const MEDIA: &'static str = "unistone-media";
    pub const EVENTS: &'static str = "unistone-events";
    pub const JOBS: &'static str = "unistone-jobs";

    /// Every well-known key, in the order the shell opens them.
    pub const ALL: [&'static str; 9] = [
        Self::USER,
        Self::LOGO,
        Self::BUILDINGS,
        Self::COURSES,
        Self::FACULTY,
        Self::STUDENTS,
        Self::MEDIA,
        Self::EVENTS,
        Self::JOBS,
    ];

    /// Create a key, rejecting empty strings and path separators.
    ///
    /// Path separators are rejected so that file-backed storage can map a
    /// key to a single file name.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        if key.is_empty()
            || key.contains(['/', '\\'])
            || key == "."
            || key == ".."
            || key.chars().any(char::is_control)
        {
            return Err(TypeError::InvalidKey(key));
        }
        Ok(Self(key))
    }

    /// Create one of the well-known keys. Callers pass the associated
    /// constants, which are always valid.
    pub fn well_known(key: &'static str) -> Self {
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreKey({})", self.0)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for StoreKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
