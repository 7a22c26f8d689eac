//! Campus records held in the synced collections.
//!
//! Every record is a plain serde struct with a [`RecordId`]. The store never
//! inspects record shape; the editing surface builds a full replacement
//! record and writes the whole collection back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::key::StoreKey;

/// Identifier of a collection entry.
///
/// Fresh ids are UUID v7 strings so that new entries sort after old ones.
/// Seed data and imported records may carry any non-empty string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a new time-ordered id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an existing id.
    pub fn parse(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TypeError::EmptyId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A collection entry persisted under a fixed [`StoreKey`].
pub trait Record: Clone + Serialize + serde::de::DeserializeOwned + Send + Sync + 'static {
    /// Key of the collection this record type lives in.
    const KEY: &'static str;

    /// Stable identifier used by upsert/remove.
    fn id(&self) -> &RecordId;

    /// Short human label for listings.
    fn label(&self) -> String;

    fn store_key() -> StoreKey {
        StoreKey::well_known(Self::KEY)
    }
}

/// A building on the campus map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: RecordId,
    pub name: String,
    pub code: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: RecordId,
    pub code: String,
    pub title: String,
    pub instructor: String,
    pub credits: u8,
    #[serde(default)]
    pub schedule: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: RecordId,
    pub name: String,
    pub department: String,
    pub email: String,
    #[serde(default)]
    pub office: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub program: String,
    pub year: u8,
    pub email: String,
}

/// An entry in the lecture/video catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: RecordId,
    pub title: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub duration_minutes: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusEvent {
    pub id: RecordId,
    pub title: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: chrono::NaiveDate,
    pub location: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: RecordId,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Internship, full-time, part-time...
    pub kind: String,
    pub deadline: Option<chrono::NaiveDate>,
}

/// Brand logo shown in the shell header. `None` means the built-in mark.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandLogo {
    pub url: Option<String>,
}

macro_rules! impl_record {
    ($ty:ty, $key:expr, |$r:ident| $label:expr) => {
        impl Record for $ty {
            const KEY: &'static str = $key;

            fn id(&self) -> &RecordId {
                &self.id
            }

            fn label(&self) -> String {
                let $r = self;
                $label
            }
        }
    };
}

impl_record!(Building, StoreKey::BUILDINGS, |b| format!("{} ({})", b.name, b.code));
impl_record!(Course, StoreKey::COURSES, |c| format!("{} {}", c.code, c.title));
impl_record!(Faculty, StoreKey::FACULTY, |f| format!("{}, {}", f.name, f.department));
impl_record!(Student, StoreKey::STUDENTS, |s| format!("{}, {} y{}", s.name, s.program, s.year));
impl_record!(MediaItem, StoreKey::MEDIA, |m| m.title.clone());
impl_record!(CampusEvent, StoreKey::EVENTS, |e| format!("{} on {}", e.title, e.date));
impl_record!(Job, StoreKey::JOBS, |j| format!("{} at {}", j.title, j.company));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_ordered() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn empty_id_rejected() {
        assert_eq!(RecordId::parse("  "), Err(TypeError::EmptyId));
        assert_eq!(RecordId::parse("b-01").unwrap().as_str(), "b-01");
    }

    #[test]
    fn record_keys_match_well_known_keys() {
        assert_eq!(Building::store_key().as_str(), "unistone-buildings");
        assert_eq!(Course::KEY, StoreKey::COURSES);
        assert_eq!(Job::KEY, StoreKey::JOBS);
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = CampusEvent {
            id: "ev-1".into(),
            title: "Career Fair".into(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            location: "Main Hall".into(),
            description: String::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"2025-03-14\""));
        let parsed: CampusEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.label(), "Career Fair on 2025-03-14");
    }

    #[test]
    fn optional_fields_default_on_decode() {
        let json = r#"{"id":"c1","code":"CS101","title":"Intro","instructor":"Dr. Rao","credits":3}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.schedule, "");
        assert_eq!(course.label(), "CS101 Intro");
    }
}
