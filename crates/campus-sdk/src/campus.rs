use std::sync::Arc;

use campus_bridge::{Delivery, SessionManager};
use campus_store::{FileStorage, Hydration, SharedStorage, SyncedStore, WriteOutcome};
use campus_types::{
    BrandLogo, Building, CampusEvent, Course, Faculty, Job, MediaItem, Role, StoreKey, Student,
    User,
};
use tracing::info;

use crate::collection::Collection;
use crate::config::CampusConfig;
use crate::error::{SdkError, SdkResult};
use crate::seed::Seed;

/// Persistence state of one store key, for status displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyStatus {
    pub key: StoreKey,
    pub hydration: Hydration,
    pub dirty: bool,
    /// Number of records, or `None` for single-value keys.
    pub len: Option<usize>,
}

/// High-level campus API: every synced dataset plus the attendance bridge.
pub struct Campus {
    user: SyncedStore<Option<User>>,
    logo: SyncedStore<BrandLogo>,
    buildings: Collection<Building>,
    courses: Collection<Course>,
    faculty: Collection<Faculty>,
    students: Collection<Student>,
    media: Collection<MediaItem>,
    events: Collection<CampusEvent>,
    jobs: Collection<Job>,
    sessions: SessionManager,
}

macro_rules! collection_accessors {
    ($($field:ident, $field_mut:ident: $ty:ty;)*) => {
        $(
            pub fn $field(&self) -> &Collection<$ty> {
                &self.$field
            }

            pub fn $field_mut(&mut self) -> &mut Collection<$ty> {
                &mut self.$field
            }
        )*
    };
}

impl Campus {
    /// Open every well-known key against `storage`. Keys that were never
    /// written take their value from `seed`.
    pub fn open(storage: SharedStorage, seed: Seed) -> Self {
        let campus = Self {
            user: SyncedStore::open(storage.clone(), StoreKey::well_known(StoreKey::USER), None),
            logo: SyncedStore::open(
                storage.clone(),
                StoreKey::well_known(StoreKey::LOGO),
                BrandLogo::default(),
            ),
            buildings: Collection::open(storage.clone(), seed.buildings),
            courses: Collection::open(storage.clone(), seed.courses),
            faculty: Collection::open(storage.clone(), seed.faculty),
            students: Collection::open(storage.clone(), seed.students),
            media: Collection::open(storage.clone(), seed.media),
            events: Collection::open(storage.clone(), seed.events),
            jobs: Collection::open(storage, seed.jobs),
            sessions: SessionManager::new(),
        };
        info!(
            user = campus.current_user().map(|u| u.email.as_str()),
            "campus opened"
        );
        campus
    }

    /// Open file-backed storage in the configured data directory.
    pub fn from_config(config: &CampusConfig) -> SdkResult<Self> {
        let storage = FileStorage::open(&config.data_dir)?;
        let seed = if config.seed_demo {
            Seed::demo()
        } else {
            Seed::empty()
        };
        Ok(Self::open(Arc::new(storage), seed))
    }

    collection_accessors! {
        buildings, buildings_mut: Building;
        courses, courses_mut: Course;
        faculty, faculty_mut: Faculty;
        students, students_mut: Student;
        media, media_mut: MediaItem;
        events, events_mut: CampusEvent;
        jobs, jobs_mut: Job;
    }

    // ---- Identity ----

    /// Record `email` as the logged-in identity. The identity is written
    /// once; logging in again replaces it.
    pub fn login(&mut self, email: &str, role: Role) -> SdkResult<User> {
        let email = email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(SdkError::InvalidLogin(format!("not an email address: {email:?}")));
        }
        let user = User::from_email(email, role);
        self.user.set(Some(user.clone()))?;
        info!(email, %role, "logged in");
        Ok(user)
    }

    pub fn logout(&mut self) -> SdkResult<()> {
        self.user.clear()?;
        self.sessions.detach_student();
        info!("logged out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.get().as_ref()
    }

    /// The logged-in user, who must hold `role`.
    pub fn require_role(&self, role: Role, action: &'static str) -> SdkResult<&User> {
        let user = self.current_user().ok_or(SdkError::NotLoggedIn)?;
        if user.role != role {
            return Err(SdkError::PermissionDenied {
                role: user.role,
                action,
            });
        }
        Ok(user)
    }

    /// Fails unless an admin is logged in. Editing surfaces call this
    /// before mutating collections.
    pub fn ensure_editor(&self) -> SdkResult<()> {
        self.require_role(Role::Admin, "edit campus records").map(|_| ())
    }

    // ---- Branding ----

    pub fn logo(&self) -> &BrandLogo {
        self.logo.get()
    }

    pub fn set_logo(&mut self, url: Option<String>) -> SdkResult<WriteOutcome> {
        Ok(self.logo.set(BrandLogo { url })?)
    }

    // ---- Attendance ----

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// The logged-in faculty member starts an attendance session.
    pub fn start_attendance(&self, course: Option<String>) -> SdkResult<Delivery> {
        let user = self.require_role(Role::Faculty, "take attendance")?;
        Ok(self.sessions.start_session(&user.name, course))
    }

    // ---- Status ----

    /// Persistence state of every key, in well-known key order.
    pub fn status(&self) -> Vec<KeyStatus> {
        fn single<T: serde::Serialize + serde::de::DeserializeOwned + Clone>(
            s: &SyncedStore<T>,
        ) -> KeyStatus {
            KeyStatus {
                key: s.key().clone(),
                hydration: s.hydration().clone(),
                dirty: s.is_dirty(),
                len: None,
            }
        }
        fn many<R: campus_types::Record>(c: &Collection<R>) -> KeyStatus {
            KeyStatus {
                key: c.key().clone(),
                hydration: c.hydration().clone(),
                dirty: c.is_dirty(),
                len: Some(c.len()),
            }
        }

        vec![
            single(&self.user),
            single(&self.logo),
            many(&self.buildings),
            many(&self.courses),
            many(&self.faculty),
            many(&self.students),
            many(&self.media),
            many(&self.events),
            many(&self.jobs),
        ]
    }
}

impl std::fmt::Debug for Campus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Campus")
            .field("user", &self.current_user().map(|u| &u.email))
            .field("buildings", &self.buildings.len())
            .field("courses", &self.courses.len())
            .field("events", &self.events.len())
            .field("jobs", &self.jobs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use campus_bridge::PromptState;
    use campus_store::{DurableStorage, InMemoryStorage};
    use campus_types::RecordId;

    use super::*;

    fn demo() -> (Arc<InMemoryStorage>, Campus) {
        let storage = Arc::new(InMemoryStorage::new());
        let campus = Campus::open(storage.clone(), Seed::demo());
        (storage, campus)
    }

    // -----------------------------------------------------------------------
    // Rehydration
    // -----------------------------------------------------------------------

    #[test]
    fn buildings_default_then_survive_reload() {
        let (storage, mut campus) = demo();
        assert_eq!(campus.buildings().len(), 20);
        assert_eq!(campus.buildings().hydration(), &Hydration::Absent);
        assert!(storage.is_empty(), "opening must not write defaults");

        campus
            .buildings_mut()
            .remove(&RecordId::from("b-20"))
            .unwrap();
        let key = StoreKey::well_known(StoreKey::BUILDINGS);
        assert!(storage.get(&key).unwrap().is_some());

        let reloaded = Campus::open(storage, Seed::demo());
        assert_eq!(reloaded.buildings().len(), 19);
        assert_eq!(reloaded.buildings().hydration(), &Hydration::Restored);
    }

    #[test]
    fn corrupt_collection_falls_back_to_seed() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_raw(&StoreKey::well_known(StoreKey::JOBS), "[{\"id\":");
        let campus = Campus::open(storage, Seed::demo());
        assert_eq!(campus.jobs().len(), Seed::demo().jobs.len());
        assert!(matches!(campus.jobs().hydration(), Hydration::Corrupt { .. }));
        // Other keys are unaffected.
        assert_eq!(campus.courses().hydration(), &Hydration::Absent);
    }

    #[test]
    fn repaired_collection_reports_stored() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_raw(&StoreKey::well_known(StoreKey::JOBS), "not json");
        let mut campus = Campus::open(storage, Seed::demo());
        let seed_jobs = Seed::demo().jobs;
        campus.jobs_mut().replace_all(seed_jobs).unwrap();

        let jobs = &campus.status()[8];
        assert_eq!(jobs.hydration, Hydration::Restored);
        assert!(!jobs.dirty);
    }

    #[test]
    fn status_covers_every_key() {
        let (_, campus) = demo();
        let status = campus.status();
        let keys: Vec<&str> = status.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, StoreKey::ALL);
        assert_eq!(status[0].len, None);
        assert_eq!(status[2].len, Some(20));
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    #[test]
    fn login_persists_identity() {
        let (storage, mut campus) = demo();
        let user = campus.login("anita.rao@unistone.edu", Role::Faculty).unwrap();
        assert_eq!(user.name, "Anita Rao");

        let reloaded = Campus::open(storage, Seed::demo());
        assert_eq!(reloaded.current_user(), Some(&user));
    }

    #[test]
    fn logout_clears_identity() {
        let (storage, mut campus) = demo();
        campus.login("riya@unistone.edu", Role::Student).unwrap();
        campus.logout().unwrap();
        assert!(campus.current_user().is_none());
        assert!(!storage
            .contains(&StoreKey::well_known(StoreKey::USER))
            .unwrap());
    }

    #[test]
    fn login_rejects_non_email() {
        let (_, mut campus) = demo();
        for bad in ["", "riya", "@unistone.edu", "riya@localhost"] {
            assert!(matches!(
                campus.login(bad, Role::Student),
                Err(SdkError::InvalidLogin(_))
            ));
        }
    }

    #[test]
    fn editing_requires_admin() {
        let (_, mut campus) = demo();
        assert!(matches!(campus.ensure_editor(), Err(SdkError::NotLoggedIn)));
        campus.login("karan@unistone.edu", Role::Student).unwrap();
        assert!(matches!(
            campus.ensure_editor(),
            Err(SdkError::PermissionDenied { role: Role::Student, .. })
        ));
        campus.login("admin@unistone.edu", Role::Admin).unwrap();
        campus.ensure_editor().unwrap();
    }

    // -----------------------------------------------------------------------
    // Branding
    // -----------------------------------------------------------------------

    #[test]
    fn logo_roundtrip() {
        let (storage, mut campus) = demo();
        assert!(campus.logo().url.is_none());
        campus.set_logo(Some("https://cdn.unistone.edu/logo.svg".into())).unwrap();
        let reloaded = Campus::open(storage, Seed::empty());
        assert_eq!(
            reloaded.logo().url.as_deref(),
            Some("https://cdn.unistone.edu/logo.svg")
        );
    }

    // -----------------------------------------------------------------------
    // Attendance
    // -----------------------------------------------------------------------

    #[test]
    fn faculty_session_reaches_student_view() {
        let (_, mut campus) = demo();
        campus.sessions_mut().attach_student();
        campus.login("anita.rao@unistone.edu", Role::Faculty).unwrap();

        let delivery = campus.start_attendance(Some("CS101".into())).unwrap();
        assert_eq!(delivery, Delivery::Delivered);
        match campus.sessions().prompt() {
            PromptState::Prompted(s) => assert_eq!(s.instructor, "Anita Rao"),
            other => panic!("expected prompt, got {other:?}"),
        }
        assert!(campus.sessions().acknowledge().is_some());
    }

    #[test]
    fn students_cannot_start_sessions() {
        let (_, mut campus) = demo();
        campus.login("riya@unistone.edu", Role::Student).unwrap();
        assert!(matches!(
            campus.start_attendance(None),
            Err(SdkError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn from_config_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = CampusConfig {
            data_dir: dir.path().join("data"),
            seed_demo: false,
            ..Default::default()
        };
        let mut campus = Campus::from_config(&config).unwrap();
        assert!(campus.buildings().is_empty());
        campus.login("admin@unistone.edu", Role::Admin).unwrap();
        assert!(dir.path().join("data").join("unistone-user.json").is_file());
    }
}
