//! Default catalogs used when a collection has never been written.

use campus_types::{Building, CampusEvent, Course, Faculty, Job, MediaItem, Student};
use chrono::NaiveDate;

/// Initial contents for every collection.
#[derive(Clone, Debug, Default)]
pub struct Seed {
    pub buildings: Vec<Building>,
    pub courses: Vec<Course>,
    pub faculty: Vec<Faculty>,
    pub students: Vec<Student>,
    pub media: Vec<MediaItem>,
    pub events: Vec<CampusEvent>,
    pub jobs: Vec<Job>,
}

impl Seed {
    /// Every collection starts empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The demo catalog shipped with the shell.
    pub fn demo() -> Self {
        Self {
            buildings: demo_buildings(),
            courses: demo_courses(),
            faculty: demo_faculty(),
            students: demo_students(),
            media: demo_media(),
            events: demo_events(),
            jobs: demo_jobs(),
        }
    }
}

// (code, name, category, lat offset, lng offset) from the main gate.
const BUILDINGS: [(&str, &str, &str, f64, f64); 20] = [
    ("ADM", "Administration Block", "admin", 0.0000, 0.0000),
    ("LIB", "Central Library", "academic", 0.0012, 0.0004),
    ("CSE", "Computer Science Block", "academic", 0.0018, -0.0006),
    ("ECE", "Electronics Block", "academic", 0.0021, 0.0009),
    ("MEC", "Mechanical Workshop", "academic", 0.0030, -0.0015),
    ("CIV", "Civil Engineering Block", "academic", 0.0027, 0.0018),
    ("SCI", "Science Complex", "academic", 0.0009, 0.0021),
    ("MGT", "School of Management", "academic", -0.0006, 0.0015),
    ("AUD", "Main Auditorium", "events", 0.0004, -0.0012),
    ("CAF", "Food Court", "dining", 0.0015, -0.0018),
    ("H1", "Boys Hostel 1", "housing", 0.0039, 0.0003),
    ("H2", "Boys Hostel 2", "housing", 0.0042, 0.0011),
    ("H3", "Girls Hostel", "housing", 0.0036, -0.0009),
    ("SPT", "Sports Complex", "sports", 0.0048, -0.0021),
    ("GYM", "Gymnasium", "sports", 0.0045, -0.0027),
    ("MED", "Health Centre", "services", -0.0003, -0.0006),
    ("INC", "Innovation & Incubation Centre", "research", 0.0024, 0.0027),
    ("PLC", "Placement Cell", "services", -0.0009, 0.0006),
    ("GH", "Guest House", "housing", -0.0012, -0.0015),
    ("PRK", "Visitor Parking", "services", -0.0015, 0.0000),
];

const GATE: (f64, f64) = (12.9716, 77.5946);

fn demo_buildings() -> Vec<Building> {
    BUILDINGS
        .iter()
        .enumerate()
        .map(|(i, (code, name, category, dlat, dlng))| Building {
            id: format!("b-{:02}", i + 1).as_str().into(),
            name: (*name).into(),
            code: (*code).into(),
            category: (*category).into(),
            description: String::new(),
            latitude: GATE.0 + dlat,
            longitude: GATE.1 + dlng,
        })
        .collect()
}

fn demo_courses() -> Vec<Course> {
    [
        ("CS101", "Introduction to Programming", "Dr. Anita Rao", 4, "Mon/Wed 09:00"),
        ("CS201", "Data Structures", "Dr. Vikram Shah", 4, "Tue/Thu 11:00"),
        ("EC110", "Digital Logic", "Dr. Meera Iyer", 3, "Mon/Fri 14:00"),
        ("MG210", "Principles of Management", "Prof. Arjun Das", 3, "Wed 10:00"),
    ]
    .into_iter()
    .map(|(code, title, instructor, credits, schedule)| Course {
        id: code.to_ascii_lowercase().as_str().into(),
        code: code.into(),
        title: title.into(),
        instructor: instructor.into(),
        credits,
        schedule: schedule.into(),
    })
    .collect()
}

fn demo_faculty() -> Vec<Faculty> {
    [
        ("f-1", "Dr. Anita Rao", "Computer Science", "anita.rao@unistone.edu", "CSE-204"),
        ("f-2", "Dr. Vikram Shah", "Computer Science", "vikram.shah@unistone.edu", "CSE-210"),
        ("f-3", "Dr. Meera Iyer", "Electronics", "meera.iyer@unistone.edu", "ECE-115"),
        ("f-4", "Prof. Arjun Das", "Management", "arjun.das@unistone.edu", "MGT-002"),
    ]
    .into_iter()
    .map(|(id, name, department, email, office)| Faculty {
        id: id.into(),
        name: name.into(),
        department: department.into(),
        email: email.into(),
        office: office.into(),
    })
    .collect()
}

fn demo_students() -> Vec<Student> {
    [
        ("s-1", "Riya Kapoor", "B.Tech CSE", 2, "riya.kapoor@unistone.edu"),
        ("s-2", "Karan Mehta", "B.Tech ECE", 3, "karan.mehta@unistone.edu"),
        ("s-3", "Sara Thomas", "MBA", 1, "sara.thomas@unistone.edu"),
    ]
    .into_iter()
    .map(|(id, name, program, year, email)| Student {
        id: id.into(),
        name: name.into(),
        program: program.into(),
        year,
        email: email.into(),
    })
    .collect()
}

fn demo_media() -> Vec<MediaItem> {
    [
        ("m-1", "Campus Tour", "https://media.unistone.edu/tour.mp4", "orientation", 12),
        ("m-2", "Recursion Explained", "https://media.unistone.edu/cs101-07.mp4", "lecture", 48),
        ("m-3", "Library Resources", "https://media.unistone.edu/library.mp4", "orientation", 9),
    ]
    .into_iter()
    .map(|(id, title, url, category, duration_minutes)| MediaItem {
        id: id.into(),
        title: title.into(),
        url: url.into(),
        category: category.into(),
        duration_minutes,
    })
    .collect()
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn demo_events() -> Vec<CampusEvent> {
    [
        ("e-1", "Freshers Orientation", (2025, 8, 1), "Main Auditorium"),
        ("e-2", "Tech Fest", (2025, 10, 17), "Sports Complex"),
        ("e-3", "Career Fair", (2026, 2, 12), "Placement Cell"),
    ]
    .into_iter()
    .filter_map(|(id, title, (y, m, d), location)| {
        Some(CampusEvent {
            id: id.into(),
            title: title.into(),
            date: date(y, m, d)?,
            location: location.into(),
            description: String::new(),
        })
    })
    .collect()
}

fn demo_jobs() -> Vec<Job> {
    [
        ("j-1", "Software Engineering Intern", "Nimbus Labs", "Bengaluru", "internship", date(2025, 11, 30)),
        ("j-2", "Graduate Analyst", "Crescent Capital", "Mumbai", "full-time", date(2026, 1, 15)),
        ("j-3", "Library Assistant", "Unistone Library", "On campus", "part-time", None),
    ]
    .into_iter()
    .map(|(id, title, company, location, kind, deadline)| Job {
        id: id.into(),
        title: title.into(),
        company: company.into(),
        location: location.into(),
        kind: kind.into(),
        deadline,
    })
    .collect()
}
