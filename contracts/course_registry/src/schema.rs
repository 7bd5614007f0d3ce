use soroban_sdk::{contracttype, Address, String, Vec};

pub const MAX_TITLE_LEN: u32 = 100;
pub const MAX_DESC_LEN: u32 = 500;
pub const MAX_SEARCH_LEN: u32 = 64;

pub const DEFAULT_LIST_LIMIT: u32 = 10;
pub const MAX_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_OFFSET: u32 = 10_000;

/// Storage keys. Config and the course id sequence live in instance
/// storage; course records and the per-instructor index are persistent.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    CourseSeq,
    EnrollmentAddr,
    Course(u64),
    InstructorCourses(Address),
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CourseLevel {
    Beginner = 0,
    Intermediate = 1,
    Advanced = 2,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CourseStatus {
    Draft = 0,
    Published = 1,
    Archived = 2,
}

/// A lesson inside a course. Lessons are soft-deleted (`active` flipped to
/// false) rather than removed, so completion records never dangle and ids
/// are never reused.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    pub duration_mins: u32,
    pub order: u32,
    pub resources: Vec<String>,
    pub active: bool,
}

/// Rating aggregate. Average = sum / count, derived by readers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rating {
    pub sum: u64,
    pub count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Course {
    pub id: u64,
    pub instructor: Address,
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub status: CourseStatus,
    pub price: i128,
    pub duration_hours: u32,
    pub lessons: Vec<Lesson>,
    pub tags: Vec<String>,
    pub prerequisites: Vec<u64>,
    pub outcomes: Vec<String>,
    pub rating: Rating,
    pub created_at: u64,
    pub published_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub price: i128,
    pub duration_hours: u32,
    pub tags: Vec<String>,
    pub prerequisites: Vec<u64>,
    pub outcomes: Vec<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewLesson {
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    pub duration_mins: u32,
    pub resources: Vec<String>,
}

/// Partial update for a course. Absent fields are left untouched; the level
/// is passed to `edit_course` separately.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EditCourseParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<i128>,
    pub duration_hours: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub prerequisites: Option<Vec<u64>>,
    pub outcomes: Option<Vec<String>>,
}

/// Level predicate for catalog listing. `Any` matches every course.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LevelFilter {
    Any = 0,
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl LevelFilter {
    pub fn matches(self, level: CourseLevel) -> bool {
        match self {
            LevelFilter::Any => true,
            LevelFilter::Beginner => level == CourseLevel::Beginner,
            LevelFilter::Intermediate => level == CourseLevel::Intermediate,
            LevelFilter::Advanced => level == CourseLevel::Advanced,
        }
    }
}

/// Catalog filter predicate. Supplied fields are combined with logical AND.
/// `search` is a case-insensitive substring match over title and
/// description.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseFilters {
    pub category: Option<String>,
    pub level: LevelFilter,
    pub search: Option<String>,
    pub min_price: Option<i128>,
    pub max_price: Option<i128>,
}
