#![no_std]

pub mod events;
pub mod schema;


use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

pub use schema::{
    Course, CourseFilters, CourseLevel, CourseStatus, DataKey, EditCourseParams, Lesson,
    LevelFilter, NewCourse, NewLesson, Rating,
};
use schema::{
    DEFAULT_LIST_LIMIT, MAX_DESC_LEN, MAX_LIST_LIMIT, MAX_LIST_OFFSET, MAX_SEARCH_LEN,
    MAX_TITLE_LEN,
};

// Description is the longest field the free-text search scans.
const SEARCH_BUF: usize = MAX_DESC_LEN as usize;

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    CourseNotFound = 3,
    LessonNotFound = 4,
    Unauthorized = 5,
    InvalidTitle = 6,
    InvalidDescription = 7,
    InvalidPrice = 8,
    InvalidStatusTransition = 9,
    CourseArchived = 10,
    RatingOutOfRange = 11,
    InvalidLimit = 12,
    InvalidOffset = 13,
    InvalidSearch = 14,
}

/// Course Registry
///
/// Catalog of courses and their lessons. Instructors create and manage
/// courses here; the enrollment contract reads published courses and writes
/// back rating aggregates.
#[contract]
pub struct CourseRegistry;

impl CourseRegistry {
    fn read_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn read_course(env: &Env, course_id: u64) -> Result<Course, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Course(course_id))
            .ok_or(Error::CourseNotFound)
    }

    fn write_course(env: &Env, course: &Course) {
        env.storage()
            .persistent()
            .set(&DataKey::Course(course.id), course);
    }

    /// Highest course id allocated so far.
    fn course_seq(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::CourseSeq)
            .unwrap_or(0u64)
    }

    fn next_course_id(env: &Env) -> u64 {
        let id = Self::course_seq(env) + 1;
        env.storage().instance().set(&DataKey::CourseSeq, &id);
        id
    }

    /// Load a course and check the caller owns it. The caller's address has
    /// already been `require_auth`ed by the entry point.
    fn read_owned_course(env: &Env, instructor: &Address, course_id: u64) -> Result<Course, Error> {
        let course = Self::read_course(env, course_id)?;
        if course.instructor != *instructor {
            return Err(Error::Unauthorized);
        }
        Ok(course)
    }

    fn validate_text(text: &String, max_len: u32, err: Error) -> Result<(), Error> {
        if text.is_empty() || text.len() > max_len {
            return Err(err);
        }
        Ok(())
    }

    /// Case-insensitive substring match, ASCII folding only. The needle is
    /// already lowercased by the caller.
    fn contains_ci(text: &String, needle: &[u8]) -> bool {
        if needle.is_empty() {
            return true;
        }
        let len = text.len() as usize;
        if len > SEARCH_BUF || needle.len() > len {
            return false;
        }
        let mut buf = [0u8; SEARCH_BUF];
        text.copy_into_slice(&mut buf[..len]);
        let hay = &buf[..len];
        'outer: for start in 0..=(len - needle.len()) {
            for (i, nb) in needle.iter().enumerate() {
                if hay[start + i].to_ascii_lowercase() != *nb {
                    continue 'outer;
                }
            }
            return true;
        }
        false
    }

    fn passes_filters(course: &Course, filters: &CourseFilters, needle: Option<&[u8]>) -> bool {
        if let Some(category) = &filters.category {
            if course.category != *category {
                return false;
            }
        }
        if !filters.level.matches(course.level) {
            return false;
        }
        if let Some(min) = filters.min_price {
            if course.price < min {
                return false;
            }
        }
        if let Some(max) = filters.max_price {
            if course.price > max {
                return false;
            }
        }
        if let Some(needle) = needle {
            if !Self::contains_ci(&course.title, needle)
                && !Self::contains_ci(&course.description, needle)
            {
                return false;
            }
        }
        true
    }
}

#[contractimpl]
impl CourseRegistry {
    /// Initialize the registry with an admin address.
    pub fn init(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        Ok(())
    }

    /// Name the enrollment contract allowed to record ratings (admin-only).
    pub fn set_enrollment_contract(env: Env, addr: Address) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();
        env.storage().instance().set(&DataKey::EnrollmentAddr, &addr);
        Ok(())
    }

    /// Create a course in `Draft` status.
    pub fn create_course(env: Env, instructor: Address, params: NewCourse) -> Result<Course, Error> {
        instructor.require_auth();

        Self::validate_text(&params.title, MAX_TITLE_LEN, Error::InvalidTitle)?;
        Self::validate_text(&params.description, MAX_DESC_LEN, Error::InvalidDescription)?;
        if params.price < 0 {
            return Err(Error::InvalidPrice);
        }

        let id = Self::next_course_id(&env);
        let course = Course {
            id,
            instructor: instructor.clone(),
            title: params.title,
            description: params.description,
            category: params.category,
            level: params.level,
            status: CourseStatus::Draft,
            price: params.price,
            duration_hours: params.duration_hours,
            lessons: Vec::new(&env),
            tags: params.tags,
            prerequisites: params.prerequisites,
            outcomes: params.outcomes,
            rating: Rating { sum: 0, count: 0 },
            created_at: env.ledger().timestamp(),
            published_at: None,
        };
        Self::write_course(&env, &course);

        let key = DataKey::InstructorCourses(instructor.clone());
        let mut ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or(Vec::new(&env));
        ids.push_back(id);
        env.storage().persistent().set(&key, &ids);

        events::emit_course_created(&env, id, &instructor);
        Ok(course)
    }

    /// Apply a partial update to a course (instructor only, not archived).
    /// `level` is `None` to leave the current level in place.
    pub fn edit_course(
        env: Env,
        instructor: Address,
        course_id: u64,
        params: EditCourseParams,
        level: Option<CourseLevel>,
    ) -> Result<Course, Error> {
        instructor.require_auth();
        let mut course = Self::read_owned_course(&env, &instructor, course_id)?;
        if course.status == CourseStatus::Archived {
            return Err(Error::CourseArchived);
        }

        if let Some(title) = params.title {
            Self::validate_text(&title, MAX_TITLE_LEN, Error::InvalidTitle)?;
            course.title = title;
        }
        if let Some(description) = params.description {
            Self::validate_text(&description, MAX_DESC_LEN, Error::InvalidDescription)?;
            course.description = description;
        }
        if let Some(category) = params.category {
            course.category = category;
        }
        if let Some(level) = level {
            course.level = level;
        }
        if let Some(price) = params.price {
            if price < 0 {
                return Err(Error::InvalidPrice);
            }
            course.price = price;
        }
        if let Some(duration_hours) = params.duration_hours {
            course.duration_hours = duration_hours;
        }
        if let Some(tags) = params.tags {
            course.tags = tags;
        }
        if let Some(prerequisites) = params.prerequisites {
            course.prerequisites = prerequisites;
        }
        if let Some(outcomes) = params.outcomes {
            course.outcomes = outcomes;
        }

        Self::write_course(&env, &course);
        events::emit_course_edited(&env, course_id);
        Ok(course)
    }

    /// Append a lesson. Lesson ids are a per-course sequence and are never
    /// reused (removal is a soft delete).
    pub fn add_lesson(
        env: Env,
        instructor: Address,
        course_id: u64,
        params: NewLesson,
    ) -> Result<Lesson, Error> {
        instructor.require_auth();
        let mut course = Self::read_owned_course(&env, &instructor, course_id)?;
        if course.status == CourseStatus::Archived {
            return Err(Error::CourseArchived);
        }
        Self::validate_text(&params.title, MAX_TITLE_LEN, Error::InvalidTitle)?;

        let id = course.lessons.len() + 1;
        let lesson = Lesson {
            id,
            title: params.title,
            content: params.content,
            video_url: params.video_url,
            duration_mins: params.duration_mins,
            order: id,
            resources: params.resources,
            active: true,
        };
        course.lessons.push_back(lesson.clone());
        Self::write_course(&env, &course);

        events::emit_lesson_added(&env, course_id, id);
        Ok(lesson)
    }

    /// Soft-delete a lesson: the record and its id survive so existing
    /// completion references stay valid, but the lesson stops counting
    /// toward progress and new completions are rejected.
    pub fn remove_lesson(
        env: Env,
        instructor: Address,
        course_id: u64,
        lesson_id: u32,
    ) -> Result<(), Error> {
        instructor.require_auth();
        let mut course = Self::read_owned_course(&env, &instructor, course_id)?;

        let mut index = None;
        for (i, lesson) in course.lessons.iter().enumerate() {
            if lesson.id == lesson_id && lesson.active {
                index = Some(i as u32);
                break;
            }
        }
        let i = index.ok_or(Error::LessonNotFound)?;
        let mut lesson = course.lessons.get(i).ok_or(Error::LessonNotFound)?;
        lesson.active = false;
        course.lessons.set(i, lesson);
        Self::write_course(&env, &course);

        events::emit_lesson_removed(&env, course_id, lesson_id);
        Ok(())
    }

    /// Transition `Draft -> Published` and stamp the publication time.
    pub fn publish_course(env: Env, instructor: Address, course_id: u64) -> Result<Course, Error> {
        instructor.require_auth();
        let mut course = Self::read_owned_course(&env, &instructor, course_id)?;
        if course.status != CourseStatus::Draft {
            return Err(Error::InvalidStatusTransition);
        }
        course.status = CourseStatus::Published;
        course.published_at = Some(env.ledger().timestamp());
        Self::write_course(&env, &course);
        events::emit_status_changed(&env, course_id, CourseStatus::Published);
        Ok(course)
    }

    /// Transition `Published -> Draft`, the only reverse edge in the
    /// lifecycle.
    pub fn unpublish_course(env: Env, instructor: Address, course_id: u64) -> Result<Course, Error> {
        instructor.require_auth();
        let mut course = Self::read_owned_course(&env, &instructor, course_id)?;
        if course.status != CourseStatus::Published {
            return Err(Error::InvalidStatusTransition);
        }
        course.status = CourseStatus::Draft;
        course.published_at = None;
        Self::write_course(&env, &course);
        events::emit_status_changed(&env, course_id, CourseStatus::Draft);
        Ok(course)
    }

    /// Archive a course. Terminal: archived courses cannot be edited or
    /// re-published.
    pub fn archive_course(env: Env, instructor: Address, course_id: u64) -> Result<Course, Error> {
        instructor.require_auth();
        let mut course = Self::read_owned_course(&env, &instructor, course_id)?;
        if course.status == CourseStatus::Archived {
            return Err(Error::InvalidStatusTransition);
        }
        course.status = CourseStatus::Archived;
        Self::write_course(&env, &course);
        events::emit_status_changed(&env, course_id, CourseStatus::Archived);
        Ok(course)
    }

    /// Fetch one course by id.
    pub fn get_course(env: Env, course_id: u64) -> Result<Course, Error> {
        Self::read_course(&env, course_id)
    }

    /// List published courses matching the filter predicate, with bounded
    /// pagination.
    pub fn list_courses(
        env: Env,
        filters: CourseFilters,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Course>, Error> {
        if let Some(l) = limit {
            if l == 0 || l > MAX_LIST_LIMIT {
                return Err(Error::InvalidLimit);
            }
        }
        if let Some(o) = offset {
            if o > MAX_LIST_OFFSET {
                return Err(Error::InvalidOffset);
            }
        }
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let offset = offset.unwrap_or(0);

        // Lowercase the search needle once, up front.
        let mut needle_buf = [0u8; MAX_SEARCH_LEN as usize];
        let needle: Option<&[u8]> = match &filters.search {
            None => None,
            Some(search) => {
                let len = search.len() as usize;
                if len == 0 || len > needle_buf.len() {
                    return Err(Error::InvalidSearch);
                }
                search.copy_into_slice(&mut needle_buf[..len]);
                needle_buf[..len].make_ascii_lowercase();
                Some(&needle_buf[..len])
            }
        };

        let mut results = Vec::new(&env);
        let last_id = Self::course_seq(&env);
        let mut matched: u32 = 0;
        let mut id: u64 = 1;
        while id <= last_id {
            if let Some(course) = env
                .storage()
                .persistent()
                .get::<_, Course>(&DataKey::Course(id))
            {
                if course.status == CourseStatus::Published
                    && Self::passes_filters(&course, &filters, needle)
                {
                    if matched >= offset {
                        if results.len() < limit {
                            results.push_back(course);
                        } else {
                            break;
                        }
                    }
                    matched += 1;
                }
            }
            id += 1;
        }
        Ok(results)
    }

    /// All courses created by an instructor, drafts included.
    pub fn get_courses_by_instructor(env: Env, instructor: Address) -> Vec<Course> {
        let ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::InstructorCourses(instructor))
            .unwrap_or(Vec::new(&env));

        let mut courses = Vec::new(&env);
        for id in ids.iter() {
            if let Ok(course) = Self::read_course(&env, id) {
                courses.push_back(course);
            }
        }
        courses
    }

    /// Fold a post-completion rating into the course aggregate. Callable
    /// only by the configured enrollment contract; its address auth is
    /// satisfied automatically on a direct cross-contract invocation.
    pub fn record_rating(env: Env, course_id: u64, score: u32) -> Result<(), Error> {
        let enrollment: Address = env
            .storage()
            .instance()
            .get(&DataKey::EnrollmentAddr)
            .ok_or(Error::NotInitialized)?;
        enrollment.require_auth();

        if !(1..=5).contains(&score) {
            return Err(Error::RatingOutOfRange);
        }

        let mut course = Self::read_course(&env, course_id)?;
        course.rating.sum += score as u64;
        course.rating.count += 1;
        Self::write_course(&env, &course);

        events::emit_course_rated(&env, course_id, score);
        Ok(())
    }
}
