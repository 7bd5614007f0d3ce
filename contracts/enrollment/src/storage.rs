use soroban_sdk::{contracttype, Address, Env, String, Vec};

/// Storage keys. The `Enrollment(student, course)` key is what enforces the
/// at-most-one-active-enrollment-per-pair invariant: there is exactly one
/// slot per pair, checked and written inside a single invocation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Registry,
    Currency,
    Enrollment(Address, u64),
    Rating(Address, u64),
    StudentCourses(Address),
    CourseStudents(u64),
    ReceiptUsed(u64),
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum EnrollmentStatus {
    Enrolled = 0,
    InProgress = 1,
    Completed = 2,
    Dropped = 3,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LessonCompletion {
    pub lesson_id: u32,
    pub completed_at: u64,
}

/// Derived completion state of an enrollment. `percentage` is always the
/// result of recomputation against the course's active lessons; it is never
/// written independently of `completed`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Progress {
    pub completed: Vec<LessonCompletion>,
    pub percentage: u32,
}

/// A student's post-completion rating. Stored under its own
/// `Rating(student, course)` key, at most one per pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseRating {
    pub score: u32,
    pub review: String,
    pub rated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Enrollment {
    pub student: Address,
    pub course_id: u64,
    pub enrolled_at: u64,
    pub status: EnrollmentStatus,
    pub progress: Progress,
    pub completed_at: Option<u64>,
    pub certificate_issued: bool,
}

pub fn read_enrollment(env: &Env, student: &Address, course_id: u64) -> Option<Enrollment> {
    env.storage()
        .persistent()
        .get(&DataKey::Enrollment(student.clone(), course_id))
}

pub fn write_enrollment(env: &Env, enrollment: &Enrollment) {
    env.storage().persistent().set(
        &DataKey::Enrollment(enrollment.student.clone(), enrollment.course_id),
        enrollment,
    );
}

pub fn read_rating(env: &Env, student: &Address, course_id: u64) -> Option<CourseRating> {
    env.storage()
        .persistent()
        .get(&DataKey::Rating(student.clone(), course_id))
}

pub fn write_rating(env: &Env, student: &Address, course_id: u64, rating: &CourseRating) {
    env.storage()
        .persistent()
        .set(&DataKey::Rating(student.clone(), course_id), rating);
}

pub fn has_rating(env: &Env, student: &Address, course_id: u64) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Rating(student.clone(), course_id))
}

/// Course ids in enrollment order, most recent last. Re-enrolling after a
/// drop moves the id to the end.
pub fn student_courses(env: &Env, student: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::StudentCourses(student.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn write_student_courses(env: &Env, student: &Address, ids: &Vec<u64>) {
    env.storage()
        .persistent()
        .set(&DataKey::StudentCourses(student.clone()), ids);
}

pub fn course_students(env: &Env, course_id: u64) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::CourseStudents(course_id))
        .unwrap_or(Vec::new(env))
}

pub fn write_course_students(env: &Env, course_id: u64, students: &Vec<Address>) {
    env.storage()
        .persistent()
        .set(&DataKey::CourseStudents(course_id), students);
}

pub fn is_receipt_used(env: &Env, tx_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::ReceiptUsed(tx_id))
}

pub fn mark_receipt_used(env: &Env, tx_id: u64) {
    env.storage()
        .persistent()
        .set(&DataKey::ReceiptUsed(tx_id), &true);
}
