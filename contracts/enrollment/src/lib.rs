#![no_std]

pub mod events;
pub mod storage;

mod test;

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

use course_registry::{Course, CourseRegistryClient, CourseStatus};
use payment::PaymentReceipt;

pub use storage::{
    CourseRating, DataKey, Enrollment, EnrollmentStatus, LessonCompletion, Progress,
};

/// Receipts older than this are no longer accepted by `enroll`.
pub const RECEIPT_MAX_AGE_SECS: u64 = 3_600;

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    CourseNotFound = 3,
    CourseNotAvailable = 4,
    AlreadyEnrolled = 5,
    PaymentRequired = 6,
    ReceiptAlreadyUsed = 7,
    EnrollmentNotFound = 8,
    EnrollmentDropped = 9,
    CannotDropCompleted = 10,
    LessonNotInCourse = 11,
    NotCompleted = 12,
    AlreadyRated = 13,
    RatingOutOfRange = 14,
    CertificateAlreadyIssued = 15,
}

/// Enrollment Contract
///
/// Gatekeeper for the student-course relationship: creates enrollments
/// (free or against a payment receipt), tracks per-lesson progress, derives
/// completion percentage and status, and forwards post-completion ratings
/// to the course registry.
#[contract]
pub struct EnrollmentContract;

impl EnrollmentContract {
    fn read_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn read_registry(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)
    }

    fn read_currency(env: &Env) -> Result<String, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Currency)
            .ok_or(Error::NotInitialized)
    }

    fn fetch_course(env: &Env, course_id: u64) -> Result<Course, Error> {
        let registry = Self::read_registry(env)?;
        let client = CourseRegistryClient::new(env, &registry);
        match client.try_get_course(&course_id) {
            Ok(Ok(course)) => Ok(course),
            _ => Err(Error::CourseNotFound),
        }
    }

    fn lesson_is_active(course: &Course, lesson_id: u32) -> bool {
        for lesson in course.lessons.iter() {
            if lesson.id == lesson_id {
                return lesson.active;
            }
        }
        false
    }

    /// Percentage = completions of still-active lessons x 100 / active
    /// lesson total; 0 when the course has no active lessons. Completions
    /// referencing soft-deleted lessons stay recorded but count for
    /// nothing.
    fn compute_percentage(course: &Course, completed: &Vec<LessonCompletion>) -> u32 {
        let mut total: u32 = 0;
        for lesson in course.lessons.iter() {
            if lesson.active {
                total += 1;
            }
        }
        if total == 0 {
            return 0;
        }
        let mut done: u32 = 0;
        for completion in completed.iter() {
            if Self::lesson_is_active(course, completion.lesson_id) {
                done += 1;
            }
        }
        done * 100 / total
    }

    /// Check the receipt against the course price, the platform currency,
    /// and the staleness window. Absence, mismatch, or staleness all fail
    /// the same way: the caller owes a (new) payment.
    fn check_receipt(
        env: &Env,
        course: &Course,
        receipt: &Option<PaymentReceipt>,
    ) -> Result<Option<u64>, Error> {
        if course.price <= 0 {
            // Free course: any supplied receipt is ignored, not consumed.
            return Ok(None);
        }
        let receipt = receipt.as_ref().ok_or(Error::PaymentRequired)?;
        if receipt.amount != course.price {
            return Err(Error::PaymentRequired);
        }
        if receipt.currency != Self::read_currency(env)? {
            return Err(Error::PaymentRequired);
        }
        let now = env.ledger().timestamp();
        if receipt.paid_at + RECEIPT_MAX_AGE_SECS < now {
            return Err(Error::PaymentRequired);
        }
        if storage::is_receipt_used(env, receipt.tx_id) {
            return Err(Error::ReceiptAlreadyUsed);
        }
        Ok(Some(receipt.tx_id))
    }
}

#[contractimpl]
impl EnrollmentContract {
    /// Initialize with a platform admin, the course registry address, and
    /// the settlement currency receipts must be denominated in.
    pub fn init(env: Env, admin: Address, registry: Address, currency: String) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Registry, &registry);
        env.storage().instance().set(&DataKey::Currency, &currency);
        Ok(())
    }

    /// Enroll a student in a published course. Priced courses require a
    /// fresh, unconsumed receipt over the exact price. A dropped enrollment
    /// for the same pair is replaced with a fresh record.
    pub fn enroll(
        env: Env,
        student: Address,
        course_id: u64,
        receipt: Option<PaymentReceipt>,
    ) -> Result<Enrollment, Error> {
        student.require_auth();

        let course = Self::fetch_course(&env, course_id)?;
        if course.status != CourseStatus::Published {
            return Err(Error::CourseNotAvailable);
        }

        if let Some(existing) = storage::read_enrollment(&env, &student, course_id) {
            if existing.status != EnrollmentStatus::Dropped {
                return Err(Error::AlreadyEnrolled);
            }
        }

        let tx_id = Self::check_receipt(&env, &course, &receipt)?;
        if let Some(tx_id) = tx_id {
            storage::mark_receipt_used(&env, tx_id);
        }

        let enrollment = Enrollment {
            student: student.clone(),
            course_id,
            enrolled_at: env.ledger().timestamp(),
            status: EnrollmentStatus::Enrolled,
            progress: Progress {
                completed: Vec::new(&env),
                percentage: 0,
            },
            completed_at: None,
            certificate_issued: false,
        };
        storage::write_enrollment(&env, &enrollment);

        let mut course_ids = storage::student_courses(&env, &student);
        if let Some(i) = course_ids.first_index_of(course_id) {
            course_ids.remove(i);
        }
        course_ids.push_back(course_id);
        storage::write_student_courses(&env, &student, &course_ids);

        let mut students = storage::course_students(&env, course_id);
        if !students.contains(&student) {
            students.push_back(student.clone());
        }
        storage::write_course_students(&env, course_id, &students);

        events::emit_enrolled(&env, &student, course_id, tx_id);
        Ok(enrollment)
    }

    /// Terminal side-transition out of any non-completed state.
    pub fn drop_enrollment(env: Env, student: Address, course_id: u64) -> Result<(), Error> {
        student.require_auth();

        let mut enrollment = storage::read_enrollment(&env, &student, course_id)
            .ok_or(Error::EnrollmentNotFound)?;
        match enrollment.status {
            EnrollmentStatus::Dropped => return Err(Error::EnrollmentDropped),
            EnrollmentStatus::Completed => return Err(Error::CannotDropCompleted),
            _ => {}
        }

        enrollment.status = EnrollmentStatus::Dropped;
        storage::write_enrollment(&env, &enrollment);

        events::emit_dropped(&env, &student, course_id);
        Ok(())
    }

    /// Record a lesson completion and recompute progress. Re-completing a
    /// lesson adds nothing to the completion set, but the percentage and
    /// status are still recomputed: the course's active-lesson set may have
    /// shrunk since the last call. Completed enrollments are terminal.
    /// Progress update and status transition land in one storage write.
    pub fn mark_lesson_completed(
        env: Env,
        student: Address,
        course_id: u64,
        lesson_id: u32,
    ) -> Result<Progress, Error> {
        student.require_auth();

        let mut enrollment = storage::read_enrollment(&env, &student, course_id)
            .ok_or(Error::EnrollmentNotFound)?;
        if enrollment.status == EnrollmentStatus::Dropped {
            return Err(Error::EnrollmentDropped);
        }
        if enrollment.status == EnrollmentStatus::Completed {
            return Ok(enrollment.progress);
        }

        let course = Self::fetch_course(&env, course_id)?;
        let now = env.ledger().timestamp();

        let mut already_done = false;
        for completion in enrollment.progress.completed.iter() {
            if completion.lesson_id == lesson_id {
                already_done = true;
                break;
            }
        }
        if !already_done {
            if !Self::lesson_is_active(&course, lesson_id) {
                return Err(Error::LessonNotInCourse);
            }
            enrollment.progress.completed.push_back(LessonCompletion {
                lesson_id,
                completed_at: now,
            });
            if enrollment.status == EnrollmentStatus::Enrolled {
                enrollment.status = EnrollmentStatus::InProgress;
            }
        }

        enrollment.progress.percentage =
            Self::compute_percentage(&course, &enrollment.progress.completed);
        let mut completed_now = false;
        if enrollment.progress.percentage == 100 {
            enrollment.status = EnrollmentStatus::Completed;
            enrollment.completed_at = Some(now);
            completed_now = true;
        }

        storage::write_enrollment(&env, &enrollment);

        if !already_done {
            events::emit_lesson_completed(
                &env,
                &student,
                course_id,
                lesson_id,
                enrollment.progress.percentage,
            );
        }
        if completed_now {
            events::emit_course_completed(&env, &student, course_id);
        }
        Ok(enrollment.progress)
    }

    /// Current progress of an enrollment.
    pub fn get_progress(env: Env, student: Address, course_id: u64) -> Result<Progress, Error> {
        storage::read_enrollment(&env, &student, course_id)
            .map(|e| e.progress)
            .ok_or(Error::EnrollmentNotFound)
    }

    /// Completion percentage in [0, 100].
    pub fn progress_percentage(env: Env, student: Address, course_id: u64) -> Result<u32, Error> {
        storage::read_enrollment(&env, &student, course_id)
            .map(|e| e.progress.percentage)
            .ok_or(Error::EnrollmentNotFound)
    }

    /// Access-check read: `None` rather than an error when absent.
    pub fn find_enrollment(env: Env, student: Address, course_id: u64) -> Option<Enrollment> {
        storage::read_enrollment(&env, &student, course_id)
    }

    /// All enrollments of a student, dropped included, most recent first.
    pub fn list_for_student(env: Env, student: Address) -> Vec<Enrollment> {
        let ids = storage::student_courses(&env, &student);
        let mut out = Vec::new(&env);
        let mut i = ids.len();
        while i > 0 {
            i -= 1;
            if let Some(course_id) = ids.get(i) {
                if let Some(enrollment) = storage::read_enrollment(&env, &student, course_id) {
                    out.push_back(enrollment);
                }
            }
        }
        out
    }

    /// Live count of non-dropped enrollments for a course. Derived from the
    /// records themselves; there is no stored counter to drift.
    pub fn course_enrollment_count(env: Env, course_id: u64) -> u32 {
        let students = storage::course_students(&env, course_id);
        let mut count: u32 = 0;
        for student in students.iter() {
            if let Some(enrollment) = storage::read_enrollment(&env, &student, course_id) {
                if enrollment.status != EnrollmentStatus::Dropped {
                    count += 1;
                }
            }
        }
        count
    }

    /// Rate a completed course, once. The full rating is stored per
    /// (student, course); only the score is forwarded to the course
    /// registry's rating aggregate.
    pub fn rate_course(
        env: Env,
        student: Address,
        course_id: u64,
        score: u32,
        review: String,
    ) -> Result<(), Error> {
        student.require_auth();

        if !(1..=5).contains(&score) {
            return Err(Error::RatingOutOfRange);
        }

        let enrollment = storage::read_enrollment(&env, &student, course_id)
            .ok_or(Error::EnrollmentNotFound)?;
        if enrollment.status != EnrollmentStatus::Completed {
            return Err(Error::NotCompleted);
        }
        if storage::has_rating(&env, &student, course_id) {
            return Err(Error::AlreadyRated);
        }

        let rating = CourseRating {
            score,
            review,
            rated_at: env.ledger().timestamp(),
        };
        storage::write_rating(&env, &student, course_id, &rating);

        let registry = Self::read_registry(&env)?;
        CourseRegistryClient::new(&env, &registry).record_rating(&course_id, &score);

        events::emit_rated(&env, &student, course_id, score);
        Ok(())
    }

    /// The student's rating of a course, if they have left one.
    pub fn get_rating(env: Env, student: Address, course_id: u64) -> Option<CourseRating> {
        storage::read_rating(&env, &student, course_id)
    }

    /// Mark the certificate as issued for a completed enrollment
    /// (platform-admin operation).
    pub fn issue_certificate(env: Env, student: Address, course_id: u64) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        let mut enrollment = storage::read_enrollment(&env, &student, course_id)
            .ok_or(Error::EnrollmentNotFound)?;
        if enrollment.status != EnrollmentStatus::Completed {
            return Err(Error::NotCompleted);
        }
        if enrollment.certificate_issued {
            return Err(Error::CertificateAlreadyIssued);
        }

        enrollment.certificate_issued = true;
        storage::write_enrollment(&env, &enrollment);

        events::emit_certificate_issued(&env, &student, course_id);
        Ok(())
    }
}
