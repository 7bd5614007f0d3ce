#![cfg(test)]

extern crate std;

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String, Vec};

use course_registry::{
    CourseLevel, CourseRegistry, CourseRegistryClient, NewCourse, NewLesson,
};
use payment::{CardInput, PaymentContract, PaymentContractClient, PaymentMethod, PaymentReceipt};

use crate::{
    EnrollmentContract, EnrollmentContractClient, EnrollmentStatus, Error, RECEIPT_MAX_AGE_SECS,
};

const START: u64 = 1_700_000_000;

struct TestCtx {
    env: Env,
    admin: Address,
    instructor: Address,
    student: Address,
    registry: CourseRegistryClient<'static>,
    client: EnrollmentContractClient<'static>,
}

fn setup() -> TestCtx {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = START);

    let admin = Address::generate(&env);
    let instructor = Address::generate(&env);
    let student = Address::generate(&env);

    let registry_id = env.register(CourseRegistry, ());
    let registry = CourseRegistryClient::new(&env, &registry_id);
    registry.init(&admin);

    let contract_id = env.register(EnrollmentContract, ());
    let client = EnrollmentContractClient::new(&env, &contract_id);
    client.init(&admin, &registry_id, &String::from_str(&env, "USD"));
    registry.set_enrollment_contract(&contract_id);

    TestCtx {
        env,
        admin,
        instructor,
        student,
        registry,
        client,
    }
}

fn advance(env: &Env, secs: u64) {
    env.ledger().with_mut(|li| li.timestamp += secs);
}

fn course_params(env: &Env, price: i128) -> NewCourse {
    NewCourse {
        title: String::from_str(env, "Rust Fundamentals"),
        description: String::from_str(env, "Ownership, borrowing and lifetimes"),
        category: String::from_str(env, "programming"),
        level: CourseLevel::Beginner,
        price,
        duration_hours: 8,
        tags: Vec::new(env),
        prerequisites: Vec::new(env),
        outcomes: Vec::new(env),
    }
}

fn published_course(ctx: &TestCtx, price: i128, lessons: u32) -> u64 {
    let course = ctx
        .registry
        .create_course(&ctx.instructor, &course_params(&ctx.env, price));
    for _ in 0..lessons {
        ctx.registry.add_lesson(
            &ctx.instructor,
            &course.id,
            &NewLesson {
                title: String::from_str(&ctx.env, "Lesson"),
                content: String::from_str(&ctx.env, "content"),
                video_url: None,
                duration_mins: 10,
                resources: Vec::new(&ctx.env),
            },
        );
    }
    ctx.registry.publish_course(&ctx.instructor, &course.id);
    course.id
}

fn receipt(env: &Env, tx_id: u64, amount: i128, paid_at: u64) -> PaymentReceipt {
    PaymentReceipt {
        tx_id,
        method: PaymentMethod::Card,
        amount,
        currency: String::from_str(env, "USD"),
        paid_at,
        card_last4: String::from_str(env, "4242"),
    }
}

// ============ enrollment creation ============

#[test]
fn enroll_free_course() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);

    let enrollment = ctx.client.enroll(&ctx.student, &course_id, &None);

    assert_eq!(enrollment.student, ctx.student);
    assert_eq!(enrollment.course_id, course_id);
    assert_eq!(enrollment.enrolled_at, START);
    assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
    assert_eq!(enrollment.progress.percentage, 0);
    assert_eq!(enrollment.progress.completed.len(), 0);
    assert_eq!(enrollment.completed_at, None);
    assert!(!enrollment.certificate_issued);
    assert_eq!(ctx.client.get_rating(&ctx.student, &course_id), None);

    assert_eq!(ctx.client.course_enrollment_count(&course_id), 1);
}

#[test]
fn enroll_requires_student_auth() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);

    ctx.client.enroll(&ctx.student, &course_id, &None);

    let auths = ctx.env.auths();
    assert_eq!(auths.first().map(|a| a.0.clone()), Some(ctx.student.clone()));
}

#[test]
fn enroll_twice_fails() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);

    ctx.client.enroll(&ctx.student, &course_id, &None);
    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &None),
        Err(Ok(Error::AlreadyEnrolled))
    );
}

#[test]
fn enroll_unknown_course_fails() {
    let ctx = setup();
    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &99, &None),
        Err(Ok(Error::CourseNotFound))
    );
}

#[test]
fn enroll_draft_course_fails() {
    let ctx = setup();
    let course = ctx
        .registry
        .create_course(&ctx.instructor, &course_params(&ctx.env, 0));

    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course.id, &None),
        Err(Ok(Error::CourseNotAvailable))
    );
}

#[test]
fn enroll_archived_course_fails() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    ctx.registry.archive_course(&ctx.instructor, &course_id);

    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &None),
        Err(Ok(Error::CourseNotAvailable))
    );
}

// ============ paid enrollment ============

#[test]
fn paid_course_requires_receipt() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);

    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &None),
        Err(Ok(Error::PaymentRequired))
    );
}

#[test]
fn paid_course_rejects_wrong_amount() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);

    let r = receipt(&ctx.env, 1, 40, START);
    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &Some(r)),
        Err(Ok(Error::PaymentRequired))
    );
}

#[test]
fn paid_course_rejects_wrong_currency() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);

    let mut r = receipt(&ctx.env, 1, 50, START);
    r.currency = String::from_str(&ctx.env, "EUR");
    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &Some(r)),
        Err(Ok(Error::PaymentRequired))
    );
}

#[test]
fn paid_course_rejects_stale_receipt() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);

    // One second past the window fails, exactly at the window passes.
    let stale = receipt(&ctx.env, 1, 50, START - RECEIPT_MAX_AGE_SECS - 1);
    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &Some(stale)),
        Err(Ok(Error::PaymentRequired))
    );

    let boundary = receipt(&ctx.env, 2, 50, START - RECEIPT_MAX_AGE_SECS);
    let enrollment = ctx.client.enroll(&ctx.student, &course_id, &Some(boundary));
    assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
}

#[test]
fn paid_course_rejects_reused_receipt() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);
    let other = Address::generate(&ctx.env);

    let r = receipt(&ctx.env, 7, 50, START);
    ctx.client.enroll(&ctx.student, &course_id, &Some(r.clone()));

    assert_eq!(
        ctx.client.try_enroll(&other, &course_id, &Some(r)),
        Err(Ok(Error::ReceiptAlreadyUsed))
    );
}

#[test]
fn paid_course_accepts_authorized_receipt() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);

    let payment_id = ctx.env.register(PaymentContract, ());
    let payments = PaymentContractClient::new(&ctx.env, &payment_id);
    let card = CardInput {
        number: String::from_str(&ctx.env, "4242-4242-4242-4242"),
        expiry: String::from_str(&ctx.env, "12/30"),
        cvv: String::from_str(&ctx.env, "123"),
        holder: String::from_str(&ctx.env, "Grace Hopper"),
    };
    let r = payments.authorize(
        &ctx.student,
        &50,
        &String::from_str(&ctx.env, "USD"),
        &card,
    );

    let enrollment = ctx.client.enroll(&ctx.student, &course_id, &Some(r));
    assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
}

#[test]
fn free_course_does_not_consume_receipt() {
    let ctx = setup();
    let free_id = published_course(&ctx, 0, 1);
    let paid_id = published_course(&ctx, 50, 1);

    let r = receipt(&ctx.env, 3, 50, START);
    ctx.client.enroll(&ctx.student, &free_id, &Some(r.clone()));

    // The receipt was ignored on the free course, so it still spends here.
    let enrollment = ctx.client.enroll(&ctx.student, &paid_id, &Some(r));
    assert_eq!(enrollment.course_id, paid_id);
}

// ============ progress tracking ============

#[test]
fn lesson_completion_drives_progress_and_status() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 4);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    assert_eq!(progress.percentage, 25);
    assert_eq!(
        ctx.client
            .find_enrollment(&ctx.student, &course_id)
            .unwrap()
            .status,
        EnrollmentStatus::InProgress
    );

    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &3);
    assert_eq!(progress.percentage, 50);
    assert_eq!(progress.completed.len(), 2);

    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &2);
    advance(&ctx.env, 60);
    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &4);
    assert_eq!(progress.percentage, 100);

    let enrollment = ctx.client.find_enrollment(&ctx.student, &course_id).unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Completed);
    assert_eq!(enrollment.completed_at, Some(START + 60));
}

#[test]
fn lesson_completion_is_idempotent() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 4);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    let first = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    advance(&ctx.env, 60);
    let again = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);

    assert_eq!(first, again);
    assert_eq!(again.completed.len(), 1);
    assert_eq!(again.percentage, 25);
}

#[test]
fn completing_unknown_lesson_fails() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    assert_eq!(
        ctx.client.try_mark_lesson_completed(&ctx.student, &course_id, &9),
        Err(Ok(Error::LessonNotInCourse))
    );
}

#[test]
fn completing_without_enrollment_fails() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);

    assert_eq!(
        ctx.client.try_mark_lesson_completed(&ctx.student, &course_id, &1),
        Err(Ok(Error::EnrollmentNotFound))
    );
}

#[test]
fn completed_enrollment_is_terminal_for_progress() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    ctx.client.enroll(&ctx.student, &course_id, &None);
    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);

    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    assert_eq!(progress.percentage, 100);
    assert_eq!(progress.completed.len(), 1);
}

#[test]
fn removed_lesson_drops_out_of_percentage() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 4);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    ctx.registry.remove_lesson(&ctx.instructor, &course_id, &1);

    // New completions of the removed lesson are rejected.
    let other = Address::generate(&ctx.env);
    ctx.client.enroll(&other, &course_id, &None);
    assert_eq!(
        ctx.client.try_mark_lesson_completed(&other, &course_id, &1),
        Err(Ok(Error::LessonNotInCourse))
    );

    // The stale completion of lesson 1 counts for nothing: 1 of 3 active.
    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &2);
    assert_eq!(progress.percentage, 33);
    assert_eq!(progress.completed.len(), 2);
}

#[test]
fn removing_last_pending_lesson_lets_next_completion_finish() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 4);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &2);
    ctx.registry.remove_lesson(&ctx.instructor, &course_id, &4);

    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &3);
    assert_eq!(progress.percentage, 100);
    assert_eq!(
        ctx.client
            .find_enrollment(&ctx.student, &course_id)
            .unwrap()
            .status,
        EnrollmentStatus::Completed
    );
}

#[test]
fn re_marking_after_lesson_removal_completes_enrollment() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    assert_eq!(progress.percentage, 50);

    // Every remaining active lesson is now done; the next touch of any
    // completed lesson must pick that up.
    ctx.registry.remove_lesson(&ctx.instructor, &course_id, &2);
    advance(&ctx.env, 60);
    let progress = ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    assert_eq!(progress.percentage, 100);
    assert_eq!(progress.completed.len(), 1);

    let enrollment = ctx.client.find_enrollment(&ctx.student, &course_id).unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Completed);
    assert_eq!(enrollment.completed_at, Some(START + 60));
}

#[test]
fn course_without_lessons_reports_zero_percent() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 0);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    assert_eq!(ctx.client.progress_percentage(&ctx.student, &course_id), 0);
    assert_eq!(
        ctx.client.try_mark_lesson_completed(&ctx.student, &course_id, &1),
        Err(Ok(Error::LessonNotInCourse))
    );
}

#[test]
fn progress_reads_fail_without_enrollment() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);

    assert_eq!(
        ctx.client.try_get_progress(&ctx.student, &course_id),
        Err(Ok(Error::EnrollmentNotFound))
    );
    assert_eq!(
        ctx.client.try_progress_percentage(&ctx.student, &course_id),
        Err(Ok(Error::EnrollmentNotFound))
    );
    assert_eq!(ctx.client.find_enrollment(&ctx.student, &course_id), None);
}

// ============ dropping and re-enrolling ============

#[test]
fn drop_enrollment_lifecycle() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    ctx.client.drop_enrollment(&ctx.student, &course_id);
    let enrollment = ctx.client.find_enrollment(&ctx.student, &course_id).unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Dropped);

    assert_eq!(
        ctx.client.try_drop_enrollment(&ctx.student, &course_id),
        Err(Ok(Error::EnrollmentDropped))
    );
    assert_eq!(
        ctx.client.try_mark_lesson_completed(&ctx.student, &course_id, &1),
        Err(Ok(Error::EnrollmentDropped))
    );
}

#[test]
fn drop_without_enrollment_fails() {
    let ctx = setup();
    assert_eq!(
        ctx.client.try_drop_enrollment(&ctx.student, &5),
        Err(Ok(Error::EnrollmentNotFound))
    );
}

#[test]
fn completed_enrollment_cannot_be_dropped() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    ctx.client.enroll(&ctx.student, &course_id, &None);
    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);

    assert_eq!(
        ctx.client.try_drop_enrollment(&ctx.student, &course_id),
        Err(Ok(Error::CannotDropCompleted))
    );
}

#[test]
fn re_enroll_after_drop_starts_fresh() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);

    ctx.client.enroll(&ctx.student, &course_id, &None);
    ctx.client.mark_lesson_completed(&ctx.student, &course_id, &1);
    ctx.client.drop_enrollment(&ctx.student, &course_id);

    advance(&ctx.env, 100);
    let enrollment = ctx.client.enroll(&ctx.student, &course_id, &None);
    assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
    assert_eq!(enrollment.enrolled_at, START + 100);
    assert_eq!(enrollment.progress.completed.len(), 0);
    assert_eq!(enrollment.progress.percentage, 0);
}

#[test]
fn re_enroll_on_paid_course_needs_a_fresh_receipt() {
    let ctx = setup();
    let course_id = published_course(&ctx, 50, 1);

    let first = receipt(&ctx.env, 1, 50, START);
    ctx.client.enroll(&ctx.student, &course_id, &Some(first.clone()));
    ctx.client.drop_enrollment(&ctx.student, &course_id);

    assert_eq!(
        ctx.client.try_enroll(&ctx.student, &course_id, &Some(first)),
        Err(Ok(Error::ReceiptAlreadyUsed))
    );

    let second = receipt(&ctx.env, 2, 50, START);
    let enrollment = ctx.client.enroll(&ctx.student, &course_id, &Some(second));
    assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
}

// ============ listings and counts ============

#[test]
fn list_for_student_is_most_recent_first() {
    let ctx = setup();
    let c1 = published_course(&ctx, 0, 1);
    let c2 = published_course(&ctx, 0, 1);
    let c3 = published_course(&ctx, 0, 1);

    ctx.client.enroll(&ctx.student, &c1, &None);
    advance(&ctx.env, 10);
    ctx.client.enroll(&ctx.student, &c2, &None);
    advance(&ctx.env, 10);
    ctx.client.enroll(&ctx.student, &c3, &None);

    let list = ctx.client.list_for_student(&ctx.student);
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(0).unwrap().course_id, c3);
    assert_eq!(list.get(1).unwrap().course_id, c2);
    assert_eq!(list.get(2).unwrap().course_id, c1);
}

#[test]
fn list_for_student_keeps_dropped_and_reorders_re_enrollments() {
    let ctx = setup();
    let c1 = published_course(&ctx, 0, 1);
    let c2 = published_course(&ctx, 0, 1);

    ctx.client.enroll(&ctx.student, &c1, &None);
    ctx.client.enroll(&ctx.student, &c2, &None);
    ctx.client.drop_enrollment(&ctx.student, &c1);

    let list = ctx.client.list_for_student(&ctx.student);
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(0).unwrap().course_id, c2);
    assert_eq!(list.get(1).unwrap().status, EnrollmentStatus::Dropped);

    // Re-enrolling moves the course back to the front of the list.
    ctx.client.enroll(&ctx.student, &c1, &None);
    let list = ctx.client.list_for_student(&ctx.student);
    assert_eq!(list.get(0).unwrap().course_id, c1);
    assert_eq!(list.get(0).unwrap().status, EnrollmentStatus::Enrolled);
}

#[test]
fn enrollment_count_excludes_dropped() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    let s2 = Address::generate(&ctx.env);
    let s3 = Address::generate(&ctx.env);

    ctx.client.enroll(&ctx.student, &course_id, &None);
    ctx.client.enroll(&s2, &course_id, &None);
    ctx.client.enroll(&s3, &course_id, &None);
    assert_eq!(ctx.client.course_enrollment_count(&course_id), 3);

    ctx.client.drop_enrollment(&s2, &course_id);
    assert_eq!(ctx.client.course_enrollment_count(&course_id), 2);

    ctx.client.enroll(&s2, &course_id, &None);
    assert_eq!(ctx.client.course_enrollment_count(&course_id), 3);
}

// ============ ratings ============

fn complete_course(ctx: &TestCtx, student: &Address, course_id: u64) {
    ctx.client.enroll(student, &course_id, &None);
    ctx.client.mark_lesson_completed(student, &course_id, &1);
}

#[test]
fn rating_is_stored_and_folds_into_registry_aggregate() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    complete_course(&ctx, &ctx.student, course_id);

    ctx.client.rate_course(
        &ctx.student,
        &course_id,
        &5,
        &String::from_str(&ctx.env, "Excellent pacing"),
    );

    let rating = ctx.client.get_rating(&ctx.student, &course_id).unwrap();
    assert_eq!(rating.score, 5);
    assert_eq!(rating.review, String::from_str(&ctx.env, "Excellent pacing"));
    assert_eq!(rating.rated_at, START);

    let course = ctx.registry.get_course(&course_id);
    assert_eq!(course.rating.sum, 5);
    assert_eq!(course.rating.count, 1);

    let s2 = Address::generate(&ctx.env);
    complete_course(&ctx, &s2, course_id);
    ctx.client
        .rate_course(&s2, &course_id, &4, &String::from_str(&ctx.env, "Solid"));

    let course = ctx.registry.get_course(&course_id);
    assert_eq!(course.rating.sum, 9);
    assert_eq!(course.rating.count, 2);
}

#[test]
fn rating_requires_completion() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    let review = String::from_str(&ctx.env, "ok");
    assert_eq!(
        ctx.client.try_rate_course(&ctx.student, &course_id, &4, &review),
        Err(Ok(Error::NotCompleted))
    );
}

#[test]
fn rating_twice_fails() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    complete_course(&ctx, &ctx.student, course_id);

    let review = String::from_str(&ctx.env, "ok");
    ctx.client.rate_course(&ctx.student, &course_id, &3, &review);
    assert_eq!(
        ctx.client.try_rate_course(&ctx.student, &course_id, &5, &review),
        Err(Ok(Error::AlreadyRated))
    );
}

#[test]
fn rating_score_is_bounded() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    complete_course(&ctx, &ctx.student, course_id);

    let review = String::from_str(&ctx.env, "ok");
    assert_eq!(
        ctx.client.try_rate_course(&ctx.student, &course_id, &0, &review),
        Err(Ok(Error::RatingOutOfRange))
    );
    assert_eq!(
        ctx.client.try_rate_course(&ctx.student, &course_id, &6, &review),
        Err(Ok(Error::RatingOutOfRange))
    );
}

#[test]
fn rating_without_enrollment_fails() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);

    let review = String::from_str(&ctx.env, "ok");
    assert_eq!(
        ctx.client.try_rate_course(&ctx.student, &course_id, &4, &review),
        Err(Ok(Error::EnrollmentNotFound))
    );
}

// ============ certificates ============

#[test]
fn certificate_issued_once_on_completion() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 1);
    complete_course(&ctx, &ctx.student, course_id);

    ctx.client.issue_certificate(&ctx.student, &course_id);
    let auths = ctx.env.auths();
    assert_eq!(auths.first().map(|a| a.0.clone()), Some(ctx.admin.clone()));

    let enrollment = ctx.client.find_enrollment(&ctx.student, &course_id).unwrap();
    assert!(enrollment.certificate_issued);

    assert_eq!(
        ctx.client.try_issue_certificate(&ctx.student, &course_id),
        Err(Ok(Error::CertificateAlreadyIssued))
    );
}

#[test]
fn certificate_requires_completion() {
    let ctx = setup();
    let course_id = published_course(&ctx, 0, 2);
    ctx.client.enroll(&ctx.student, &course_id, &None);

    assert_eq!(
        ctx.client.try_issue_certificate(&ctx.student, &course_id),
        Err(Ok(Error::NotCompleted))
    );
}

// ============ initialization ============

#[test]
fn init_twice_fails() {
    let ctx = setup();
    let registry = Address::generate(&ctx.env);
    assert_eq!(
        ctx.client
            .try_init(&ctx.admin, &registry, &String::from_str(&ctx.env, "USD")),
        Err(Ok(Error::AlreadyInitialized))
    );
}
