use soroban_sdk::{symbol_short, Address, Env};

pub fn emit_enrolled(env: &Env, student: &Address, course_id: u64, tx_id: Option<u64>) {
    env.events()
        .publish((symbol_short!("enrolled"), student), (course_id, tx_id));
}

pub fn emit_dropped(env: &Env, student: &Address, course_id: u64) {
    env.events()
        .publish((symbol_short!("dropped"), student), course_id);
}

pub fn emit_lesson_completed(
    env: &Env,
    student: &Address,
    course_id: u64,
    lesson_id: u32,
    percentage: u32,
) {
    env.events().publish(
        (symbol_short!("lsn_done"), student),
        (course_id, lesson_id, percentage),
    );
}

pub fn emit_course_completed(env: &Env, student: &Address, course_id: u64) {
    env.events()
        .publish((symbol_short!("completed"), student), course_id);
}

pub fn emit_rated(env: &Env, student: &Address, course_id: u64, score: u32) {
    env.events()
        .publish((symbol_short!("rated"), student), (course_id, score));
}

pub fn emit_certificate_issued(env: &Env, student: &Address, course_id: u64) {
    env.events()
        .publish((symbol_short!("cert"), student), course_id);
}
