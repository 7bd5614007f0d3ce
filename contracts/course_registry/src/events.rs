use soroban_sdk::{symbol_short, Address, Env};

use crate::schema::CourseStatus;

pub fn emit_course_created(env: &Env, course_id: u64, instructor: &Address) {
    env.events()
        .publish((symbol_short!("c_created"), instructor), course_id);
}

pub fn emit_course_edited(env: &Env, course_id: u64) {
    env.events().publish((symbol_short!("c_edited"),), course_id);
}

pub fn emit_lesson_added(env: &Env, course_id: u64, lesson_id: u32) {
    env.events()
        .publish((symbol_short!("l_added"),), (course_id, lesson_id));
}

pub fn emit_lesson_removed(env: &Env, course_id: u64, lesson_id: u32) {
    env.events()
        .publish((symbol_short!("l_removed"),), (course_id, lesson_id));
}

pub fn emit_status_changed(env: &Env, course_id: u64, status: CourseStatus) {
    env.events()
        .publish((symbol_short!("c_status"),), (course_id, status as u32));
}

pub fn emit_course_rated(env: &Env, course_id: u64, score: u32) {
    env.events()
        .publish((symbol_short!("c_rated"),), (course_id, score));
}
