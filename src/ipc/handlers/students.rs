use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::helpers::{conn, optional_str, required_str, selected_student};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::{json, Value};

fn handle_students_list(state: &mut AppState, _req: &Request) -> Result<Value, HandlerErr> {
    let students = store::list_students(conn(state)?)?;
    Ok(json!({ "students": students }))
}

/// Creates a student. With `classId` the new student is enrolled in the same step.
fn handle_students_create(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let name = required_str(&req.params, "name")?;
    let (student, enrolled) = match optional_str(&req.params, "classId")? {
        Some(class_id) => (store::create_and_enroll(conn, name, class_id)?, true),
        None => (store::insert_student(conn, name)?, false),
    };
    Ok(json!({
        "studentId": student.id,
        "student": student,
        "enrolled": enrolled
    }))
}

fn handle_students_enroll(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let class_id = required_str(&req.params, "classId")?;
    let student_id = selected_student(&req.params)?;
    store::enroll_student(conn, &student_id, class_id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let outcome = match req.method.as_str() {
        // Same as classes.list: no workspace means nothing to list.
        "students.list" if state.db.is_none() => {
            return Some(ok(&req.id, json!({ "students": [] })));
        }
        "students.list" => handle_students_list(state, req),
        "students.create" => handle_students_create(state, req),
        "students.enroll" => handle_students_enroll(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}
