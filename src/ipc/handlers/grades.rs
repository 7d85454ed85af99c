use crate::calc::sheet_average;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{conn, required_str, selected_student};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::{json, Value};

fn handle_grades_average(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let class_id = required_str(&req.params, "classId")?;
    let student_id = selected_student(&req.params)?;
    let average = store::student_average(conn, &student_id, class_id)?;
    Ok(json!({
        "studentId": student_id,
        "classId": class_id,
        "average": average,
        "display": average.display()
    }))
}

/// The student's sheet for one class; ungraded assignments carry `score: null`.
fn handle_grades_list(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let class_id = required_str(&req.params, "classId")?;
    let student_id = selected_student(&req.params)?;
    let student = store::get_student(conn, &student_id)?;
    let sheet = store::student_grades(conn, &student_id, class_id)?;
    let average = sheet_average(&sheet);
    Ok(json!({
        "student": student,
        "assignments": sheet,
        "average": average,
        "display": average.display()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let outcome = match req.method.as_str() {
        "grades.average" => handle_grades_average(state, req),
        "grades.list" => handle_grades_list(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}
