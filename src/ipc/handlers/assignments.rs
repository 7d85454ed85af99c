use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{conn, required_str, weight_param};
use crate::ipc::types::{AppState, Request};
use crate::model::{GradeInput, NewAssignment};
use crate::store;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradeParam {
    student_id: String,
    #[serde(default)]
    score: Option<f64>,
}

fn grade_sheet(params: &Value) -> Result<Vec<GradeInput>, HandlerErr> {
    let Some(raw) = params.get("grades") else {
        return Ok(Vec::new());
    };
    let rows: Vec<GradeParam> = serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::bad_params(format!("bad grades: {}", e)))?;
    Ok(rows
        .into_iter()
        .map(|g| GradeInput::new(g.student_id, g.score))
        .collect())
}

/// One call per assignment: name, weight, and the grades the UI collected for it.
fn handle_assignments_create(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let class_id = required_str(&req.params, "classId")?;
    let new = NewAssignment {
        name: required_str(&req.params, "name")?.to_string(),
        weight: weight_param(&req.params)?,
    };
    let grades = grade_sheet(&req.params)?;
    let assignment = store::create_assignment(conn, class_id, &new, &grades)?;
    let graded_count = grades.iter().filter(|g| g.score.is_some()).count();
    Ok(json!({
        "assignmentId": assignment.id,
        "assignment": assignment,
        "gradedCount": graded_count
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let outcome = match req.method.as_str() {
        "assignments.create" => handle_assignments_create(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}
