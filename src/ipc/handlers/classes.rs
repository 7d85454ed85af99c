use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::helpers::{conn, required_str};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::{json, Value};

fn handle_classes_list(state: &mut AppState, _req: &Request) -> Result<Value, HandlerErr> {
    let classes = store::list_classes(conn(state)?)?;
    Ok(json!({ "classes": classes }))
}

fn handle_classes_create(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let name = required_str(&req.params, "name")?;
    let class = store::create_class(conn, name)?;
    Ok(json!({ "classId": class.id, "class": class }))
}

/// Everything the class screen shows: name, roster, and each student's average.
fn handle_classes_open(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let class_id = required_str(&req.params, "classId")?;
    let class = store::get_class(conn, class_id)?;
    let averages = store::class_averages(conn, class_id)?;
    Ok(json!({ "class": class, "averages": averages }))
}

fn handle_classes_delete(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let conn = conn(state)?;
    let class_id = required_str(&req.params, "classId")?;
    let removed = store::delete_class(conn, class_id)?;
    Ok(json!({
        "ok": true,
        "removed": {
            "grades": removed.grades,
            "assignments": removed.assignments,
            "enrollments": removed.enrollments
        }
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let outcome = match req.method.as_str() {
        // Without a workspace there is simply nothing to list.
        "classes.list" if state.db.is_none() => {
            return Some(ok(&req.id, json!({ "classes": [] })));
        }
        "classes.list" => handle_classes_list(state, req),
        "classes.create" => handle_classes_create(state, req),
        "classes.open" => handle_classes_open(state, req),
        "classes.delete" => handle_classes_delete(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}
