use rusqlite::Connection;
use serde_json::Value;

use super::error::HandlerErr;
use super::types::AppState;
use crate::error::GradebookError;
use crate::validate::{check_weight, parse_weight};

pub fn conn(state: &AppState) -> Result<&Connection, HandlerErr> {
    state.db.as_ref().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    })
}

pub fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn optional_str<'a>(params: &'a Value, key: &str) -> Result<Option<&'a str>, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}

/// The one student the request is about. The UI may send `studentId`, or pass
/// its list selection through as `studentIds`, which must then hold exactly one id.
pub fn selected_student(params: &Value) -> Result<String, HandlerErr> {
    if let Some(id) = params.get("studentId").and_then(|v| v.as_str()) {
        return Ok(id.to_string());
    }
    let Some(selection) = params.get("studentIds") else {
        return Err(HandlerErr::bad_params("missing studentId"));
    };
    let Some(ids) = selection.as_array() else {
        return Err(HandlerErr::bad_params("studentIds must be an array"));
    };
    match ids.as_slice() {
        [only] => only
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| HandlerErr::bad_params("studentIds must contain strings")),
        _ => Err(GradebookError::Selection("Please select exactly one student.".to_string()).into()),
    }
}

/// Weight as typed by the user (string) or already numeric.
pub fn weight_param(params: &Value) -> Result<f64, HandlerErr> {
    let weight = match params.get("weight") {
        Some(Value::Number(n)) => {
            let Some(w) = n.as_f64() else {
                return Err(HandlerErr::bad_params("weight is not representable"));
            };
            check_weight(w)?
        }
        Some(Value::String(s)) => parse_weight(s)?,
        Some(_) => return Err(HandlerErr::bad_params("weight must be a number or string")),
        None => return Err(HandlerErr::bad_params("missing weight")),
    };
    Ok(weight)
}
