use serde_json::json;

use crate::error::{ErrorKind, GradebookError};

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// A failed request, before it is turned into a response line.
#[derive(Debug)]
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<GradebookError> for HandlerErr {
    fn from(e: GradebookError) -> Self {
        match e.kind() {
            ErrorKind::Persistence => tracing::error!(code = e.code(), "{e}"),
            ErrorKind::Invariant => tracing::warn!(code = e.code(), "{e}"),
            ErrorKind::Validation | ErrorKind::Selection => {
                tracing::debug!(code = e.code(), "{e}")
            }
        }
        Self {
            code: e.code(),
            message: e.to_string(),
            details: Some(e.details()),
        }
    }
}

/// Turns a handler outcome into the wire envelope.
pub fn respond(id: &str, outcome: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match outcome {
        Ok(result) => ok(id, result),
        Err(e) => e.response(id),
    }
}
