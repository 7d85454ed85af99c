use serde::Serialize;

/// Broad failure families the UI reacts to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input; nothing was written, the user can correct and retry.
    Validation,
    /// The UI handed over zero or several items where exactly one was needed.
    Selection,
    /// The store failed. Cascading writes have been rolled back.
    Persistence,
    /// The caller broke a precondition (e.g. asked about a student outside the class).
    Invariant,
}

#[derive(thiserror::Error, Debug)]
pub enum GradebookError {
    #[error("{0}")]
    Validation(String),

    /// Duplicate enrollment or duplicate grade.
    #[error("{0}")]
    Conflict(String),

    #[error("{what} not found")]
    NotFound { what: &'static str, id: String },

    #[error("{0}")]
    Selection(String),

    #[error("student {student_id} is not enrolled in class {class_id}")]
    NotEnrolled {
        student_id: String,
        class_id: String,
    },

    #[error("failed to delete from {table}: {source}")]
    DeleteFailed {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, GradebookError>;

impl GradebookError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::NotFound { .. } => {
                ErrorKind::Validation
            }
            Self::Selection(_) => ErrorKind::Selection,
            Self::NotEnrolled { .. } => ErrorKind::Invariant,
            Self::DeleteFailed { .. } | Self::Db(_) => ErrorKind::Persistence,
        }
    }

    /// Stable code sent to the UI in `error.code`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "bad_params",
            Self::Conflict(_) => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Selection(_) => "bad_selection",
            Self::NotEnrolled { .. } => "invariant_violation",
            Self::DeleteFailed { .. } => "db_delete_failed",
            Self::Db(_) => "db_error",
        }
    }

    pub fn details(&self) -> serde_json::Value {
        let mut details = serde_json::json!({ "kind": self.kind() });
        match self {
            Self::NotFound { what, id } => {
                details["what"] = serde_json::json!(what);
                details["id"] = serde_json::json!(id);
            }
            Self::NotEnrolled {
                student_id,
                class_id,
            } => {
                details["studentId"] = serde_json::json!(student_id);
                details["classId"] = serde_json::json!(class_id);
            }
            Self::DeleteFailed { table, .. } => {
                details["table"] = serde_json::json!(table);
            }
            _ => {}
        }
        details
    }
}
