//! Persistence gateway: every read and write the UI can ask for, expressed
//! against a borrowed SQLite connection.

mod assignments;
mod classes;
mod students;

pub use assignments::{class_averages, create_assignment, student_average, student_grades};
pub use classes::{
    class_students, create_class, delete_class, get_class, list_classes, DeleteSummary,
};
pub use students::{
    create_and_enroll, enroll_student, get_student, insert_student, list_students,
};

use crate::error::{GradebookError, Result};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_stamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn require_class(conn: &Connection, class_id: &str) -> Result<()> {
    let exists: Option<i64> = conn
        .query_row("SELECT 1 FROM classes WHERE id = ?", [class_id], |r| r.get(0))
        .optional()?;
    if exists.is_none() {
        return Err(GradebookError::NotFound {
            what: "class",
            id: class_id.to_string(),
        });
    }
    Ok(())
}

fn is_enrolled(conn: &Connection, student_id: &str, class_id: &str) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM class_students WHERE class_id = ? AND student_id = ?",
            (class_id, student_id),
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

fn require_enrolled(conn: &Connection, student_id: &str, class_id: &str) -> Result<()> {
    if !is_enrolled(conn, student_id, class_id)? {
        return Err(GradebookError::NotEnrolled {
            student_id: student_id.to_string(),
            class_id: class_id.to_string(),
        });
    }
    Ok(())
}
