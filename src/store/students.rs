use super::{is_enrolled, new_id, now_stamp, require_class};
use crate::error::{GradebookError, Result};
use crate::model::Student;
use crate::validate::check_name;
use rusqlite::{Connection, OptionalExtension, Row};

fn student_from_row(r: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: r.get(0)?,
        full_name: r.get(1)?,
        created_at: r.get(2)?,
    })
}

pub fn insert_student(conn: &Connection, full_name: &str) -> Result<Student> {
    let full_name = check_name("student", full_name)?;
    let student = Student {
        id: new_id(),
        full_name,
        created_at: now_stamp(),
    };
    conn.execute(
        "INSERT INTO students(id, full_name, created_at) VALUES(?, ?, ?)",
        (&student.id, &student.full_name, &student.created_at),
    )?;
    tracing::info!(student_id = %student.id, name = %student.full_name, "student created");
    Ok(student)
}

/// All students, in the order they were created.
pub fn list_students(conn: &Connection) -> Result<Vec<Student>> {
    let mut stmt =
        conn.prepare("SELECT id, full_name, created_at FROM students ORDER BY rowid")?;
    let students = stmt
        .query_map([], student_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(students)
}

pub fn get_student(conn: &Connection, student_id: &str) -> Result<Student> {
    conn.query_row(
        "SELECT id, full_name, created_at FROM students WHERE id = ?",
        [student_id],
        student_from_row,
    )
    .optional()?
    .ok_or_else(|| GradebookError::NotFound {
        what: "student",
        id: student_id.to_string(),
    })
}

/// Adds an existing student to a class roster, at the end.
/// Enrolling someone twice is a conflict and leaves the roster untouched.
pub fn enroll_student(conn: &Connection, student_id: &str, class_id: &str) -> Result<()> {
    require_class(conn, class_id)?;
    let student = get_student(conn, student_id)?;

    if is_enrolled(conn, student_id, class_id)? {
        return Err(GradebookError::Conflict(format!(
            "Student {} already exists in this class.",
            student.full_name
        )));
    }

    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM class_students WHERE class_id = ?",
        [class_id],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT INTO class_students(class_id, student_id, sort_order) VALUES(?, ?, ?)",
        (class_id, student_id, next),
    )?;
    tracing::info!(%class_id, %student_id, sort_order = next, "student enrolled");
    Ok(())
}

/// New student straight into a class. Either both rows land or neither does.
pub fn create_and_enroll(conn: &Connection, full_name: &str, class_id: &str) -> Result<Student> {
    let tx = conn.unchecked_transaction()?;
    require_class(&tx, class_id)?;
    let student = insert_student(&tx, full_name)?;
    enroll_student(&tx, &student.id, class_id)?;
    tx.commit()?;
    Ok(student)
}
