use super::{new_id, now_stamp, require_class};
use crate::error::{GradebookError, Result};
use crate::model::{Class, ClassSummary, Student};
use crate::validate::check_name;
use rusqlite::{Connection, OptionalExtension};

/// Class-scoped rows, in the order they must go. There is no ON DELETE CASCADE
/// in the schema, so every table that hangs off a class is listed here.
const CLASS_CASCADE: [(&str, &str); 4] = [
    (
        "grades",
        "DELETE FROM grades
         WHERE assignment_id IN (SELECT id FROM assignments WHERE class_id = ?)",
    ),
    ("assignments", "DELETE FROM assignments WHERE class_id = ?"),
    (
        "class_students",
        "DELETE FROM class_students WHERE class_id = ?",
    ),
    ("classes", "DELETE FROM classes WHERE id = ?"),
];

/// Row counts removed by `delete_class`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub grades: usize,
    pub assignments: usize,
    pub enrollments: usize,
}

pub fn list_classes(conn: &Connection) -> Result<Vec<ClassSummary>> {
    // Correlated subqueries so the counts don't multiply through joins.
    let mut stmt = conn.prepare(
        "SELECT
           c.id,
           c.class_name,
           (SELECT COUNT(*) FROM class_students cs WHERE cs.class_id = c.id) AS student_count,
           (SELECT COUNT(*) FROM assignments a WHERE a.class_id = c.id) AS assignment_count
         FROM classes c
         ORDER BY c.rowid",
    )?;
    let classes = stmt
        .query_map([], |r| {
            Ok(ClassSummary {
                id: r.get(0)?,
                name: r.get(1)?,
                student_count: r.get(2)?,
                assignment_count: r.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(classes)
}

pub fn create_class(conn: &Connection, name: &str) -> Result<Class> {
    let name = check_name("class", name)?;
    let class = Class {
        id: new_id(),
        name,
        created_at: now_stamp(),
        students: Vec::new(),
    };
    conn.execute(
        "INSERT INTO classes(id, class_name, created_at) VALUES(?, ?, ?)",
        (&class.id, &class.name, &class.created_at),
    )?;
    tracing::info!(class_id = %class.id, name = %class.name, "class created");
    Ok(class)
}

/// The class and its roster in enrollment order.
pub fn get_class(conn: &Connection, class_id: &str) -> Result<Class> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT class_name, created_at FROM classes WHERE id = ?",
            [class_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((name, created_at)) = row else {
        return Err(GradebookError::NotFound {
            what: "class",
            id: class_id.to_string(),
        });
    };

    Ok(Class {
        id: class_id.to_string(),
        name,
        created_at,
        students: class_students(conn, class_id)?,
    })
}

pub fn class_students(conn: &Connection, class_id: &str) -> Result<Vec<Student>> {
    require_class(conn, class_id)?;
    let mut stmt = conn.prepare(
        "SELECT s.id, s.full_name, s.created_at
         FROM class_students cs
         JOIN students s ON s.id = cs.student_id
         WHERE cs.class_id = ?
         ORDER BY cs.sort_order",
    )?;
    let students = stmt
        .query_map([class_id], |r| {
            Ok(Student {
                id: r.get(0)?,
                full_name: r.get(1)?,
                created_at: r.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(students)
}

/// Removes the class with its enrollments, assignments and grades in one
/// transaction. Student rows are never touched.
pub fn delete_class(conn: &Connection, class_id: &str) -> Result<DeleteSummary> {
    require_class(conn, class_id)?;

    let tx = conn.unchecked_transaction()?;
    let mut removed = [0usize; CLASS_CASCADE.len()];
    for (slot, (table, sql)) in removed.iter_mut().zip(CLASS_CASCADE) {
        *slot = tx
            .execute(sql, [class_id])
            .map_err(|source| GradebookError::DeleteFailed { table, source })?;
    }
    // Dropping an uncommitted transaction rolls it back, so any early return
    // above leaves the class as it was.
    tx.commit()?;

    // Positions follow CLASS_CASCADE.
    let [grades, assignments, enrollments, _classes] = removed;
    let summary = DeleteSummary {
        grades,
        assignments,
        enrollments,
    };
    tracing::info!(
        %class_id,
        grades = summary.grades,
        assignments = summary.assignments,
        enrollments = summary.enrollments,
        "class deleted"
    );
    Ok(summary)
}
