use super::{class_students, new_id, require_class, require_enrolled};
use crate::calc::{sheet_average, Average};
use crate::error::{GradebookError, Result};
use crate::model::{Assignment, AssignmentGrade, GradeInput, NewAssignment, StudentAverage};
use crate::validate::{check_name, check_score, check_weight};
use rusqlite::Connection;
use std::collections::HashSet;

/// Creates an assignment in `class_id` and records the collected grade sheet with it.
///
/// Every row is validated before anything is written, and the writes share one
/// transaction: on any failure the class ends up with neither the assignment
/// nor any of its grades. Rows with `score: None` record nothing, so the
/// assignment simply doesn't count toward that student's average.
pub fn create_assignment(
    conn: &Connection,
    class_id: &str,
    new: &NewAssignment,
    grades: &[GradeInput],
) -> Result<Assignment> {
    let name = check_name("assignment", &new.name)?;
    let weight = check_weight(new.weight)?;
    require_class(conn, class_id)?;

    let mut seen: HashSet<&str> = HashSet::new();
    for g in grades {
        if !seen.insert(g.student_id.as_str()) {
            return Err(GradebookError::Conflict(format!(
                "more than one grade given for student {}",
                g.student_id
            )));
        }
        require_enrolled(conn, &g.student_id, class_id)?;
        if let Some(score) = g.score {
            check_score(score)?;
        }
    }

    let tx = conn.unchecked_transaction()?;
    let next: i64 = tx.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM assignments WHERE class_id = ?",
        [class_id],
        |r| r.get(0),
    )?;
    let assignment = Assignment {
        id: new_id(),
        class_id: class_id.to_string(),
        name,
        weight,
    };
    tx.execute(
        "INSERT INTO assignments(id, class_id, name, weight, sort_order) VALUES(?, ?, ?, ?, ?)",
        (
            &assignment.id,
            &assignment.class_id,
            &assignment.name,
            assignment.weight,
            next,
        ),
    )?;

    let mut graded = 0usize;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO grades(id, assignment_id, student_id, score) VALUES(?, ?, ?, ?)",
        )?;
        for g in grades {
            let Some(score) = g.score else {
                continue;
            };
            stmt.execute((new_id(), &assignment.id, &g.student_id, score))?;
            graded += 1;
        }
    }
    tx.commit()?;

    tracing::info!(
        %class_id,
        assignment_id = %assignment.id,
        name = %assignment.name,
        weight = assignment.weight,
        graded,
        "assignment created"
    );
    Ok(assignment)
}

/// Every assignment in the class, in creation order, with the student's score
/// or `None` where no grade was recorded.
pub fn student_grades(
    conn: &Connection,
    student_id: &str,
    class_id: &str,
) -> Result<Vec<AssignmentGrade>> {
    require_class(conn, class_id)?;
    require_enrolled(conn, student_id, class_id)?;

    let mut stmt = conn.prepare(
        "SELECT a.id, a.name, a.weight, g.score
         FROM assignments a
         LEFT JOIN grades g ON g.assignment_id = a.id AND g.student_id = ?
         WHERE a.class_id = ?
         ORDER BY a.sort_order",
    )?;
    let rows = stmt
        .query_map((student_id, class_id), |r| {
            Ok(AssignmentGrade {
                assignment_id: r.get(0)?,
                name: r.get(1)?,
                weight: r.get(2)?,
                score: r.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Weighted average of the student's recorded grades in the class.
/// Asking about a student who isn't enrolled is a caller bug and fails with
/// `NotEnrolled`.
pub fn student_average(conn: &Connection, student_id: &str, class_id: &str) -> Result<Average> {
    let sheet = student_grades(conn, student_id, class_id)?;
    Ok(sheet_average(&sheet))
}

/// Averages for the whole roster, in enrollment order.
pub fn class_averages(conn: &Connection, class_id: &str) -> Result<Vec<StudentAverage>> {
    class_students(conn, class_id)?
        .iter()
        .map(|s| -> Result<StudentAverage> {
            let average = student_average(conn, &s.id, class_id)?;
            Ok(StudentAverage::new(s, average))
        })
        .collect()
}
