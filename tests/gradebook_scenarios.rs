use gradebookd::calc::Average;
use gradebookd::model::{GradeInput, NewAssignment, Student};
use gradebookd::{db, store, ErrorKind, GradebookError};
use rusqlite::Connection;
use tempfile::TempDir;

fn workspace() -> (TempDir, Connection) {
    let dir = tempfile::tempdir().expect("temp dir");
    let conn = db::open_db(dir.path()).expect("open db");
    (dir, conn)
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })
    .expect("count")
}

fn quiz(name: &str, weight: f64) -> NewAssignment {
    NewAssignment {
        name: name.to_string(),
        weight,
    }
}

struct Math101 {
    class_id: String,
    alice: Student,
    bob: Student,
}

/// Math101 with Alice and Bob; Quiz1 (w=20) graded for both, Quiz2 (w=30) only for Alice.
fn math101(conn: &Connection) -> Math101 {
    let class = store::create_class(conn, "Math101").expect("create class");
    let alice = store::create_and_enroll(conn, "Alice", &class.id).expect("alice");
    let bob = store::create_and_enroll(conn, "Bob", &class.id).expect("bob");

    store::create_assignment(
        conn,
        &class.id,
        &quiz("Quiz1", 20.0),
        &[
            GradeInput::new(&alice.id, Some(90.0)),
            GradeInput::new(&bob.id, Some(70.0)),
        ],
    )
    .expect("quiz1");
    store::create_assignment(
        conn,
        &class.id,
        &quiz("Quiz2", 30.0),
        &[
            GradeInput::new(&alice.id, Some(80.0)),
            GradeInput::new(&bob.id, None),
        ],
    )
    .expect("quiz2");

    Math101 {
        class_id: class.id,
        alice,
        bob,
    }
}

#[test]
fn math101_averages_only_count_graded_assignments() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);

    let alice = store::student_average(&conn, &m.alice.id, &m.class_id).expect("alice avg");
    let bob = store::student_average(&conn, &m.bob.id, &m.class_id).expect("bob avg");

    assert!((alice.percent().unwrap() - 84.0).abs() < 1e-9);
    assert!((bob.percent().unwrap() - 70.0).abs() < 1e-9);
    assert_eq!(alice.display(), "84.00%");
    assert_eq!(bob.display(), "70.00%");

    let roster = store::class_averages(&conn, &m.class_id).expect("class averages");
    let names: Vec<&str> = roster.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob"]);
    assert_eq!(roster[1].display, "70.00%");
}

#[test]
fn grade_sheet_reports_missing_grades_as_none() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);

    let sheet = store::student_grades(&conn, &m.bob.id, &m.class_id).expect("sheet");
    let rows: Vec<(&str, f64, Option<f64>)> = sheet
        .iter()
        .map(|a| (a.name.as_str(), a.weight, a.score))
        .collect();
    assert_eq!(rows, [("Quiz1", 20.0, Some(70.0)), ("Quiz2", 30.0, None)]);
}

#[test]
fn deleting_math101_keeps_students_and_drops_grade_data() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);

    let removed = store::delete_class(&conn, &m.class_id).expect("delete");
    assert_eq!(removed.grades, 3);
    assert_eq!(removed.assignments, 2);
    assert_eq!(removed.enrollments, 2);

    let students = store::list_students(&conn).expect("students");
    let ids: Vec<&str> = students.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, [m.alice.id.as_str(), m.bob.id.as_str()]);

    assert_eq!(count(&conn, "classes"), 0);
    assert_eq!(count(&conn, "class_students"), 0);
    assert_eq!(count(&conn, "assignments"), 0);
    assert_eq!(count(&conn, "grades"), 0);
}

#[test]
fn deleting_a_class_leaves_other_memberships_alone() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);

    let science = store::create_class(&conn, "Science").expect("science");
    store::enroll_student(&conn, &m.alice.id, &science.id).expect("enroll alice");
    store::create_assignment(
        &conn,
        &science.id,
        &quiz("Lab1", 1.0),
        &[GradeInput::new(&m.alice.id, Some(65.5))],
    )
    .expect("lab1");

    store::delete_class(&conn, &m.class_id).expect("delete math");

    let class = store::get_class(&conn, &science.id).expect("science still there");
    assert!(class.students.iter().any(|s| s.id == m.alice.id));
    assert_eq!(
        store::student_average(&conn, &m.alice.id, &science.id).expect("avg"),
        Average::Percent(65.5)
    );
    assert_eq!(count(&conn, "assignments"), 1);
    assert_eq!(count(&conn, "grades"), 1);
}

#[test]
fn enrolling_twice_is_a_conflict_and_changes_nothing() {
    let (_dir, conn) = workspace();
    let class = store::create_class(&conn, "Math101").expect("class");
    let alice = store::insert_student(&conn, "Alice").expect("alice");

    store::enroll_student(&conn, &alice.id, &class.id).expect("first enroll");
    let e = store::enroll_student(&conn, &alice.id, &class.id).expect_err("second enroll");

    assert!(matches!(e, GradebookError::Conflict(_)));
    assert_eq!(e.kind(), ErrorKind::Validation);
    assert_eq!(e.to_string(), "Student Alice already exists in this class.");
    assert_eq!(store::class_students(&conn, &class.id).unwrap().len(), 1);
}

#[test]
fn inserted_student_reads_back_exactly_once() {
    let (_dir, conn) = workspace();
    store::insert_student(&conn, "Alice").expect("alice");
    let carol = store::insert_student(&conn, "  Carol Diaz ").expect("carol");
    assert_eq!(carol.full_name, "Carol Diaz");

    let all = store::list_students(&conn).expect("list");
    let hits: Vec<&Student> = all.iter().filter(|s| s.id == carol.id).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], &carol);
    assert_eq!(store::get_student(&conn, &carol.id).unwrap(), carol);
}

#[test]
fn empty_student_name_is_rejected() {
    let (_dir, conn) = workspace();
    let e = store::insert_student(&conn, "   ").expect_err("empty name");
    assert_eq!(e.code(), "bad_params");
    assert_eq!(count(&conn, "students"), 0);
}

#[test]
fn reopening_a_workspace_keeps_existing_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let class_id = {
        let conn = db::open_db(dir.path()).expect("first open");
        let class = store::create_class(&conn, "History").expect("class");
        store::create_and_enroll(&conn, "Dana", &class.id).expect("dana");
        class.id
    };

    let conn = db::open_db(dir.path()).expect("second open");
    db::create_tables(&conn).expect("create tables again");
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table'
               AND name IN ('students', 'classes', 'class_students', 'assignments', 'grades')",
            [],
            |r| r.get(0),
        )
        .expect("schema");
    assert_eq!(tables, 5);

    let class = store::get_class(&conn, &class_id).expect("class survives");
    assert_eq!(class.name, "History");
    assert_eq!(class.students.len(), 1);
}

#[test]
fn student_without_grades_has_no_average_rather_than_zero() {
    let (_dir, conn) = workspace();
    let class = store::create_class(&conn, "Art").expect("class");
    let eve = store::create_and_enroll(&conn, "Eve", &class.id).expect("eve");

    assert_eq!(
        store::student_average(&conn, &eve.id, &class.id).unwrap(),
        Average::NoGrades
    );

    store::create_assignment(
        &conn,
        &class.id,
        &quiz("Sketch", 10.0),
        &[GradeInput::new(&eve.id, None)],
    )
    .expect("ungraded assignment");
    let avg = store::student_average(&conn, &eve.id, &class.id).unwrap();
    assert_eq!(avg, Average::NoGrades);
    assert_eq!(avg.display(), "no grades");
}

#[test]
fn average_for_student_outside_the_class_is_an_invariant_violation() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);
    let outsider = store::insert_student(&conn, "Mallory").expect("outsider");

    let e = store::student_average(&conn, &outsider.id, &m.class_id).expect_err("not enrolled");
    assert_eq!(e.kind(), ErrorKind::Invariant);
    assert_eq!(e.code(), "invariant_violation");
}

#[test]
fn rejected_assignment_leaves_no_rows_behind() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);
    let outsider = store::insert_student(&conn, "Mallory").expect("outsider");
    let before = (count(&conn, "assignments"), count(&conn, "grades"));

    // A grade for someone outside the class.
    let e = store::create_assignment(
        &conn,
        &m.class_id,
        &quiz("Quiz3", 10.0),
        &[
            GradeInput::new(&m.alice.id, Some(50.0)),
            GradeInput::new(&outsider.id, Some(60.0)),
        ],
    )
    .expect_err("outsider grade");
    assert_eq!(e.kind(), ErrorKind::Invariant);

    // Out-of-range score.
    let e = store::create_assignment(
        &conn,
        &m.class_id,
        &quiz("Quiz3", 10.0),
        &[GradeInput::new(&m.bob.id, Some(120.0))],
    )
    .expect_err("score over 100");
    assert_eq!(e.code(), "bad_params");

    // Two grades for the same student.
    let e = store::create_assignment(
        &conn,
        &m.class_id,
        &quiz("Quiz3", 10.0),
        &[
            GradeInput::new(&m.bob.id, Some(10.0)),
            GradeInput::new(&m.bob.id, Some(20.0)),
        ],
    )
    .expect_err("duplicate grade");
    assert_eq!(e.code(), "conflict");

    // Non-positive weight.
    let e = store::create_assignment(&conn, &m.class_id, &quiz("Quiz3", 0.0), &[])
        .expect_err("zero weight");
    assert_eq!(e.code(), "bad_params");

    assert_eq!(
        (count(&conn, "assignments"), count(&conn, "grades")),
        before
    );
}

#[test]
fn unknown_class_is_not_found() {
    let (_dir, conn) = workspace();
    let e = store::delete_class(&conn, "no-such-class").expect_err("missing");
    assert!(matches!(e, GradebookError::NotFound { what: "class", .. }));
    assert!(store::get_class(&conn, "no-such-class").is_err());
}

#[test]
fn class_list_counts_students_and_assignments() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);
    store::create_class(&conn, "Empty").expect("empty class");

    let classes = store::list_classes(&conn).expect("list");
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].id, m.class_id);
    assert_eq!(classes[0].student_count, 2);
    assert_eq!(classes[0].assignment_count, 2);
    assert_eq!(classes[1].name, "Empty");
    assert_eq!(classes[1].student_count, 0);
}

fn row_counts(conn: &Connection) -> [i64; 4] {
    [
        count(conn, "classes"),
        count(conn, "class_students"),
        count(conn, "assignments"),
        count(conn, "grades"),
    ]
}

#[test]
fn failed_cascade_step_rolls_back_the_whole_delete() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);
    // Grades and assignments go first; make the enrollment step fail after them.
    conn.execute_batch(
        "CREATE TRIGGER block_enrollment_delete BEFORE DELETE ON class_students
         BEGIN SELECT RAISE(ABORT, 'enrollments are locked'); END;",
    )
    .expect("trigger");
    let before = row_counts(&conn);

    let e = store::delete_class(&conn, &m.class_id).expect_err("locked enrollments");
    assert!(matches!(
        e,
        GradebookError::DeleteFailed {
            table: "class_students",
            ..
        }
    ));
    assert_eq!(e.code(), "db_delete_failed");
    assert_eq!(e.kind(), ErrorKind::Persistence);
    assert_eq!(e.details()["table"], "class_students");

    assert_eq!(row_counts(&conn), before);
    let alice = store::student_average(&conn, &m.alice.id, &m.class_id).expect("still graded");
    assert_eq!(alice.display(), "84.00%");
}

#[test]
fn failed_grade_insert_drops_the_new_assignment_too() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);
    // Alice's row goes in first; Bob's score trips the trigger.
    conn.execute_batch(
        "CREATE TRIGGER reject_score_55 BEFORE INSERT ON grades
         WHEN NEW.score = 55
         BEGIN SELECT RAISE(ABORT, 'score rejected'); END;",
    )
    .expect("trigger");
    let before = row_counts(&conn);

    let e = store::create_assignment(
        &conn,
        &m.class_id,
        &quiz("Quiz3", 10.0),
        &[
            GradeInput::new(&m.alice.id, Some(95.0)),
            GradeInput::new(&m.bob.id, Some(55.0)),
        ],
    )
    .expect_err("grade insert fails");
    assert_eq!(e.kind(), ErrorKind::Persistence);
    assert_eq!(e.code(), "db_error");

    assert_eq!(row_counts(&conn), before);
    let names: Vec<String> = store::student_grades(&conn, &m.alice.id, &m.class_id)
        .expect("sheet")
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Quiz1", "Quiz2"]);
}

#[test]
fn huge_weight_is_rejected_before_anything_is_written() {
    let (_dir, conn) = workspace();
    let m = math101(&conn);
    let before = row_counts(&conn);

    let e = store::create_assignment(
        &conn,
        &m.class_id,
        &quiz("Final", 1e308),
        &[GradeInput::new(&m.alice.id, Some(90.0))],
    )
    .expect_err("weight too large");
    assert_eq!(e.code(), "bad_params");
    assert_eq!(row_counts(&conn), before);

    let alice = store::student_average(&conn, &m.alice.id, &m.class_id).expect("avg");
    assert_eq!(alice.display(), "84.00%");
}
