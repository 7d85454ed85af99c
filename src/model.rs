use serde::Serialize;

use crate::calc::Average;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub full_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    pub student_count: i64,
    pub assignment_count: i64,
}

/// A class together with its roster, in enrollment order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub class_id: String,
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub name: String,
    pub weight: f64,
}

/// One row of the grade sheet handed to `create_assignment`.
/// `score: None` means the student has no grade for this assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeInput {
    pub student_id: String,
    pub score: Option<f64>,
}

impl GradeInput {
    pub fn new(student_id: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            student_id: student_id.into(),
            score,
        }
    }
}

/// A student's view of one assignment. `score` is `None` when no grade was recorded,
/// which is different from a recorded 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentGrade {
    pub assignment_id: String,
    pub name: String,
    pub weight: f64,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAverage {
    pub student_id: String,
    pub full_name: String,
    pub average: Average,
    pub display: String,
}

impl StudentAverage {
    pub fn new(student: &Student, average: Average) -> Self {
        Self {
            student_id: student.id.clone(),
            full_name: student.full_name.clone(),
            display: average.display(),
            average,
        }
    }
}
