use serde::{Serialize, Serializer};

use crate::model::AssignmentGrade;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    pub weight: f64,
    pub score: f64,
}

/// A student's weighted average for a class, on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Percent(f64),
    /// No graded assignments; there is nothing to average.
    NoGrades,
}

impl Average {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Average::Percent(v) => Some(*v),
            Average::NoGrades => None,
        }
    }

    /// `84.00%`, or `no grades`.
    pub fn display(&self) -> String {
        match self {
            Average::Percent(v) => format!("{:.2}%", v),
            Average::NoGrades => "no grades".to_string(),
        }
    }
}

// On the wire an average is a number or null.
impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.percent().serialize(serializer)
    }
}

/// Σ(weight·score) / Σweight over the given graded entries.
///
/// Weights are scaled by the largest one first, so huge weights cannot
/// overflow the sums.
pub fn weighted_average<I>(entries: I) -> Average
where
    I: IntoIterator<Item = WeightedScore>,
{
    let entries: Vec<WeightedScore> = entries.into_iter().collect();
    let max_weight = entries.iter().map(|e| e.weight).fold(0.0_f64, f64::max);
    if entries.is_empty() || !max_weight.is_finite() || max_weight <= 0.0 {
        return Average::NoGrades;
    }

    let mut sum_weight: f64 = 0.0;
    let mut sum_weighted: f64 = 0.0;
    for e in &entries {
        let w = e.weight / max_weight;
        sum_weight += w;
        sum_weighted += w * e.score;
    }
    Average::Percent(sum_weighted / sum_weight)
}

/// Average over a student's grade sheet. Assignments without a recorded score
/// drop out of both sums.
pub fn sheet_average(sheet: &[AssignmentGrade]) -> Average {
    weighted_average(sheet.iter().filter_map(|a| {
        a.score.map(|score| WeightedScore {
            weight: a.weight,
            score,
        })
    }))
}
