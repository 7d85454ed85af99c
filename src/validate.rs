use crate::error::{GradebookError, Result};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;
pub const MAX_WEIGHT: f64 = 1_000_000.0;

/// Parse user-typed weight text. Accepts anything `f64` parses, as long as the
/// result is finite, strictly positive and no larger than `MAX_WEIGHT`.
pub fn parse_weight(raw: &str) -> Result<f64> {
    let t = raw.trim();
    let w: f64 = t.parse().map_err(|_| {
        GradebookError::validation(format!("weight must be a number, got {:?}", raw))
    })?;
    check_weight(w)
}

pub fn check_weight(w: f64) -> Result<f64> {
    if !w.is_finite() || w <= 0.0 {
        return Err(GradebookError::validation(format!(
            "weight must be a positive number, got {}",
            w
        )));
    }
    if w > MAX_WEIGHT {
        return Err(GradebookError::validation(format!(
            "weight must be at most {}, got {}",
            MAX_WEIGHT, w
        )));
    }
    Ok(w)
}

pub fn check_score(score: f64) -> Result<f64> {
    if !score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(GradebookError::validation(format!(
            "score must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, score
        )));
    }
    Ok(score)
}

/// Trimmed, non-empty name. `kind` only feeds the error message.
pub fn check_name(kind: &str, raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GradebookError::validation(format!(
            "{} name must not be empty",
            kind
        )));
    }
    Ok(name.to_string())
}
