//! Exam result model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one completed assessment.
///
/// `passed` is decided by the owning module when the result is recorded and is never
/// recomputed from `mark` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    /// Mark on the 1.0 (best) to 6.0 (worst) scale
    pub mark: f64,

    /// Date of the assessment
    pub date: NaiveDate,

    /// Whether the assessment counts as passed
    pub passed: bool,
}

impl ExamResult {
    /// Create a new exam result
    #[must_use]
    pub const fn new(mark: f64, date: NaiveDate, passed: bool) -> Self {
        Self { mark, date, passed }
    }

    /// Replace all three fields at once
    pub fn overwrite(&mut self, mark: f64, date: NaiveDate, passed: bool) {
        self.mark = mark;
        self.date = date;
        self.passed = passed;
    }
}
