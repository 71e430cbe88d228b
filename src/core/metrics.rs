//! Progress metrics and the sentinel values returned for degenerate cases

use crate::core::calendar::TimeLeft;
use crate::core::models::{ModuleStatus, Program};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to `places` decimals, ties to even.
///
/// Rounding works on the exact binary value, so `1.15` (stored just below the tie)
/// becomes `1.1` and the exact tie `3.125` becomes `3.12`.
#[must_use]
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Bounds and thresholds of the grading scale (lower marks are better)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingScale {
    /// Highest mark that still passes
    pub passing_threshold: f64,
    /// Average the "next required mark" aims for
    pub target_average: f64,
    /// Best mark on the scale
    pub best_mark: f64,
    /// Worst mark on the scale
    pub worst_mark: f64,
}

impl Default for GradingScale {
    fn default() -> Self {
        Self {
            passing_threshold: 4.0,
            target_average: 2.0,
            best_mark: 1.0,
            worst_mark: 6.0,
        }
    }
}

impl GradingScale {
    /// A mark passes when it does not exceed the threshold
    #[must_use]
    pub fn is_passing(&self, mark: f64) -> bool {
        mark <= self.passing_threshold
    }
}

/// Marks of passed performances.
///
/// `NoGradesYet` is distinct from an empty list so no caller can average over nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum AchievedGrades {
    /// No passed performance exists
    NoGradesYet,
    /// At least one mark, in module order
    Marks(Vec<f64>),
}

impl AchievedGrades {
    /// Wrap a list of marks, mapping an empty list to `NoGradesYet`
    #[must_use]
    pub fn from_marks(marks: Vec<f64>) -> Self {
        if marks.is_empty() {
            Self::NoGradesYet
        } else {
            Self::Marks(marks)
        }
    }
}

/// A mark, or the marker for "none available"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarkValue {
    /// A concrete mark
    Mark(f64),
    /// No mark recorded yet
    NoneAvailable,
}

impl fmt::Display for MarkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mark(mark) => write!(f, "{mark:.1}"),
            Self::NoneAvailable => f.write_str("Keine"),
        }
    }
}

/// Credits needed per remaining month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pacing {
    /// Credits per month, rounded to 2 decimals
    PerMonth(f64),
    /// No month left before the planned end
    DeadlineReached,
}

impl Pacing {
    /// Numeric view; `DeadlineReached` is positive infinity
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::PerMonth(value) => *value,
            Self::DeadlineReached => f64::INFINITY,
        }
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerMonth(value) => write!(f, "{value:.2}"),
            Self::DeadlineReached => f.write_str("∞"),
        }
    }
}

/// The mark the next exam needs, classified against the grading scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NextMark {
    /// A mark on the scale
    Required(f64),
    /// Even the worst mark keeps the target average
    Irrelevant,
    /// Even the best mark cannot reach the target average
    Unreachable,
}

impl NextMark {
    /// Classify a raw required mark: above the worst mark is irrelevant, below the best
    /// mark is unreachable
    #[must_use]
    pub fn classify(required: f64, grading: &GradingScale) -> Self {
        if required > grading.worst_mark {
            Self::Irrelevant
        } else if required < grading.best_mark {
            Self::Unreachable
        } else {
            Self::Required(required)
        }
    }
}

impl fmt::Display for NextMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(mark) => write!(f, "{mark:.1}"),
            Self::Irrelevant => f.write_str("Egal"),
            Self::Unreachable => f.write_str("Nicht möglich"),
        }
    }
}

/// Open/completed counts of one semester
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterProgress {
    /// Semester label
    pub designation: String,
    /// Modules still open
    pub open: usize,
    /// Modules completed
    pub completed: usize,
}

/// Every metric the dashboard shows, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Program name
    pub program_name: String,
    /// Awarded title
    pub program_title: String,
    /// ECTS reached so far
    pub reached_ects: u32,
    /// Credit target
    pub total_ects: u32,
    /// Reached share in percent
    pub progress_percent: f64,
    /// Average mark (0.0 without grades)
    pub gpa: f64,
    /// Best achieved mark
    pub best_mark: MarkValue,
    /// Worst achieved mark
    pub worst_mark: MarkValue,
    /// Mark the next exam needs
    pub next_mark: NextMark,
    /// Time until the planned end
    pub time_left: TimeLeft,
    /// Names of modules with status Open
    pub open_modules: Vec<String>,
    /// ECTS reached in the current month
    pub ects_this_month: u32,
    /// Credits needed per remaining month
    pub required_pace: Pacing,
    /// Per-semester module counts
    pub semesters: Vec<SemesterProgress>,
}

/// Compute all dashboard metrics for `program` as of `now`
#[must_use]
pub fn compute_all_metrics(program: &Program, now: NaiveDateTime) -> DashboardMetrics {
    let (best_mark, worst_mark) = program.best_worst_mark();
    let info = program.info();

    DashboardMetrics {
        program_name: info.name.clone(),
        program_title: info.title.clone(),
        reached_ects: program.reached_ects(),
        total_ects: program.total_ects(),
        progress_percent: program.ects_progress_percent(),
        gpa: program.gpa(),
        best_mark,
        worst_mark,
        next_mark: NextMark::classify(program.required_next_mark(), program.grading()),
        time_left: program.time_left(now),
        open_modules: open_module_names(program),
        ects_this_month: program.ects_this_month(now.date()),
        required_pace: program.required_ects_per_month(now),
        semesters: program
            .semesters()
            .iter()
            .map(|s| {
                let (open, completed) = s.progress();
                SemesterProgress {
                    designation: s.designation.clone(),
                    open,
                    completed,
                }
            })
            .collect(),
    }
}

/// Names of all modules whose status is Open, in program order
#[must_use]
pub fn open_module_names(program: &Program) -> Vec<String> {
    program
        .modules()
        .filter(|m| m.status() == ModuleStatus::Open)
        .map(|m| m.name.clone())
        .collect()
}
