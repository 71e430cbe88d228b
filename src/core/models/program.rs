//! Program (course of study) model and the progress computations over it

use super::{Module, ModuleStatus, Semester};
use crate::core::calendar::TimeLeft;
use crate::core::metrics::{round_to, AchievedGrades, GradingScale, MarkValue, Pacing};
use crate::debug;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by program construction and updates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// The credit target must be positive for progress percentages to exist
    #[error("total ECTS must be greater than zero")]
    ZeroTotalEcts,

    /// No module carries the requested name
    #[error("no module named '{0}'")]
    UnknownModule(String),

    /// A semester index outside the program's semesters
    #[error("semester index {index} out of range ({count} semesters)")]
    SemesterOutOfRange {
        /// Requested index (0-based)
        index: usize,
        /// Number of semesters in the program
        count: usize,
    },
}

/// Identity fields of a program, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    /// Program name (e.g., "Informatik")
    pub name: String,

    /// Program type (e.g., "Bachelor")
    pub kind: String,

    /// Awarded title (e.g., "B.Sc.")
    pub title: String,

    /// Credit target for graduation
    pub total_ects: u32,

    /// Nominal duration as written in the source data (e.g., "6 Semester")
    pub duration: String,

    /// Program start
    pub start: NaiveDate,

    /// Planned end; every pacing calculation counts towards this date
    pub end: NaiveDate,
}

/// A complete program: identity, semesters and the grading scale used for metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    info: ProgramInfo,
    semesters: Vec<Semester>,
    grading: GradingScale,
}

impl Program {
    /// Create a program with one empty semester per designation.
    ///
    /// # Errors
    /// Returns [`ProgramError::ZeroTotalEcts`] if `info.total_ects` is zero.
    pub fn new(info: ProgramInfo, designations: Vec<String>) -> Result<Self, ProgramError> {
        if info.total_ects == 0 {
            return Err(ProgramError::ZeroTotalEcts);
        }
        Ok(Self {
            info,
            semesters: designations.into_iter().map(Semester::new).collect(),
            grading: GradingScale::default(),
        })
    }

    /// Replace the grading scale
    #[must_use]
    pub const fn with_grading(mut self, grading: GradingScale) -> Self {
        self.grading = grading;
        self
    }

    /// Identity fields
    #[must_use]
    pub const fn info(&self) -> &ProgramInfo {
        &self.info
    }

    /// Grading scale in use
    #[must_use]
    pub const fn grading(&self) -> &GradingScale {
        &self.grading
    }

    /// Credit target
    #[must_use]
    pub const fn total_ects(&self) -> u32 {
        self.info.total_ects
    }

    /// Semesters in order
    #[must_use]
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Append a module to the semester at `index` (0-based)
    ///
    /// # Errors
    /// Returns [`ProgramError::SemesterOutOfRange`] for an unknown index.
    pub fn assign_module(&mut self, index: usize, module: Module) -> Result<(), ProgramError> {
        let count = self.semesters.len();
        let semester = self
            .semesters
            .get_mut(index)
            .ok_or(ProgramError::SemesterOutOfRange { index, count })?;
        semester.add_module(module);
        Ok(())
    }

    /// All modules across semesters, in semester then assignment order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.semesters.iter().flat_map(Semester::modules)
    }

    fn passed_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules().filter(|m| m.is_passed())
    }

    /// Sum of ECTS over modules with a passed performance
    #[must_use]
    pub fn reached_ects(&self) -> u32 {
        self.passed_modules().map(|m| m.ects).sum()
    }

    /// Reached share of the credit target in percent, rounded to 2 decimals
    #[must_use]
    pub fn ects_progress_percent(&self) -> f64 {
        let reached = f64::from(self.reached_ects());
        let total = f64::from(self.info.total_ects);
        round_to(reached / total * 100.0, 2)
    }

    /// Calendar difference from `now` until the start of the planned end day
    #[must_use]
    pub fn time_left(&self, now: NaiveDateTime) -> TimeLeft {
        TimeLeft::until(now, self.info.end)
    }

    /// Credits still needed per remaining month.
    ///
    /// A partial month counts as a full one. Once no month is left the pace is
    /// [`Pacing::DeadlineReached`].
    #[must_use]
    pub fn required_ects_per_month(&self, now: NaiveDateTime) -> Pacing {
        let missing = i64::from(self.info.total_ects) - i64::from(self.reached_ects());
        let left = self.time_left(now);

        let mut months = left.whole_months();
        if left.days > 0 {
            months += 1;
        }
        debug!("Pacing: {missing} ECTS missing over {months} month(s) ({left})");

        if months <= 0 {
            return Pacing::DeadlineReached;
        }
        #[allow(clippy::cast_precision_loss)]
        let per_month = missing as f64 / f64::from(months);
        Pacing::PerMonth(round_to(per_month, 2))
    }

    /// ECTS of passed modules whose result date falls in the month of `today`
    #[must_use]
    pub fn ects_this_month(&self, today: NaiveDate) -> u32 {
        self.modules()
            .filter_map(|m| m.performance().filter(|p| p.passed).map(|p| (m.ects, p.date)))
            .filter(|(_, date)| date.year() == today.year() && date.month() == today.month())
            .map(|(ects, _)| ects)
            .sum()
    }

    /// Marks of every passed performance, or [`AchievedGrades::NoGradesYet`]
    #[must_use]
    pub fn achieved_grades(&self) -> AchievedGrades {
        let marks: Vec<f64> = self
            .passed_modules()
            .filter_map(Module::performance)
            .map(|p| p.mark)
            .collect();
        AchievedGrades::from_marks(marks)
    }

    /// Mean of achieved marks rounded to 1 decimal; `0.0` when none exist
    #[must_use]
    pub fn gpa(&self) -> f64 {
        match self.achieved_grades() {
            AchievedGrades::NoGradesYet => 0.0,
            AchievedGrades::Marks(marks) => {
                #[allow(clippy::cast_precision_loss)]
                let count = marks.len() as f64;
                round_to(marks.iter().sum::<f64>() / count, 1)
            }
        }
    }

    /// `(best, worst)` achieved mark; the best mark is the numerically lowest
    #[must_use]
    pub fn best_worst_mark(&self) -> (MarkValue, MarkValue) {
        match self.achieved_grades() {
            AchievedGrades::NoGradesYet => (MarkValue::NoneAvailable, MarkValue::NoneAvailable),
            AchievedGrades::Marks(marks) => {
                let best = marks.iter().copied().fold(f64::INFINITY, f64::min);
                let worst = marks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (
                    MarkValue::Mark(round_to(best, 1)),
                    MarkValue::Mark(round_to(worst, 1)),
                )
            }
        }
    }

    /// Mark the next exam needs so the average lands on the target average.
    ///
    /// Solves `(sum + x) / (count + 1) = target`. With no marks yet the target itself is
    /// returned. The result is continuous and may fall outside the grading scale.
    #[must_use]
    pub fn required_next_mark(&self) -> f64 {
        let target = self.grading.target_average;
        match self.achieved_grades() {
            AchievedGrades::NoGradesYet => target,
            AchievedGrades::Marks(marks) => {
                #[allow(clippy::cast_precision_loss)]
                let count = marks.len() as f64;
                let sum: f64 = marks.iter().sum();
                round_to(target * (count + 1.0) - sum, 1)
            }
        }
    }

    /// Record a grade for the first module named `name`.
    ///
    /// The result is passed when `mark` does not exceed the passing threshold. Only a pass
    /// moves the module to [`ModuleStatus::Completed`]; a later failing grade leaves the
    /// status as it was.
    ///
    /// # Errors
    /// Returns [`ProgramError::UnknownModule`] when no module matches `name`.
    pub fn update_module_performance(
        &mut self,
        name: &str,
        mark: f64,
        date: NaiveDate,
    ) -> Result<&Module, ProgramError> {
        let passed = self.grading.is_passing(mark);
        let module = self
            .semesters
            .iter_mut()
            .flat_map(Semester::modules_mut)
            .find(|m| m.name == name)
            .ok_or_else(|| ProgramError::UnknownModule(name.to_string()))?;

        module.upsert_performance(Some(mark), Some(date), Some(passed));
        if passed {
            module.set_status(ModuleStatus::Completed);
        }
        Ok(module)
    }
}
