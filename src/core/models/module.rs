//! Module model

use super::ExamResult;
use crate::core::calendar::format_date;
use crate::core::store::ModuleRecord;
use crate::core::validity::is_value_valid;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a module.
///
/// `Open -> Completed` happens on a passing grade submission; nothing moves a module back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModuleStatus {
    /// Not yet passed
    #[default]
    #[serde(rename = "Offen")]
    Open,
    /// Passed and credited
    #[serde(rename = "Abgeschlossen")]
    Completed,
}

impl ModuleStatus {
    /// Label used in the persisted module table
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Open => "Offen",
            Self::Completed => "Abgeschlossen",
        }
    }
}

impl FromStr for ModuleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "offen" | "open" => Ok(Self::Open),
            "abgeschlossen" | "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown module status: '{s}'")),
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A unit of study worth a fixed number of ECTS credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module name, unique within the program
    pub name: String,

    /// Credit value
    pub ects: u32,

    status: ModuleStatus,

    performance: Option<ExamResult>,
}

impl Module {
    /// Create a module without a recorded performance
    #[must_use]
    pub const fn new(name: String, ects: u32, status: ModuleStatus) -> Self {
        Self {
            name,
            ects,
            status,
            performance: None,
        }
    }

    /// Create a module and record its initial performance, if the triple is complete
    #[must_use]
    pub fn with_performance(
        mut self,
        mark: Option<f64>,
        date: Option<NaiveDate>,
        passed: Option<bool>,
    ) -> Self {
        self.upsert_performance(mark, date, passed);
        self
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> ModuleStatus {
        self.status
    }

    /// Recorded performance, if any
    #[must_use]
    pub const fn performance(&self) -> Option<&ExamResult> {
        self.performance.as_ref()
    }

    /// Whether a passed performance is recorded
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.performance.is_some_and(|p| p.passed)
    }

    /// Set the status unconditionally; callers decide when a transition is allowed
    pub fn set_status(&mut self, status: ModuleStatus) {
        self.status = status;
    }

    /// Create or update the performance in place.
    ///
    /// If any of the three inputs is missing or invalid the performance is cleared.
    /// The status is left untouched either way.
    pub fn upsert_performance(
        &mut self,
        mark: Option<f64>,
        date: Option<NaiveDate>,
        passed: Option<bool>,
    ) {
        let valid = is_value_valid(&mark) && is_value_valid(&date) && is_value_valid(&passed);

        match (mark, date, passed) {
            (Some(mark), Some(date), Some(passed)) if valid => match self.performance.as_mut() {
                Some(existing) => existing.overwrite(mark, date, passed),
                None => self.performance = Some(ExamResult::new(mark, date, passed)),
            },
            _ => self.performance = None,
        }
    }

    /// Flatten into the persisted row shape.
    ///
    /// Without a performance, mark, date and passed flag are empty strings.
    #[must_use]
    pub fn to_record(&self) -> ModuleRecord {
        let (mark, date, passed) = self.performance.map_or_else(
            || (String::new(), String::new(), String::new()),
            |p| {
                (
                    format_mark(p.mark),
                    format_date(p.date),
                    if p.passed { "Ja" } else { "Nein" }.to_string(),
                )
            },
        );

        ModuleRecord {
            name: self.name.clone(),
            ects: self.ects,
            status: self.status.label().to_string(),
            mark,
            date,
            passed,
            semester: None,
        }
    }
}

/// Marks keep at least one decimal so `2.0` is not written as `2`
fn format_mark(mark: f64) -> String {
    if mark.fract() == 0.0 {
        format!("{mark:.1}")
    } else {
        mark.to_string()
    }
}
