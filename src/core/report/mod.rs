//! Dashboard report generation
//!
//! Renders the computed dashboard metrics into Markdown or HTML through embedded templates.

pub mod formats;

use crate::core::calendar::format_date;
use crate::core::metrics::DashboardMetrics;
use chrono::NaiveDate;
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
///
/// Everything a template needs, computed once before rendering.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Computed dashboard metrics
    pub metrics: &'a DashboardMetrics,
    /// Time left as display text (may be empty once the deadline passed)
    pub time_left: &'a str,
    /// Planned end of the program
    pub planned_end: NaiveDate,
    /// Date the metrics were computed for
    pub generated_on: NaiveDate,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(
        metrics: &'a DashboardMetrics,
        time_left: &'a str,
        planned_end: NaiveDate,
        generated_on: NaiveDate,
    ) -> Self {
        Self {
            metrics,
            time_left,
            planned_end,
            generated_on,
        }
    }

    /// Time left, with a dash once the deadline passed
    #[must_use]
    pub fn time_left_text(&self) -> &str {
        if self.time_left.is_empty() {
            "-"
        } else {
            self.time_left
        }
    }

    /// Every `{{placeholder}}` shared by all formats with its rendered value.
    ///
    /// Values are plain text; format-specific escaping happens in the reporter.
    #[must_use]
    pub fn scalar_values(&self) -> Vec<(&'static str, String)> {
        let m = self.metrics;
        vec![
            ("program_name", m.program_name.clone()),
            ("program_title", m.program_title.clone()),
            ("generated_on", format_date(self.generated_on)),
            ("planned_end", format_date(self.planned_end)),
            ("time_left", self.time_left_text().to_string()),
            ("reached_ects", m.reached_ects.to_string()),
            ("total_ects", m.total_ects.to_string()),
            ("progress_percent", format!("{:.2}", m.progress_percent)),
            ("ects_this_month", m.ects_this_month.to_string()),
            ("required_pace", m.required_pace.to_string()),
            ("gpa", format!("{:.1}", m.gpa)),
            ("best_mark", m.best_mark.to_string()),
            ("worst_mark", m.worst_mark.to_string()),
            ("next_mark", m.next_mark.to_string()),
            ("open_count", m.open_modules.len().to_string()),
        ]
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
