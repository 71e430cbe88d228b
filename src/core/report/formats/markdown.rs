//! Markdown report generator
//!
//! Renders the dashboard as Markdown tables, readable in any Markdown viewer.

use crate::core::report::{ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/dashboard.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        for (key, value) in ctx.scalar_values() {
            output = output.replace(&format!("{{{{{key}}}}}"), &escape_cell(&value));
        }

        output = output.replace("{{semester_table}}", &Self::semester_table(ctx));
        output = output.replace("{{open_modules}}", &Self::open_module_list(ctx));

        output
    }

    /// Per-semester open/completed counts
    fn semester_table(ctx: &ReportContext) -> String {
        let mut table = String::new();

        table.push_str("| Semester | Offen | Abgeschlossen |\n");
        table.push_str("|---|---|---|\n");
        for row in &ctx.metrics.semesters {
            let _ = writeln!(
                table,
                "| {} | {} | {} |",
                escape_cell(&row.designation),
                row.open,
                row.completed
            );
        }

        table
    }

    /// Bullet list of open modules
    fn open_module_list(ctx: &ReportContext) -> String {
        if ctx.metrics.open_modules.is_empty() {
            return "Alle Module abgeschlossen.\n".to_string();
        }

        let mut list = String::new();
        for name in &ctx.metrics.open_modules {
            let _ = writeln!(list, "- {name}");
        }
        list
    }
}

/// Keep a value from breaking a table row
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::fixtures;
    use chrono::NaiveDate;

    #[test]
    fn test_render_markdown() {
        let metrics = fixtures::metrics();
        let end = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let ctx = ReportContext::new(&metrics, "1 Jahr 3 Monate 12 Tage", end, today);

        let out = MarkdownReporter::new().render(&ctx).unwrap();

        assert!(out.starts_with("# Informatik (B.Sc.)"));
        assert!(out.contains("| Erreichte ECTS | 45 / 180 (25.00 %) |"));
        assert!(out.contains("| Verbleibende Zeit | 1 Jahr 3 Monate 12 Tage |"));
        assert!(out.contains("| 2. Semester | 2 | 4 |"));
        assert!(out.contains("- Recht & Ethik"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_all_completed_message() {
        let mut metrics = fixtures::metrics();
        metrics.open_modules.clear();
        let day = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let ctx = ReportContext::new(&metrics, "", day, day);

        let out = MarkdownReporter::new().render(&ctx).unwrap();
        assert!(out.contains("Alle Module abgeschlossen."));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dashboard.md");
        let metrics = fixtures::metrics();
        let day = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let ctx = ReportContext::new(&metrics, "", day, day);

        MarkdownReporter::new().generate(&ctx, &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Informatik"));
    }
}
