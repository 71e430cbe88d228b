//! HTML report generator
//!
//! Generates a self-contained HTML dashboard page with embedded CSS.

use crate::core::report::{ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = HTML_TEMPLATE.to_string();

        for (key, value) in ctx.scalar_values() {
            output = output.replace(&format!("{{{{{key}}}}}"), &escape_html(&value));
        }

        let width = ctx.metrics.progress_percent.clamp(0.0, 100.0);
        output = output.replace("{{progress_width}}", &format!("{width:.0}"));
        output = output.replace("{{semester_rows}}", &Self::semester_rows(ctx));
        output = output.replace("{{open_modules}}", &Self::open_module_list(ctx));

        output
    }

    /// One table row per semester
    fn semester_rows(ctx: &ReportContext) -> String {
        let mut rows = String::new();
        for row in &ctx.metrics.semesters {
            let _ = writeln!(
                rows,
                "  <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.designation),
                row.open,
                row.completed
            );
        }
        rows
    }

    /// Open modules as an unordered list
    fn open_module_list(ctx: &ReportContext) -> String {
        if ctx.metrics.open_modules.is_empty() {
            return "<p>Alle Module abgeschlossen.</p>".to_string();
        }

        let mut html = String::from("<ul>\n");
        for name in &ctx.metrics.open_modules {
            let _ = writeln!(html, "  <li>{}</li>", escape_html(name));
        }
        html.push_str("</ul>");
        html
    }
}

/// Escape text for use in element content and attribute values
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}
