//! Report command handler

use super::CliDashboard;
use std::fs;
use std::path::{Path, PathBuf};
use study_dashboard::config::Config;
use study_dashboard::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use study_dashboard::{info, verbose};

/// Render the dashboard report and write it to `output` or the reports directory
pub fn run(
    dashboard: &CliDashboard,
    format: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, String> {
    let format: ReportFormat = format.parse().map_err(|e| format!("✗ {e}"))?;
    let output_path = output.map_or_else(
        || PathBuf::from(&config.paths.reports_dir).join(format!("dashboard.{}", format.extension())),
        Path::to_path_buf,
    );

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            format!(
                "✗ Failed to create reports directory {}: {e}",
                parent.display()
            )
        })?;
    }

    let metrics = dashboard.metrics();
    let time_left = dashboard.time_left_display();
    let ctx = ReportContext::new(
        &metrics,
        &time_left,
        dashboard.program().info().end,
        dashboard.today(),
    );

    verbose!("Rendering {format} report to {}", output_path.display());
    let result = match format {
        ReportFormat::Markdown => MarkdownReporter::new().generate(&ctx, &output_path),
        ReportFormat::Html => HtmlReporter::new().generate(&ctx, &output_path),
    };
    result.map_err(|e| format!("✗ Failed to write report: {e}"))?;

    info!("Report written to {}", output_path.display());
    Ok(output_path)
}
