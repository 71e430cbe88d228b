//! Status and open-module command handlers

use super::CliDashboard;
use study_dashboard::core::calendar::format_date;
use study_dashboard::core::metrics::DashboardMetrics;
use study_dashboard::verbose;

/// Print the full dashboard
pub fn run(dashboard: &CliDashboard) {
    let metrics = dashboard.metrics();
    let info = dashboard.program().info();
    verbose!("Computing dashboard for {}", format_date(dashboard.today()));

    println!(
        "\n=== {} {} ({}) ===\n",
        info.kind, metrics.program_name, metrics.program_title
    );
    print_progress(&metrics);

    println!("\n--- Zeit ---");
    row("Start", &format_date(info.start));
    row("Geplantes Ende", &format_date(info.end));
    let left = dashboard.time_left_display();
    row("Verbleibend", if left.is_empty() { "-" } else { &left });

    println!("\n--- Noten ---");
    row("Durchschnitt", &format!("{:.1}", metrics.gpa));
    row("Beste Note", &metrics.best_mark.to_string());
    row("Schlechteste Note", &metrics.worst_mark.to_string());
    row("Nächste Note", &dashboard.next_mark_setting().to_string());

    println!("\n--- Semester ---");
    println!("  {:<20} {:>6} {:>14}", "Semester", "Offen", "Abgeschlossen");
    for index in 0..dashboard.semester_count() {
        if let (Some(name), Some((open, completed))) = (
            dashboard.semester_designation(index),
            dashboard.semester_progress(index),
        ) {
            println!("  {name:<20} {open:>6} {completed:>14}");
        }
    }
    println!();
}

/// Print the names of open modules, one per line
pub fn run_open(dashboard: &CliDashboard) {
    let names = dashboard.open_module_names();
    if names.is_empty() {
        println!("✓ Alle Module abgeschlossen");
        return;
    }
    for name in names {
        println!("{name}");
    }
}

fn print_progress(metrics: &DashboardMetrics) {
    println!("--- Fortschritt ---");
    row(
        "ECTS",
        &format!(
            "{} / {} ({:.2} %)",
            metrics.reached_ects, metrics.total_ects, metrics.progress_percent
        ),
    );
    row("ECTS diesen Monat", &metrics.ects_this_month.to_string());
    row("ECTS pro Monat nötig", &metrics.required_pace.to_string());
    row("Offene Module", &metrics.open_modules.len().to_string());
}

fn row(label: &str, value: &str) {
    println!("  {label:<22} {value}");
}
