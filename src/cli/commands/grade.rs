//! Grade command handler
//!
//! Input is validated here so the core only ever sees a finite mark and a real date.

use super::CliDashboard;
use chrono::NaiveDate;
use study_dashboard::core::calendar::{format_date, DATE_FORMAT};
use study_dashboard::core::models::ModuleStatus;

/// Parse a mark, accepting a decimal comma
pub fn parse_mark(value: &str) -> Result<f64, String> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|mark| mark.is_finite())
        .ok_or_else(|| format!("✗ Ungültige Note: '{value}'"))
}

/// Parse a strict `DD.MM.YYYY` date
pub fn parse_exam_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("✗ Ungültiges Datum: '{value}' (erwartet TT.MM.JJJJ)"))
}

/// Validate the input, submit the grade and report the outcome
pub fn run(dashboard: &mut CliDashboard, module: &str, mark: &str, date: &str) -> Result<(), String> {
    let mark = parse_mark(mark)?;
    let date = parse_exam_date(date)?;

    dashboard
        .submit_grade(module, mark, date)
        .map_err(|e| format!("✗ {e}"))?;

    let status = dashboard
        .program()
        .modules()
        .find(|m| m.name == module)
        .map_or(ModuleStatus::Open, |m| m.status());
    println!(
        "✓ {module}: {mark:.1} am {} gespeichert ({status})",
        format_date(date)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mark() {
        assert_eq!(parse_mark("1,7"), Ok(1.7));
        assert_eq!(parse_mark(" 2.3 "), Ok(2.3));
        assert!(parse_mark("gut").is_err());
        assert!(parse_mark("NaN").is_err());
        assert!(parse_mark("").is_err());
    }

    #[test]
    fn test_parse_exam_date() {
        assert_eq!(
            parse_exam_date("12.02.2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 12).unwrap())
        );
        assert!(parse_exam_date("2024-02-12").is_err());
        assert!(parse_exam_date("30.02.2024").is_err());
    }
}
