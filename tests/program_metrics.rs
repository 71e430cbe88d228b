//! Integration tests for progress metrics over a whole program

use chrono::NaiveDate;
use study_dashboard::core::calendar::start_of_day;
use study_dashboard::core::metrics::{compute_all_metrics, MarkValue, NextMark, Pacing};
use study_dashboard::core::models::{Module, ModuleStatus, Program, ProgramInfo};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn program(names: &[(&str, u32)]) -> Program {
    let info = ProgramInfo {
        name: "Wirtschaftsinformatik".to_string(),
        kind: "Bachelor".to_string(),
        title: "B.Sc.".to_string(),
        total_ects: 60,
        duration: "2 Semester".to_string(),
        start: date(2024, 10, 1),
        end: date(2025, 9, 30),
    };
    let mut program = Program::new(info, vec!["1. Semester".to_string()]).unwrap();
    for (name, ects) in names {
        program
            .assign_module(0, Module::new((*name).to_string(), *ects, ModuleStatus::Open))
            .unwrap();
    }
    program
}

#[test]
fn failed_attempts_never_add_credits() {
    let mut program = program(&[("A", 10), ("B", 20), ("C", 30)]);
    program
        .update_module_performance("A", 2.0, date(2025, 1, 10))
        .unwrap();
    let before = program.reached_ects();

    program
        .update_module_performance("B", 5.0, date(2025, 1, 11))
        .unwrap();
    program
        .update_module_performance("C", 4.1, date(2025, 1, 12))
        .unwrap();

    assert_eq!(before, 10);
    assert_eq!(program.reached_ects(), 10);
}

#[test]
fn progress_is_monotonic_as_modules_pass() {
    let mut program = program(&[("A", 10), ("B", 20), ("C", 30)]);
    let mut last = program.ects_progress_percent();

    for name in ["A", "B", "C"] {
        program
            .update_module_performance(name, 3.0, date(2025, 2, 1))
            .unwrap();
        let now = program.ects_progress_percent();
        assert!(now >= last, "{now} < {last} after passing {name}");
        last = now;
    }
    assert!((last - 100.0).abs() < f64::EPSILON);
}

#[test]
fn passing_threshold_is_inclusive() {
    let mut program = program(&[("A", 10), ("B", 10)]);
    let a = program
        .update_module_performance("A", 4.0, date(2025, 3, 1))
        .unwrap();
    assert!(a.is_passed());
    assert_eq!(a.status(), ModuleStatus::Completed);

    let b = program
        .update_module_performance("B", 4.1, date(2025, 3, 1))
        .unwrap();
    assert!(!b.is_passed());
    assert_eq!(b.status(), ModuleStatus::Open);
}

#[test]
fn resubmitting_same_grade_is_idempotent() {
    let mut once = program(&[("A", 10), ("B", 10)]);
    once.update_module_performance("A", 1.7, date(2025, 3, 1))
        .unwrap();

    let mut twice = once.clone();
    twice
        .update_module_performance("A", 1.7, date(2025, 3, 1))
        .unwrap();

    assert_eq!(once, twice);
}

#[test]
fn grade_statistics() {
    let mut program = program(&[("A", 10), ("B", 10), ("C", 10), ("D", 10)]);
    assert!(program.gpa().abs() < f64::EPSILON);
    assert_eq!(
        program.best_worst_mark(),
        (MarkValue::NoneAvailable, MarkValue::NoneAvailable)
    );
    assert!((program.required_next_mark() - 2.0).abs() < f64::EPSILON);

    for (name, mark) in [("A", 1.3), ("B", 2.7), ("C", 4.0)] {
        program
            .update_module_performance(name, mark, date(2025, 3, 1))
            .unwrap();
    }
    // Failed attempts do not count towards the average
    program
        .update_module_performance("D", 5.0, date(2025, 3, 1))
        .unwrap();

    assert_eq!(
        program.best_worst_mark(),
        (MarkValue::Mark(1.3), MarkValue::Mark(4.0))
    );
    // (1.3 + 2.7 + 4.0) / 3 = 2.666...
    assert!((program.gpa() - 2.7).abs() < 1e-9);
    // 2.0 * 4 - 8.0 = 0.0, below the best mark
    let metrics = compute_all_metrics(&program, start_of_day(date(2025, 3, 15)));
    assert_eq!(metrics.next_mark, NextMark::Unreachable);
}

#[test]
fn average_ties_round_to_even() {
    let mut pair = program(&[("A", 10), ("B", 10)]);
    pair.update_module_performance("A", 1.0, date(2025, 3, 1))
        .unwrap();
    pair.update_module_performance("B", 1.3, date(2025, 3, 1))
        .unwrap();
    // (1.0 + 1.3) / 2 is stored just below 1.15
    assert!((pair.gpa() - 1.1).abs() < f64::EPSILON);

    let mut four = program(&[("A", 10), ("B", 10), ("C", 10), ("D", 10)]);
    for (name, mark) in [("A", 2.0), ("B", 2.0), ("C", 2.0), ("D", 3.0)] {
        four.update_module_performance(name, mark, date(2025, 3, 1))
            .unwrap();
    }
    // 9.0 / 4 = 2.25 is an exact tie
    assert!((four.gpa() - 2.2).abs() < f64::EPSILON);
}

#[test]
fn pacing_over_the_program_lifetime() {
    let mut program = program(&[("A", 30), ("B", 30)]);
    program
        .update_module_performance("A", 2.0, date(2024, 12, 1))
        .unwrap();

    // 30.03.2025 -> 30.09.2025: exactly 6 months for 30 missing credits
    assert_eq!(
        program.required_ects_per_month(start_of_day(date(2025, 3, 30))),
        Pacing::PerMonth(5.0)
    );
    // 0 months, 10 days left: the partial month counts as one
    assert_eq!(
        program.required_ects_per_month(start_of_day(date(2025, 9, 20))),
        Pacing::PerMonth(30.0)
    );
    // Deadline day itself
    assert_eq!(
        program.required_ects_per_month(start_of_day(date(2025, 9, 30))),
        Pacing::DeadlineReached
    );
    assert!(program
        .required_ects_per_month(start_of_day(date(2025, 9, 30)))
        .value()
        .is_infinite());
    // The day before the deadline, once the day is under way
    let evening = date(2025, 9, 29).and_hms_opt(18, 0, 0).unwrap();
    assert_eq!(
        program.required_ects_per_month(evening),
        Pacing::DeadlineReached
    );
}
