//! End-to-end tests: load the CSV tables, submit grades, reload from disk

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use study_dashboard::core::bootstrap::{BootstrapError, DataPaths};
use study_dashboard::core::calendar::FixedClock;
use study_dashboard::core::dashboard::{Dashboard, DashboardError};
use study_dashboard::core::metrics::{GradingScale, MarkValue, Pacing};
use study_dashboard::core::models::ProgramError;
use study_dashboard::core::store::{CsvModuleStore, ModuleStore};
use tempfile::TempDir;

const PROGRAM: &str = "Name,Art,Titel,Gesamt_ECTS,Dauer,Start,Ende\n\
                       Informatik,Bachelor,B.Sc.,30,2 Semester,01.10.2024,30.09.2025\n";
const SEMESTERS: &str = "Bezeichnung\n1. Semester\n2. Semester\n";
const MODULES: &str = "Name,ECTS,Status,Note,Datum,Bestanden\n\
                       Mathematik I,5,Abgeschlossen,1.7,12.02.2025,Ja\n\
                       Programmierung,10,Offen,,,\n\
                       Statistik,5,Offen,5.0,20.02.2025,Nein\n\
                       Datenbanken,10,Offen,,,\n";

fn setup(modules: &str) -> (TempDir, DataPaths) {
    let dir = TempDir::new().unwrap();
    let paths = DataPaths {
        program: dir.path().join("course_of_study.csv"),
        semesters: dir.path().join("semester.csv"),
        modules: dir.path().join("modules.csv"),
    };
    fs::write(&paths.program, PROGRAM).unwrap();
    fs::write(&paths.semesters, SEMESTERS).unwrap();
    fs::write(&paths.modules, modules).unwrap();
    (dir, paths)
}

fn open(
    paths: &DataPaths,
    today: NaiveDate,
) -> Result<Dashboard<CsvModuleStore, FixedClock>, BootstrapError> {
    Dashboard::open(
        paths,
        CsvModuleStore::new(&paths.modules),
        FixedClock::on(today),
        &[2, 2],
        GradingScale::default(),
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn loads_tables_into_dashboard() {
    let (_dir, paths) = setup(MODULES);
    let dash = open(&paths, date(2025, 2, 28)).unwrap();

    assert_eq!(dash.semester_count(), 2);
    assert_eq!(dash.semester_progress(0), Some((1, 1)));
    assert_eq!(dash.semester_progress(1), Some((2, 0)));
    assert_eq!(
        dash.open_module_names(),
        vec!["Programmierung", "Statistik", "Datenbanken"]
    );

    let metrics = dash.metrics();
    assert_eq!(metrics.reached_ects, 5);
    assert!((metrics.progress_percent - 16.67).abs() < 1e-9);
    assert_eq!(metrics.best_mark, MarkValue::Mark(1.7));
    assert_eq!(metrics.ects_this_month, 5);
    // 28.02 -> 30.09 is 7 months and 2 days: 25 / 8 = 3.125, a tie rounded to even
    assert_eq!(metrics.required_pace, Pacing::PerMonth(3.12));
    assert_eq!(dash.time_left_display(), "7 Monate 2 Tage");
}

#[test]
fn deadline_tomorrow_afternoon_has_no_month_left() {
    let (_dir, paths) = setup(MODULES);
    let dash = Dashboard::open(
        &paths,
        CsvModuleStore::new(&paths.modules),
        FixedClock(date(2025, 9, 29).and_hms_opt(16, 45, 0).unwrap()),
        &[2, 2],
        GradingScale::default(),
    )
    .unwrap();

    assert_eq!(dash.metrics().required_pace, Pacing::DeadlineReached);
    assert_eq!(dash.time_left_display(), "");
}

#[test]
fn submitted_grade_survives_reload() {
    let (_dir, paths) = setup(MODULES);
    let mut dash = open(&paths, date(2025, 3, 1)).unwrap();
    dash.submit_grade("Datenbanken", 2.3, date(2025, 3, 1))
        .unwrap();

    let reloaded = open(&paths, date(2025, 3, 1)).unwrap();
    assert_eq!(reloaded.program(), dash.program());
    assert_eq!(reloaded.metrics().reached_ects, 15);
    assert_eq!(reloaded.semester_progress(1), Some((1, 1)));

    let written = fs::read_to_string(&paths.modules).unwrap();
    assert!(written.contains("Datenbanken,10,Abgeschlossen,2.3,01.03.2025,Ja"));
    assert!(written.contains("Programmierung,10,Offen,,,"));
}

#[test]
fn round_trip_preserves_every_module_tuple() {
    let (_dir, paths) = setup(MODULES);
    let dash = open(&paths, date(2025, 3, 1)).unwrap();
    let store = CsvModuleStore::new(&paths.modules);

    store.save_modules(&dash.records()).unwrap();
    let reloaded = open(&paths, date(2025, 3, 1)).unwrap();

    assert_eq!(reloaded.records(), dash.records());
}

#[test]
fn semester_column_overrides_layout_and_is_kept() {
    let modules = "Name,ECTS,Status,Note,Datum,Bestanden,Semester\n\
                   Mathematik I,5,Offen,,,,2\n\
                   Programmierung,10,Offen,,,,1\n";
    let (_dir, paths) = setup(modules);
    let mut dash = open(&paths, date(2025, 3, 1)).unwrap();
    assert_eq!(dash.semester_progress(0), Some((1, 0)));

    dash.submit_grade("Mathematik I", 1.0, date(2025, 3, 1))
        .unwrap();

    let written = fs::read_to_string(&paths.modules).unwrap();
    assert!(written.starts_with("Name,ECTS,Status,Note,Datum,Bestanden,Semester\n"));
    assert!(written.contains("Mathematik I,5,Abgeschlossen,1.0,01.03.2025,Ja,2"));
}

#[test]
fn unknown_module_is_rejected_without_writing() {
    let (_dir, paths) = setup(MODULES);
    let mut dash = open(&paths, date(2025, 3, 1)).unwrap();

    let err = dash
        .submit_grade("Chemie", 1.0, date(2025, 3, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Program(ProgramError::UnknownModule(_))
    ));
    assert_eq!(fs::read_to_string(&paths.modules).unwrap(), MODULES);
}

#[test]
fn layout_mismatch_is_reported() {
    let modules = "Name,ECTS,Status,Note,Datum,Bestanden\nMathematik I,5,Offen,,,\n";
    let (_dir, paths) = setup(modules);
    assert!(matches!(
        open(&paths, date(2025, 3, 1)),
        Err(BootstrapError::LayoutMismatch {
            expected: 4,
            found: 1
        })
    ));
}

#[test]
fn save_failure_keeps_grade_in_memory() {
    let (_dir, paths) = setup(MODULES);
    let mut dash = open(&paths, date(2025, 3, 1)).unwrap();
    // A directory in place of the table makes the final rename fail
    fs::remove_file(&paths.modules).unwrap();
    fs::create_dir(&paths.modules).unwrap();

    let err = dash
        .submit_grade("Programmierung", 1.3, date(2025, 3, 1))
        .unwrap_err();
    assert!(matches!(err, DashboardError::Store(_)));
    assert_eq!(dash.metrics().reached_ects, 15);
    assert!(paths.modules.is_dir());
}

#[test]
fn sample_data_assembles_with_default_layout() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples").join("data");
    let paths = DataPaths {
        program: dir.join("course_of_study.csv"),
        semesters: dir.join("semester.csv"),
        modules: dir.join("modules.csv"),
    };
    let dash = Dashboard::open(
        &paths,
        CsvModuleStore::new(&paths.modules),
        FixedClock::on(date(2024, 9, 1)),
        &[6, 6, 6, 6, 6, 3],
        GradingScale::default(),
    )
    .unwrap();

    assert_eq!(dash.semester_count(), 6);
    assert_eq!(dash.program().total_ects(), 180);
    assert_eq!(dash.semester_progress(5), Some((3, 0)));
}
