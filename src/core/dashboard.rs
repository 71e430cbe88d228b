//! Facade over the program: the read surface a front end renders and the single write path

use crate::core::bootstrap::{load_program, BootstrapError, DataPaths, SemesterLayout};
use crate::core::calendar::Clock;
use crate::core::metrics::{
    compute_all_metrics, open_module_names, DashboardMetrics, GradingScale, NextMark,
};
use crate::core::models::{Program, ProgramError};
use crate::core::store::{ModuleRecord, ModuleStore, StoreError};
use crate::{debug, error, info};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the facade
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The in-memory update was rejected
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// The update was applied in memory but could not be persisted
    #[error("grade kept in memory but not saved: {0}")]
    Store(#[from] StoreError),
}

/// The program together with its module store and the clock that defines "now"
#[derive(Debug)]
pub struct Dashboard<S, C> {
    program: Program,
    layout: SemesterLayout,
    store: S,
    clock: C,
}

impl<S: ModuleStore, C: Clock> Dashboard<S, C> {
    /// Wrap an already assembled program
    pub const fn new(program: Program, layout: SemesterLayout, store: S, clock: C) -> Self {
        Self {
            program,
            layout,
            store,
            clock,
        }
    }

    /// Load all tables and assemble the program
    ///
    /// # Errors
    /// Returns an error if a table cannot be read or the program cannot be assembled
    pub fn open(
        paths: &DataPaths,
        store: S,
        clock: C,
        semester_sizes: &[usize],
        grading: GradingScale,
    ) -> Result<Self, BootstrapError> {
        let (program, layout) = load_program(paths, &store, semester_sizes, grading)?;
        Ok(Self::new(program, layout, store, clock))
    }

    /// The underlying program
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Date the metrics are computed for
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Number of semesters
    pub fn semester_count(&self) -> usize {
        self.program.semesters().len()
    }

    /// `(open, completed)` module counts of the semester at `index`
    pub fn semester_progress(&self, index: usize) -> Option<(usize, usize)> {
        self.program.semesters().get(index).map(|s| s.progress())
    }

    /// Label of the semester at `index`
    pub fn semester_designation(&self, index: usize) -> Option<&str> {
        self.program
            .semesters()
            .get(index)
            .map(|s| s.designation.as_str())
    }

    /// Names of modules still open, in program order
    pub fn open_module_names(&self) -> Vec<String> {
        open_module_names(&self.program)
    }

    /// All dashboard metrics as of the clock's current instant
    pub fn metrics(&self) -> DashboardMetrics {
        compute_all_metrics(&self.program, self.clock.now())
    }

    /// Time until the planned end as German text, e.g. `1 Jahr 3 Monate 12 Tage`.
    ///
    /// Units that are zero or negative are left out, so a passed deadline yields `""`.
    pub fn time_left_display(&self) -> String {
        let left = self.program.time_left(self.clock.now());
        let units = [
            (left.years, "Jahr", "Jahre"),
            (left.months, "Monat", "Monate"),
            (left.days, "Tag", "Tage"),
        ];
        units
            .iter()
            .filter(|(value, _, _)| *value > 0)
            .map(|&(value, one, many)| {
                if value == 1 {
                    format!("{value} {one}")
                } else {
                    format!("{value} {many}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The mark the next exam needs, classified against the grading scale
    pub fn next_mark_setting(&self) -> NextMark {
        NextMark::classify(self.program.required_next_mark(), self.program.grading())
    }

    /// Record a grade for `module_name` and persist the whole module table.
    ///
    /// The in-memory update happens first. If saving fails, the update stays in memory and
    /// the failure is returned as [`DashboardError::Store`].
    ///
    /// # Errors
    /// Returns [`DashboardError::Program`] for an unknown module and
    /// [`DashboardError::Store`] when the table cannot be written.
    pub fn submit_grade(
        &mut self,
        module_name: &str,
        mark: f64,
        date: NaiveDate,
    ) -> Result<(), DashboardError> {
        let module = self
            .program
            .update_module_performance(module_name, mark, date)?;
        info!(
            "Recorded {mark:.1} for '{module_name}' ({})",
            if module.is_passed() { "passed" } else { "failed" }
        );

        let records = self.records();
        if let Err(e) = self.store.save_modules(&records) {
            error!("Failed to save module table: {e}");
            return Err(e.into());
        }
        debug!("Saved {} module(s) after grade submission", records.len());
        Ok(())
    }

    /// Rows of the module table as they would be written now
    pub fn records(&self) -> Vec<ModuleRecord> {
        let numbered = self.layout == SemesterLayout::Column;
        self.program
            .semesters()
            .iter()
            .enumerate()
            .flat_map(|(index, semester)| {
                semester.modules().iter().map(move |module| ModuleRecord {
                    semester: numbered.then_some(index + 1),
                    ..module.to_record()
                })
            })
            .collect()
    }
}
