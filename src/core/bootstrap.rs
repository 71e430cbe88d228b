//! Assembly of loaded record tables into a `Program`
//!
//! Every module ends up in exactly one semester. Modules either name their semester in an
//! optional `Semester` column, or are dealt out in file order by a list of semester sizes.

use crate::core::metrics::GradingScale;
use crate::core::models::{Module, ModuleStatus, Program, ProgramError, ProgramInfo};
use crate::core::store::{
    load_program_info, load_semester_labels, ModuleRecord, ModuleStore, StoreError,
};
use crate::{info, warn};
use std::path::PathBuf;
use thiserror::Error;

/// Module counts per semester of the standard six-semester plan
pub const DEFAULT_SEMESTER_SIZES: [usize; 6] = [6, 6, 6, 6, 6, 3];

/// Errors raised while building the program from its tables
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A table could not be read
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The program itself is invalid
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// Semester sizes do not add up to the number of modules
    #[error("semester layout covers {expected} module(s) but {found} were loaded")]
    LayoutMismatch {
        /// Sum of the configured semester sizes
        expected: usize,
        /// Number of module rows
        found: usize,
    },

    /// Some rows name a semester and this one does not
    #[error("module '{module}' has no semester while others do")]
    MissingSemester {
        /// Module name
        module: String,
    },

    /// Semester numbers are 1-based
    #[error("module '{module}' names semester 0; semesters are numbered from 1")]
    ZeroSemester {
        /// Module name
        module: String,
    },
}

/// Locations of the three input tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// Program metadata table
    pub program: PathBuf,
    /// Semester label table
    pub semesters: PathBuf,
    /// Module table
    pub modules: PathBuf,
}

/// Build a module from its persisted row.
///
/// Unparseable mark, date or passed cells leave the module without a performance.
/// An unknown status label is read as Open.
#[must_use]
pub fn module_from_record(record: &ModuleRecord) -> Module {
    let status = record.status.parse::<ModuleStatus>().unwrap_or_else(|e| {
        warn!("{e} for module '{}'; treating it as open", record.name);
        ModuleStatus::Open
    });

    Module::new(record.name.clone(), record.ects, status).with_performance(
        record.parsed_mark(),
        record.parsed_date(),
        record.parsed_passed(),
    )
}

/// How modules are distributed over semesters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemesterLayout {
    /// Every row names its 1-based semester in the `Semester` column
    Column,
    /// Rows are dealt out in file order, `sizes[i]` modules to semester `i`
    Sizes(Vec<usize>),
}

impl SemesterLayout {
    /// Use the `Semester` column when any row carries it, otherwise the given sizes
    #[must_use]
    pub fn detect(records: &[ModuleRecord], sizes: &[usize]) -> Self {
        if records.iter().any(|r| r.semester.is_some()) {
            Self::Column
        } else {
            Self::Sizes(sizes.to_vec())
        }
    }
}

/// Assemble a program from already-loaded tables.
///
/// # Errors
/// Returns an error if the credit target is zero, the layout does not match the module
/// count, or a module points at a semester that does not exist.
pub fn assemble(
    info: ProgramInfo,
    labels: Vec<String>,
    records: &[ModuleRecord],
    layout: &SemesterLayout,
    grading: GradingScale,
) -> Result<Program, BootstrapError> {
    let mut program = Program::new(info, labels)?.with_grading(grading);

    match layout {
        SemesterLayout::Column => {
            for record in records {
                let number = record
                    .semester
                    .ok_or_else(|| BootstrapError::MissingSemester {
                        module: record.name.clone(),
                    })?;
                let index = number
                    .checked_sub(1)
                    .ok_or_else(|| BootstrapError::ZeroSemester {
                        module: record.name.clone(),
                    })?;
                program.assign_module(index, module_from_record(record))?;
            }
        }
        SemesterLayout::Sizes(sizes) => {
            let expected: usize = sizes.iter().sum();
            if expected != records.len() {
                return Err(BootstrapError::LayoutMismatch {
                    expected,
                    found: records.len(),
                });
            }
            let mut rows = records.iter();
            for (index, &size) in sizes.iter().enumerate() {
                for record in rows.by_ref().take(size) {
                    program.assign_module(index, module_from_record(record))?;
                }
            }
        }
    }

    info!(
        "Assembled '{}' with {} semester(s) and {} module(s)",
        program.info().name,
        program.semesters().len(),
        records.len()
    );
    Ok(program)
}

/// Read all three tables and assemble the program.
///
/// Returns the layout that was applied so a writer can keep the `Semester` column.
///
/// # Errors
/// Returns an error if any table cannot be read or assembly fails
pub fn load_program<S: ModuleStore>(
    paths: &DataPaths,
    store: &S,
    semester_sizes: &[usize],
    grading: GradingScale,
) -> Result<(Program, SemesterLayout), BootstrapError> {
    let info = load_program_info(&paths.program)?;
    let labels = load_semester_labels(&paths.semesters)?;
    let records = store.load_modules()?;
    let layout = SemesterLayout::detect(&records, semester_sizes);
    let program = assemble(info, labels, &records, &layout, grading)?;
    Ok((program, layout))
}
