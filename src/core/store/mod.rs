//! Persistence of the academic record as flat CSV tables
//!
//! Three tables are read at startup (program metadata, semester labels, modules); only the
//! module table is written back, in full, after every grade submission.

pub mod csv_store;

pub use csv_store::{load_program_info, load_semester_labels, CsvModuleStore};

use crate::core::validity::is_value_valid;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing record files
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be opened, created or renamed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// A row is structurally unusable
    #[error("{}, line {line}: {message}", .path.display())]
    InvalidRow {
        /// File involved
        path: PathBuf,
        /// 1-based line number including the header
        line: u64,
        /// What is wrong with the row
        message: String,
    },

    /// The program file has no data row
    #[error("{} contains no program row", .path.display())]
    MissingProgram {
        /// File involved
        path: PathBuf,
    },
}

/// One row of the persisted module table.
///
/// Mark, date and passed flag are kept as text so that blank cells survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Module name
    #[serde(rename = "Name")]
    pub name: String,

    /// Credit value
    #[serde(rename = "ECTS")]
    pub ects: u32,

    /// Status label (`Offen` or `Abgeschlossen`)
    #[serde(rename = "Status")]
    pub status: String,

    /// Mark, or empty
    #[serde(rename = "Note", default)]
    pub mark: String,

    /// Date as `DD.MM.YYYY`, or empty
    #[serde(rename = "Datum", default)]
    pub date: String,

    /// `Ja`, `Nein`, or empty
    #[serde(rename = "Bestanden", default)]
    pub passed: String,

    /// Optional 1-based semester number; written only when present
    #[serde(
        rename = "Semester",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub semester: Option<usize>,
}

impl ModuleRecord {
    /// Mark parsed as a number (decimal comma accepted); `None` when blank or unparseable
    #[must_use]
    pub fn parsed_mark(&self) -> Option<f64> {
        if !is_value_valid(&self.mark) {
            return None;
        }
        self.mark.trim().replace(',', ".").parse::<f64>().ok()
    }

    /// Date parsed day-first; `None` when blank or unparseable
    #[must_use]
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        if !is_value_valid(&self.date) {
            return None;
        }
        crate::core::calendar::parse_date(&self.date)
    }

    /// `Ja` / `Nein` mapped to a flag; anything else is `None`
    #[must_use]
    pub fn parsed_passed(&self) -> Option<bool> {
        if !is_value_valid(&self.passed) {
            return None;
        }
        match self.passed.trim() {
            "Ja" => Some(true),
            "Nein" => Some(false),
            _ => None,
        }
    }
}

/// Load/save contract for the module table
pub trait ModuleStore {
    /// Read every module row
    ///
    /// # Errors
    /// Returns an error if the table cannot be read or a row is structurally invalid
    fn load_modules(&self) -> Result<Vec<ModuleRecord>, StoreError>;

    /// Replace the stored table with `records`
    ///
    /// # Errors
    /// Returns an error if the table cannot be written
    fn save_modules(&self, records: &[ModuleRecord]) -> Result<(), StoreError>;
}
