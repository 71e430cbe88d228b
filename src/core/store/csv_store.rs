//! CSV readers and the CSV-backed module store

use super::{ModuleRecord, ModuleStore, StoreError};
use crate::core::calendar::parse_date;
use crate::core::models::ProgramInfo;
use crate::{debug, info};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Column order of the written module table
const MODULE_HEADERS: [&str; 6] = ["Name", "ECTS", "Status", "Note", "Datum", "Bestanden"];

/// Raw row of the program metadata table
#[derive(Debug, Deserialize)]
struct ProgramRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Art", default)]
    kind: String,
    #[serde(rename = "Titel", default)]
    title: String,
    #[serde(rename = "Gesamt_ECTS")]
    total_ects: u32,
    #[serde(rename = "Dauer", default)]
    duration: String,
    #[serde(rename = "Start", default)]
    start: String,
    #[serde(rename = "Ende", default)]
    end: String,
}

/// Raw row of the semester label table
#[derive(Debug, Deserialize)]
struct SemesterRow {
    #[serde(rename = "Bezeichnung")]
    designation: String,
}

/// Read every row of `path` into `T`, reporting the line of the first bad row
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(|e| StoreError::InvalidRow {
            path: path.to_path_buf(),
            line: idx as u64 + 2,
            message: e.to_string(),
        })?;
        rows.push(row);
    }
    debug!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load program metadata. When the file holds several rows the last one wins.
///
/// # Errors
/// Returns an error if the file cannot be read, has no rows, or a date cannot be parsed
pub fn load_program_info<P: AsRef<Path>>(path: P) -> Result<ProgramInfo, StoreError> {
    let path = path.as_ref();
    let rows: Vec<ProgramRow> = read_rows(path)?;
    let line = rows.len() as u64 + 1;
    let row = rows.into_iter().last().ok_or_else(|| StoreError::MissingProgram {
        path: path.to_path_buf(),
    })?;

    let date_field = |value: &str, column: &str| {
        parse_date(value).ok_or_else(|| StoreError::InvalidRow {
            path: path.to_path_buf(),
            line,
            message: format!("invalid {column} date '{value}'"),
        })
    };
    let start = date_field(&row.start, "Start")?;
    let end = date_field(&row.end, "Ende")?;

    Ok(ProgramInfo {
        name: row.name,
        kind: row.kind,
        title: row.title,
        total_ects: row.total_ects,
        duration: row.duration,
        start,
        end,
    })
}

/// Load semester labels in file order
///
/// # Errors
/// Returns an error if the file cannot be read or lacks the `Bezeichnung` column
pub fn load_semester_labels<P: AsRef<Path>>(path: P) -> Result<Vec<String>, StoreError> {
    let rows: Vec<SemesterRow> = read_rows(path.as_ref())?;
    Ok(rows.into_iter().map(|r| r.designation).collect())
}

/// Module table stored as one CSV file
#[derive(Debug, Clone)]
pub struct CsvModuleStore {
    path: PathBuf,
}

impl CsvModuleStore {
    /// Create a store for the file at `path`
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the module table
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_to(&self, target: &Path, records: &[ModuleRecord]) -> Result<(), StoreError> {
        let csv_err = |source| StoreError::Csv {
            path: target.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(target).map_err(csv_err)?;
        if records.is_empty() {
            writer.write_record(MODULE_HEADERS).map_err(csv_err)?;
        }
        for record in records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: target.to_path_buf(),
            source,
        })
    }
}

impl ModuleStore for CsvModuleStore {
    fn load_modules(&self) -> Result<Vec<ModuleRecord>, StoreError> {
        let records: Vec<ModuleRecord> = read_rows(&self.path)?;
        info!(
            "Loaded {} module(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn save_modules(&self, records: &[ModuleRecord]) -> Result<(), StoreError> {
        let temp = self.temp_path();
        if let Err(e) = self.write_to(&temp, records) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        if let Err(source) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }
        debug!(
            "Wrote {} module(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
