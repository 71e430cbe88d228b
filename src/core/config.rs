//! Configuration module for `StudyDashboard`

use crate::core::bootstrap::{DataPaths, DEFAULT_SEMESTER_SIZES};
use crate::core::metrics::GradingScale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the application directory in path-like values
const DIR_VARIABLE: &str = "$STUDY_DASHBOARD";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the record tables
    #[serde(default)]
    pub data_dir: String,
    /// Program metadata file name inside `data_dir`
    #[serde(default)]
    pub program_file: String,
    /// Semester label file name inside `data_dir`
    #[serde(default)]
    pub semesters_file: String,
    /// Module table file name inside `data_dir`
    #[serde(default)]
    pub modules_file: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Module-to-semester layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Module count per semester, applied in file order
    #[serde(default)]
    pub semester_sizes: Vec<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            semester_sizes: DEFAULT_SEMESTER_SIZES.to_vec(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Grading scale
    #[serde(default)]
    pub grading: GradingScale,
    /// Semester layout
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override data directory
    pub data_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$STUDY_DASHBOARD` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/studydash`
    /// - macOS: `~/Library/Application Support/studydash`
    /// - Windows: `%APPDATA%\studydash`
    #[must_use]
    pub fn get_app_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studydash")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only empty string fields and an empty semester layout are filled in; numbers and
    /// flags already carry serde defaults.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        let mut fill = |field: &mut String, default: &String| {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        };
        fill(&mut self.logging.level, &defaults.logging.level);
        fill(&mut self.logging.file, &defaults.logging.file);
        fill(&mut self.paths.data_dir, &defaults.paths.data_dir);
        fill(&mut self.paths.program_file, &defaults.paths.program_file);
        fill(&mut self.paths.semesters_file, &defaults.paths.semesters_file);
        fill(&mut self.paths.modules_file, &defaults.paths.modules_file);
        fill(&mut self.paths.reports_dir, &defaults.paths.reports_dir);

        if self.layout.semester_sizes.is_empty() && !defaults.layout.semester_sizes.is_empty() {
            self.layout
                .semester_sizes
                .clone_from(&defaults.layout.semester_sizes);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the config file is not touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir.clone_from(data_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_app_dir`](Self::get_app_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_app_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$STUDY_DASHBOARD` in a string
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let app_dir = Self::get_app_dir();
            value.replace(DIR_VARIABLE, app_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults; `$STUDY_DASHBOARD` is expanded in paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_dir = Self::expand_variables(&config.paths.data_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults are
    /// compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// An existing file gets missing fields merged in from defaults and is saved back.
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Locations of the three record tables
    #[must_use]
    pub fn data_paths(&self) -> DataPaths {
        let dir = PathBuf::from(&self.paths.data_dir);
        DataPaths {
            program: dir.join(&self.paths.program_file),
            semesters: dir.join(&self.paths.semesters_file),
            modules: dir.join(&self.paths.modules_file),
        }
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `data_dir`, `program_file`,
    /// `semesters_file`, `modules_file`, `reports_dir`, `passing_threshold`,
    /// `target_average`, `best_mark`, `worst_mark`, `semester_sizes`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "data_dir" | "data-dir" => Some(self.paths.data_dir.clone()),
            "program_file" | "program-file" => Some(self.paths.program_file.clone()),
            "semesters_file" | "semesters-file" => Some(self.paths.semesters_file.clone()),
            "modules_file" | "modules-file" => Some(self.paths.modules_file.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "passing_threshold" => Some(self.grading.passing_threshold.to_string()),
            "target_average" => Some(self.grading.target_average.to_string()),
            "best_mark" => Some(self.grading.best_mark.to_string()),
            "worst_mark" => Some(self.grading.worst_mark.to_string()),
            "semester_sizes" | "semester-sizes" => Some(join_sizes(&self.layout.semester_sizes)),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Numeric grading keys take a decimal number; `semester_sizes` takes a comma-separated
    /// list such as `6,6,6,6,6,3`. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "data_dir" | "data-dir" => self.paths.data_dir = value.to_string(),
            "program_file" | "program-file" => self.paths.program_file = value.to_string(),
            "semesters_file" | "semesters-file" => self.paths.semesters_file = value.to_string(),
            "modules_file" | "modules-file" => self.paths.modules_file = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "passing_threshold" => self.grading.passing_threshold = parse_mark(key, value)?,
            "target_average" => self.grading.target_average = parse_mark(key, value)?,
            "best_mark" => self.grading.best_mark = parse_mark(key, value)?,
            "worst_mark" => self.grading.worst_mark = parse_mark(key, value)?,
            "semester_sizes" | "semester-sizes" => {
                self.layout.semester_sizes = parse_sizes(value)?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_dir" | "data-dir" => self.paths.data_dir.clone_from(&defaults.paths.data_dir),
            "program_file" | "program-file" => self
                .paths
                .program_file
                .clone_from(&defaults.paths.program_file),
            "semesters_file" | "semesters-file" => self
                .paths
                .semesters_file
                .clone_from(&defaults.paths.semesters_file),
            "modules_file" | "modules-file" => self
                .paths
                .modules_file
                .clone_from(&defaults.paths.modules_file),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "passing_threshold" => {
                self.grading.passing_threshold = defaults.grading.passing_threshold;
            }
            "target_average" => self.grading.target_average = defaults.grading.target_average,
            "best_mark" => self.grading.best_mark = defaults.grading.best_mark,
            "worst_mark" => self.grading.worst_mark = defaults.grading.worst_mark,
            "semester_sizes" | "semester-sizes" => self
                .layout
                .semester_sizes
                .clone_from(&defaults.layout.semester_sizes),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_mark(key: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid number for '{key}': '{value}'"))
}

fn parse_sizes(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| format!("Invalid semester size: '{part}'"))
        })
        .collect()
}

fn join_sizes(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_dir = \"{}\"", self.paths.data_dir)?;
        writeln!(f, "  program_file = \"{}\"", self.paths.program_file)?;
        writeln!(f, "  semesters_file = \"{}\"", self.paths.semesters_file)?;
        writeln!(f, "  modules_file = \"{}\"", self.paths.modules_file)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[grading]")?;
        writeln!(f, "  passing_threshold = {}", self.grading.passing_threshold)?;
        writeln!(f, "  target_average = {}", self.grading.target_average)?;
        writeln!(f, "  best_mark = {}", self.grading.best_mark)?;
        writeln!(f, "  worst_mark = {}", self.grading.worst_mark)?;

        writeln!(f, "\n[layout]")?;
        writeln!(
            f,
            "  semester_sizes = [{}]",
            join_sizes(&self.layout.semester_sizes)
        )?;

        Ok(())
    }
}
