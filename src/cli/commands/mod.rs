//! CLI command handlers for `StudyDashboard`.
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod grade;
pub mod report;
pub mod status;

use study_dashboard::config::Config;
use study_dashboard::core::bootstrap::BootstrapError;
use study_dashboard::core::calendar::SystemClock;
use study_dashboard::core::dashboard::Dashboard;
use study_dashboard::core::store::CsvModuleStore;

/// Dashboard backed by the configured CSV tables and the system clock
pub type CliDashboard = Dashboard<CsvModuleStore, SystemClock>;

/// Load the configured tables into a dashboard
///
/// # Errors
/// Returns an error if a table is missing or malformed
pub fn open_dashboard(config: &Config) -> Result<CliDashboard, BootstrapError> {
    let paths = config.data_paths();
    let store = CsvModuleStore::new(&paths.modules);
    Dashboard::open(
        &paths,
        store,
        SystemClock,
        &config.layout.semester_sizes,
        config.grading,
    )
}
