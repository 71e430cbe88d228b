//! Core module: academic record model, metrics engine, persistence and reporting

pub mod bootstrap;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod models;
pub mod report;
pub mod store;
pub mod validity;

/// Returns the current version of the `StudyDashboard` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
