//! Shared library for `StudyDashboard`
//! Contains the progress engine, persistence and reporting used by the CLI

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
