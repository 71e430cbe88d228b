//! Data models for `StudyDashboard`
//!
//! Strict composition: a `Program` owns its `Semester`s, a `Semester` owns its `Module`s
//! and a `Module` owns at most one `ExamResult`.

pub mod exam_result;
pub mod module;
pub mod program;
pub mod semester;

pub use exam_result::ExamResult;
pub use module::{Module, ModuleStatus};
pub use program::{Program, ProgramError, ProgramInfo};
pub use semester::Semester;
