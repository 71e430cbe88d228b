//! Semester model

use super::{Module, ModuleStatus};
use serde::{Deserialize, Serialize};

/// An ordered group of modules under one display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    /// Display label (e.g., "1. Semester")
    pub designation: String,

    modules: Vec<Module>,
}

impl Semester {
    /// Create an empty semester
    #[must_use]
    pub const fn new(designation: String) -> Self {
        Self {
            designation,
            modules: Vec::new(),
        }
    }

    /// Append a module; assignment order is kept
    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Modules in assignment order
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub(crate) fn modules_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.iter_mut()
    }

    /// Count modules by status
    ///
    /// # Returns
    /// `(open, completed)`
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        self.modules
            .iter()
            .fold((0, 0), |(open, completed), module| match module.status() {
                ModuleStatus::Open => (open + 1, completed),
                ModuleStatus::Completed => (open, completed + 1),
            })
    }
}
