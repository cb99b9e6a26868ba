//! Per-execution outcome of one feature file

use std::path::PathBuf;

use super::Counts;

/// What one Behat process contributed before it is merged into the shared
/// summary and registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub unit: PathBuf,
    pub counts: Counts,
    pub extras: Vec<String>,
    pub errors: Vec<String>,
}

impl RunOutcome {
    pub fn new(unit: impl Into<PathBuf>) -> Self {
        Self {
            unit: unit.into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
