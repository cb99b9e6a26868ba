//! Append-only error and extras registers

use std::sync::{Mutex, PoisonError};

/// Run-level errors and captured failure details, in insertion order
#[derive(Debug, Default)]
pub struct Registers {
    errors: Mutex<Vec<String>>,
    extras: Mutex<Vec<String>>,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&self, error: impl Into<String>) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.into());
    }

    pub fn push_extra(&self, extra: impl Into<String>) {
        self.extras
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(extra.into());
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn extras(&self) -> Vec<String> {
        self.extras
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
