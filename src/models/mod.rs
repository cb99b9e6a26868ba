//! Data models for parallel Behat runs
//!
//! Counters, glyphs, and per-execution outcomes shared across the crate.

mod glyph;
mod outcome;
mod summary;

use std::path::PathBuf;

pub use glyph::Glyph;
pub use outcome::RunOutcome;
pub use summary::{Category, Counts, SummaryLine, Tally};

/// One schedulable feature file
pub type TestUnit = PathBuf;
