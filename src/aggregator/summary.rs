//! Shared summary aggregator
//!
//! Workers accumulate their own `Counts` locally and merge them here once
//! per stream. All access goes through a single mutex: every `accumulate`
//! that returns happens-before any later `snapshot` or `render`, and the
//! final snapshot taken after the scheduler joins all workers observes
//! every merge.

use std::sync::{Mutex, PoisonError};

use crate::models::{Category, Counts};
use crate::output::Palette;

/// Lock-guarded aggregate of all scenario and step counters
#[derive(Debug, Default)]
pub struct SummaryAggregator {
    counts: Mutex<Counts>,
}

impl SummaryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worker's partial counts to the shared totals
    pub fn accumulate(&self, partial: Counts) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts += partial;
    }

    /// Copy of the current totals
    pub fn snapshot(&self) -> Counts {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plain-text rendering of the current totals
    pub fn render(&self) -> String {
        render_counts(&self.snapshot(), Palette::plain())
    }
}

/// Render counters as Behat-style summary lines.
///
/// The passed clause is always present; failed and skipped clauses appear
/// only when their count is positive.
pub fn render_counts(counts: &Counts, palette: Palette) -> String {
    let mut out = String::new();
    for category in Category::all() {
        let tally = counts.tally(category);
        out.push_str(&format!(
            "{} {} ({}",
            tally.total,
            category,
            palette.green(&format!("{} passed", tally.passed))
        ));
        if tally.failed > 0 {
            out.push_str(&format!(
                ", {}",
                palette.red(&format!("{} failed", tally.failed))
            ));
        }
        if tally.skipped > 0 {
            out.push_str(&format!(
                ", {}",
                palette.cyan(&format!("{} skipped", tally.skipped))
            ));
        }
        out.push_str(")\n");
    }
    out
}
