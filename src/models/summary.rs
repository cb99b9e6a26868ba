//! Scenario and step counters
//!
//! Defines the eight counters collected from Behat summary lines and the
//! per-line record produced by the summary grammar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Summary line category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scenarios,
    Steps,
}

impl Category {
    /// Keyword that follows the total on a summary line
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::Scenarios => "scenario",
            Category::Steps => "step",
        }
    }

    pub fn all() -> [Category; 2] {
        [Category::Scenarios, Category::Steps]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Scenarios => write!(f, "scenarios"),
            Category::Steps => write!(f, "steps"),
        }
    }
}

/// One category's worth of counters parsed from a single line.
///
/// Sub-counts are only ever taken from the same line as the total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.total = self.total.saturating_add(rhs.total);
        self.passed = self.passed.saturating_add(rhs.passed);
        self.failed = self.failed.saturating_add(rhs.failed);
        self.skipped = self.skipped.saturating_add(rhs.skipped);
    }
}

/// A parsed summary line: `{category, total, passed, failed, skipped}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryLine {
    pub category: Category,
    pub tally: Tally,
}

impl SummaryLine {
    pub fn new(category: Category, total: u64) -> Self {
        Self {
            category,
            tally: Tally {
                total,
                ..Tally::default()
            },
        }
    }

    pub fn passed(mut self, n: u64) -> Self {
        self.tally.passed = n;
        self
    }

    pub fn failed(mut self, n: u64) -> Self {
        self.tally.failed = n;
        self
    }

    pub fn skipped(mut self, n: u64) -> Self {
        self.tally.skipped = n;
        self
    }
}

/// The eight aggregate counters.
///
/// No relation between a total and its sub-counters is enforced; adding is
/// field-wise and saturates at `u64::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub scenarios: u64,
    pub scenarios_passed: u64,
    pub scenarios_failed: u64,
    pub scenarios_skipped: u64,
    pub steps: u64,
    pub steps_passed: u64,
    pub steps_failed: u64,
    pub steps_skipped: u64,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a parsed summary line into these counters
    pub fn record(&mut self, line: &SummaryLine) {
        let t = &line.tally;
        match line.category {
            Category::Scenarios => {
                self.scenarios = self.scenarios.saturating_add(t.total);
                self.scenarios_passed = self.scenarios_passed.saturating_add(t.passed);
                self.scenarios_failed = self.scenarios_failed.saturating_add(t.failed);
                self.scenarios_skipped = self.scenarios_skipped.saturating_add(t.skipped);
            }
            Category::Steps => {
                self.steps = self.steps.saturating_add(t.total);
                self.steps_passed = self.steps_passed.saturating_add(t.passed);
                self.steps_failed = self.steps_failed.saturating_add(t.failed);
                self.steps_skipped = self.steps_skipped.saturating_add(t.skipped);
            }
        }
    }

    /// View one category's counters
    pub fn tally(&self, category: Category) -> Tally {
        match category {
            Category::Scenarios => Tally {
                total: self.scenarios,
                passed: self.scenarios_passed,
                failed: self.scenarios_failed,
                skipped: self.scenarios_skipped,
            },
            Category::Steps => Tally {
                total: self.steps,
                passed: self.steps_passed,
                failed: self.steps_failed,
                skipped: self.steps_skipped,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Counts::default()
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Self) {
        self.scenarios = self.scenarios.saturating_add(rhs.scenarios);
        self.scenarios_passed = self.scenarios_passed.saturating_add(rhs.scenarios_passed);
        self.scenarios_failed = self.scenarios_failed.saturating_add(rhs.scenarios_failed);
        self.scenarios_skipped = self.scenarios_skipped.saturating_add(rhs.scenarios_skipped);
        self.steps = self.steps.saturating_add(rhs.steps);
        self.steps_passed = self.steps_passed.saturating_add(rhs.steps_passed);
        self.steps_failed = self.steps_failed.saturating_add(rhs.steps_failed);
        self.steps_skipped = self.steps_skipped.saturating_add(rhs.steps_skipped);
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}
