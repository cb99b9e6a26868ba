//! Summary line grammar
//!
//! A summary line carries a category total (`"<N> scenario"` or
//! `"<N> step"`) and, on the same line, optional `"<N> passed"`,
//! `"<N> failed"` and `"<N> skipped"` clauses. Patterns are compiled once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Category, SummaryLine};

struct Grammar {
    scenarios: Regex,
    steps: Regex,
    passed: Regex,
    failed: Regex,
    skipped: Regex,
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| Grammar {
    scenarios: count_pattern(Category::Scenarios.keyword()),
    steps: count_pattern(Category::Steps.keyword()),
    passed: count_pattern("passed"),
    failed: count_pattern("failed"),
    skipped: count_pattern("skipped"),
});

fn count_pattern(word: &str) -> Regex {
    Regex::new(&format!("([0-9]+) {}", regex::escape(word))).expect("static count pattern")
}

/// Leftmost `"<N> <word>"` count on the line.
///
/// A count too large for `u64` is treated as no match.
fn leading_count(re: &Regex, line: &str) -> Option<u64> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl Grammar {
    fn category(&self, category: Category) -> &Regex {
        match category {
            Category::Scenarios => &self.scenarios,
            Category::Steps => &self.steps,
        }
    }
}

/// Parse one line into zero, one, or two summary records.
///
/// A line matching neither category yields nothing. Missing sub-clauses
/// count as zero.
pub fn parse_summary_line(line: &str) -> Vec<SummaryLine> {
    let grammar = &*GRAMMAR;
    Category::all()
        .into_iter()
        .filter_map(|category| {
            let total = leading_count(grammar.category(category), line)?;
            Some(
                SummaryLine::new(category, total)
                    .passed(leading_count(&grammar.passed, line).unwrap_or(0))
                    .failed(leading_count(&grammar.failed, line).unwrap_or(0))
                    .skipped(leading_count(&grammar.skipped, line).unwrap_or(0)),
            )
        })
        .collect()
}
