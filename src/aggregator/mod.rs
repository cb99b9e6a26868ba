//! Result aggregation
//!
//! Thread-safe sinks that every worker merges into.

mod registers;
mod summary;

pub use registers::Registers;
pub use summary::{render_counts, SummaryAggregator};
