//! behat-parallel - run Behat feature files concurrently
//!
//! Every discovered feature file is executed as its own
//! `behat -f progress <file>` process. A bounded scheduler keeps at most
//! `concurrency` processes alive, each process's stdout is scanned live for
//! progress glyphs and summary lines, and the per-file counts are merged into
//! one aggregated Behat-style summary.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod models;
pub mod output;
pub mod parser;
pub mod utils;
