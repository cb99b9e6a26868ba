//! Test execution engine
//!
//! Runs Behat once per feature file, in parallel.

mod parallel;
mod runner;
mod suite;

pub use parallel::{Scheduler, UnitExecutor};
pub use runner::{ExecError, ProcessExecutor};
pub use suite::run_suite;
