//! Whole-suite run: wire the shared sinks, schedule, collect the report

use chrono::Utc;
use std::sync::Arc;

use super::parallel::Scheduler;
use super::runner::{ExecError, ProcessExecutor};
use crate::aggregator::{Registers, SummaryAggregator};
use crate::config::RunConfig;
use crate::models::TestUnit;
use crate::output::{GlyphSink, RunReport};
use crate::utils::Timer;

/// Run every unit through Behat and gather the aggregated report
pub async fn run_suite(
    config: &RunConfig,
    units: Vec<TestUnit>,
    sink: Arc<dyn GlyphSink>,
) -> Result<RunReport, ExecError> {
    let started_at = Utc::now();
    let timer = Timer::start("suite");

    let aggregator = Arc::new(SummaryAggregator::new());
    let registers = Arc::new(Registers::new());
    let executor = Arc::new(
        ProcessExecutor::new(
            &config.bin_path,
            sink,
            Arc::clone(&aggregator),
            Arc::clone(&registers),
        )
        .with_parser_options(config.parser_options()),
    );

    let total = units.len();
    Scheduler::new(config.concurrency).run(units, executor).await?;

    Ok(RunReport::collect(
        started_at,
        timer.stop(),
        total,
        &aggregator,
        &registers,
    ))
}
