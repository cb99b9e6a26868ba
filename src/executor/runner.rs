//! Behat process execution
//!
//! Runs `<bin> -f progress <feature>` for one feature file. Stdout is
//! scanned while the process runs and stderr is drained alongside, so
//! neither pipe can fill up and stall the child.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};
use tracing::{debug, warn};

use crate::aggregator::{Registers, SummaryAggregator};
use crate::models::{RunOutcome, TestUnit};
use crate::output::GlyphSink;
use crate::parser::{read_progress, ParserOptions};

/// Process execution errors
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start {}: {source}", .bin.display())]
    Spawn { bin: PathBuf, source: io::Error },

    #[error("no stdout handle for {}", .unit.display())]
    MissingStdout { unit: PathBuf },

    #[error("failed waiting for {} on {}: {source}", .bin.display(), .unit.display())]
    Wait {
        bin: PathBuf,
        unit: PathBuf,
        source: io::Error,
    },
}

impl ExecError {
    /// Fatal errors mean the environment itself is broken and the whole
    /// run must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecError::Spawn { .. } | ExecError::MissingStdout { .. })
    }
}

/// Runs one feature file and merges the result into the shared sinks
pub struct ProcessExecutor {
    bin_path: PathBuf,
    options: ParserOptions,
    sink: Arc<dyn GlyphSink>,
    aggregator: Arc<SummaryAggregator>,
    registers: Arc<Registers>,
}

impl ProcessExecutor {
    pub fn new(
        bin_path: impl Into<PathBuf>,
        sink: Arc<dyn GlyphSink>,
        aggregator: Arc<SummaryAggregator>,
        registers: Arc<Registers>,
    ) -> Self {
        Self {
            bin_path: bin_path.into(),
            options: ParserOptions::default(),
            sink,
            aggregator,
            registers,
        }
    }

    pub fn with_parser_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one feature file without touching the shared sinks.
    ///
    /// Only fatal errors are returned; everything else is recorded in the
    /// outcome.
    pub async fn run(&self, unit: &Path) -> Result<RunOutcome, ExecError> {
        debug!("Starting {} for {}", self.bin_path.display(), unit.display());

        let mut child = Command::new(&self.bin_path)
            .args(["-f", "progress"])
            .arg(unit)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                bin: self.bin_path.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| ExecError::MissingStdout {
            unit: unit.to_path_buf(),
        })?;
        let stderr = child.stderr.take();

        let (report, stderr, status) = tokio::join!(
            read_progress(stdout, self.options, self.sink.as_ref()),
            drain_stderr(stderr),
            child.wait()
        );

        let mut outcome = RunOutcome::new(unit);
        outcome.counts = report.counts;
        outcome.extras = report.extras;

        self.record_exit(&mut outcome, status, &stderr);

        Ok(outcome)
    }

    /// Record how the child ended.
    ///
    /// A nonzero exit and a failed wait both land in the outcome's errors;
    /// neither stops the run.
    fn record_exit(
        &self,
        outcome: &mut RunOutcome,
        status: io::Result<ExitStatus>,
        stderr: &str,
    ) {
        match status {
            Ok(status) if status.success() => {
                debug!("{} finished", outcome.unit.display());
                if !stderr.is_empty() {
                    warn!("{} wrote to stderr: {}", outcome.unit.display(), stderr);
                }
            }
            Ok(status) => {
                let mut message = format!(
                    "{}: {} exited with {}",
                    outcome.unit.display(),
                    self.bin_path.display(),
                    status
                );
                if !stderr.is_empty() {
                    message.push('\n');
                    message.push_str(stderr);
                }
                warn!("{}", message);
                outcome.errors.push(message);
            }
            Err(source) => {
                let err = ExecError::Wait {
                    bin: self.bin_path.clone(),
                    unit: outcome.unit.clone(),
                    source,
                };
                warn!("{}", err);
                outcome.errors.push(err.to_string());
            }
        }
    }

    /// Fold an outcome into the shared summary and registers
    pub fn merge(&self, outcome: RunOutcome) {
        self.aggregator.accumulate(outcome.counts);
        for extra in outcome.extras {
            self.registers.push_extra(extra);
        }
        for error in outcome.errors {
            self.registers.push_error(error);
        }
    }

    /// Run one feature file and merge its outcome
    pub async fn execute(&self, unit: TestUnit) -> Result<(), ExecError> {
        let outcome = self.run(&unit).await?;
        self.merge(outcome);
        Ok(())
    }
}

async fn drain_stderr(stderr: Option<ChildStderr>) -> String {
    let Some(mut stderr) = stderr else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = stderr.read_to_end(&mut buf).await {
        warn!("Failed to read stderr: {}", e);
    }
    String::from_utf8_lossy(&buf).trim_end().to_string()
}
