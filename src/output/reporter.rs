//! Final run report
//!
//! Printed once every worker has finished: a blank line, captured failure
//! details, run-level errors, the aggregated summary, and the elapsed time.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

use super::Palette;
use crate::aggregator::{render_counts, Registers, SummaryAggregator};
use crate::models::Counts;

/// Report output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Everything accumulated during a run
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(skip)]
    pub duration: Duration,
    pub units: usize,
    pub summary: Counts,
    pub errors: Vec<String>,
    pub extras: Vec<String>,
}

impl RunReport {
    /// Snapshot the shared sinks after the scheduler has returned
    pub fn collect(
        started_at: DateTime<Utc>,
        duration: Duration,
        units: usize,
        aggregator: &SummaryAggregator,
        registers: &Registers,
    ) -> Self {
        Self {
            started_at,
            duration_ms: duration.as_millis() as u64,
            duration,
            units,
            summary: aggregator.snapshot(),
            errors: registers.errors(),
            extras: registers.extras(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty() || self.summary.scenarios_failed > 0 || self.summary.steps_failed > 0
    }
}

/// Report printer
pub struct Reporter {
    format: OutputFormat,
    palette: Palette,
}

impl Reporter {
    pub fn new(format: OutputFormat, palette: Palette) -> Self {
        Self { format, palette }
    }

    pub fn render(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.render_text(report)),
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize run report")
            }
        }
    }

    fn render_text(&self, report: &RunReport) -> String {
        let mut output = String::from("\n");

        for extra in &report.extras {
            output.push_str(&self.palette.red(extra));
            if !extra.ends_with('\n') {
                output.push('\n');
            }
        }

        for error in &report.errors {
            output.push_str(error);
            output.push('\n');
        }

        output.push_str(&render_counts(&report.summary, self.palette));
        output.push_str(&format!("Tests ran in: {:?}\n", report.duration));
        output
    }

    /// Write the report to stdout
    pub fn print(&self, report: &RunReport) -> Result<()> {
        let rendered = self.render(report)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write report")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RunReport {
        RunReport {
            started_at: Utc::now(),
            duration_ms: 1500,
            duration: Duration::from_millis(1500),
            units: 3,
            summary: Counts {
                scenarios: 3,
                scenarios_passed: 2,
                scenarios_failed: 1,
                steps: 10,
                steps_passed: 9,
                steps_failed: 1,
                ..Counts::default()
            },
            errors: vec!["features/b.feature: bin/behat exited with exit status: 1".to_string()],
            extras: vec!["--- Failed steps:\n".to_string()],
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_text_report_order() {
        let reporter = Reporter::new(OutputFormat::Text, Palette::plain());
        let text = reporter.render(&sample_report()).unwrap();

        assert_eq!(
            text,
            "\n--- Failed steps:\n\
             features/b.feature: bin/behat exited with exit status: 1\n\
             3 scenarios (2 passed, 1 failed)\n\
             10 steps (9 passed, 1 failed)\n\
             Tests ran in: 1.5s\n"
        );
    }

    #[test]
    fn test_json_report() {
        let reporter = Reporter::new(OutputFormat::Json, Palette::new(true));
        let json = reporter.render(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["units"], 3);
        assert_eq!(value["duration_ms"], 1500);
        assert_eq!(value["summary"]["scenarios_failed"], 1);
        assert_eq!(value["errors"].as_array().unwrap().len(), 1);
        assert!(value.get("duration").is_none());
    }

    #[test]
    fn test_has_failures() {
        let mut report = sample_report();
        assert!(report.has_failures());

        report.errors.clear();
        report.summary = Counts::default();
        assert!(!report.has_failures());
    }
}
