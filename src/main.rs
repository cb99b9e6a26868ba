//! behat-parallel - Parallel Behat runner
//!
//! ## Usage
//!
//! ```bash
//! # Run every feature under ./features with bin/behat, one process per CPU
//! behat-parallel
//!
//! # Limit concurrency and point at a different layout
//! behat-parallel -c 4 --bin vendor/bin/behat --features tests/features
//!
//! # Machine-readable report (progress goes to stderr)
//! behat-parallel --format json > report.json
//! ```

use anyhow::Result;
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing::info;

use behat_parallel::cli::Args;
use behat_parallel::config::EnvConfig;
use behat_parallel::discovery::discover;
use behat_parallel::executor::run_suite;
use behat_parallel::output::{GlyphSink, OutputFormat, Palette, ProgressPrinter, Reporter};
use behat_parallel::utils::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level());

    let config = args.resolve_config(&EnvConfig::load())?;
    config.validate()?;

    let units = discover(&config.features_path)?;

    if args.list {
        for unit in &units {
            println!("{}", unit.display());
        }
        return Ok(());
    }

    info!(
        "Running {} with {} against {} feature files",
        config.bin_path.display(),
        config.concurrency,
        units.len()
    );

    let progress = Palette::new(config.colorize);
    let sink: Arc<dyn GlyphSink> = match config.format {
        OutputFormat::Text => Arc::new(ProgressPrinter::stdout(progress)),
        OutputFormat::Json => Arc::new(ProgressPrinter::new(io::stderr(), progress)),
    };

    let report = run_suite(&config, units, sink).await?;

    Reporter::new(config.format, config.palette()).print(&report)?;

    Ok(())
}
