//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::debug;

use crate::config::{expand_path, ConfigFile, EnvConfig, RunConfig};
use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Run Behat feature files in parallel and aggregate their results
#[derive(Parser, Debug)]
#[command(name = "behat-parallel")]
#[command(version)]
#[command(about = "Run Behat feature files in parallel")]
#[command(long_about = None)]
pub struct Args {
    /// Concurrency level, defaults to number of CPUs
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Path to behat executable [default: bin/behat]
    #[arg(long)]
    pub bin: Option<String>,

    /// Path to behat features [default: features]
    #[arg(long)]
    pub features: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Report format (text, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// First character of wrapped failure detail lines [default: -]
    ///
    /// With Behat 3 the default only keeps the `--- Failed steps:` header,
    /// because a blank line follows it. Pass ' ' to keep the indented
    /// failure details as well.
    #[arg(long)]
    pub extras_marker: Option<char>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// List discovered feature files and exit
    #[arg(long)]
    pub list: bool,
}

impl Args {
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or(LogLevel::Warn)
    }

    /// Build the run configuration: defaults, config file, environment,
    /// then these flags.
    pub fn resolve_config(&self, env: &EnvConfig) -> Result<RunConfig> {
        let mut config = RunConfig::default();

        let config_path = self
            .config
            .as_deref()
            .or(env.config_file.as_deref())
            .map(expand_path)
            .or_else(ConfigFile::find);
        if let Some(path) = config_path {
            debug!("Loading config file {}", path.display());
            ConfigFile::load(&path)?.apply(&mut config);
        }

        env.apply(&mut config);
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut RunConfig) -> Result<()> {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(bin) = &self.bin {
            config.bin_path = expand_path(bin);
        }
        if let Some(features) = &self.features {
            config.features_path = expand_path(features);
        }
        if self.no_color {
            config.colorize = false;
        }
        if let Some(format) = &self.format {
            config.format = OutputFormat::from_str(format)
                .ok_or_else(|| anyhow!("Unknown output format: {format}"))?;
        }
        if let Some(marker) = self.extras_marker {
            config.extras_marker = marker;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("behat-parallel").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_short_and_long_concurrency() {
        assert_eq!(parse(&["-c", "3"]).concurrency, Some(3));
        assert_eq!(parse(&["--concurrency", "5"]).concurrency, Some(5));
        assert_eq!(parse(&[]).concurrency, None);
    }

    #[test]
    fn test_flags_override_env() {
        let dir = tempdir().unwrap();
        let env = EnvConfig {
            concurrency: Some(2),
            bin: Some("vendor/bin/behat".to_string()),
            config_file: Some(dir.path().join("none.yaml").display().to_string()),
            ..Default::default()
        };
        // config file named by the environment must exist
        assert!(parse(&[]).resolve_config(&env).is_err());

        let env = EnvConfig {
            config_file: None,
            ..env
        };
        let config = parse(&["-c", "7", "--no-color", "--format", "json"])
            .resolve_config(&env)
            .unwrap();
        assert_eq!(config.concurrency, 7);
        assert_eq!(config.bin_path, PathBuf::from("vendor/bin/behat"));
        assert!(!config.colorize);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_file_layer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "concurrency: 9\nfeatures: suite/features\n").unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--features", "other"])
            .resolve_config(&EnvConfig::default())
            .unwrap();
        assert_eq!(config.concurrency, 9);
        assert_eq!(config.features_path, PathBuf::from("other"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let args = parse(&["--format", "xml"]);
        let mut config = RunConfig::default();
        assert!(args.apply(&mut config).is_err());
    }

    #[test]
    fn test_log_level_fallback() {
        assert_eq!(parse(&[]).log_level(), LogLevel::Warn);
        assert_eq!(parse(&["--log-level", "debug"]).log_level(), LogLevel::Debug);
        assert_eq!(parse(&["--log-level", "loud"]).log_level(), LogLevel::Warn);
    }
}
