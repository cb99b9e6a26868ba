//! Configuration module
//!
//! Builds the explicit run configuration handed to the scheduler and
//! executors. Layers, lowest precedence first: built-in defaults, config
//! file, `BEHAT_PARALLEL_*` environment variables, command-line flags.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::ConfigFile;

use std::path::PathBuf;
use thiserror::Error;

use crate::output::{OutputFormat, Palette};
use crate::parser::{ParserOptions, DEFAULT_EXTRAS_MARKER};

/// Default Behat executable, relative to the project root
pub const DEFAULT_BIN_PATH: &str = "bin/behat";

/// Default feature directory
pub const DEFAULT_FEATURES_PATH: &str = "features";

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("concurrency level must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("feature path \"{}\": {source}", .path.display())]
    FeaturesUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("feature path \"{}\" is not a directory.", .0.display())]
    FeaturesNotDirectory(PathBuf),

    #[error("behat bin \"{}\": {source}", .path.display())]
    BinUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("behat bin \"{}\" is not a file.", .0.display())]
    BinIsDirectory(PathBuf),

    #[error("extras marker must be a single ASCII character, got {0:?}")]
    InvalidExtrasMarker(char),
}

/// Configuration for one parallel run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of Behat processes running at once
    pub concurrency: usize,

    /// Path to the Behat executable
    pub bin_path: PathBuf,

    /// Root directory scanned for feature files
    pub features_path: PathBuf,

    /// Colorize console output
    pub colorize: bool,

    /// Final report format
    pub format: OutputFormat,

    /// First character of wrapped failure detail lines
    pub extras_marker: char,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            bin_path: PathBuf::from(DEFAULT_BIN_PATH),
            features_path: PathBuf::from(DEFAULT_FEATURES_PATH),
            colorize: true,
            format: OutputFormat::Text,
            extras_marker: DEFAULT_EXTRAS_MARKER as char,
        }
    }
}

impl RunConfig {
    pub fn new(bin_path: impl Into<PathBuf>, features_path: impl Into<PathBuf>) -> Self {
        Self {
            bin_path: bin_path.into(),
            features_path: features_path.into(),
            ..Default::default()
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Check the configuration before any process is started
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }
        if !self.extras_marker.is_ascii() {
            return Err(ConfigError::InvalidExtrasMarker(self.extras_marker));
        }

        let features = std::fs::metadata(&self.features_path).map_err(|source| {
            ConfigError::FeaturesUnreadable {
                path: self.features_path.clone(),
                source,
            }
        })?;
        if !features.is_dir() {
            return Err(ConfigError::FeaturesNotDirectory(self.features_path.clone()));
        }

        let bin = std::fs::metadata(&self.bin_path).map_err(|source| ConfigError::BinUnreadable {
            path: self.bin_path.clone(),
            source,
        })?;
        if bin.is_dir() {
            return Err(ConfigError::BinIsDirectory(self.bin_path.clone()));
        }

        Ok(())
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            extras_marker: self.extras_marker as u8,
        }
    }

    /// Console palette; JSON reports are never colorized
    pub fn palette(&self) -> Palette {
        Palette::new(self.colorize && self.format == OutputFormat::Text)
    }
}

/// Number of CPUs available to this process
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
