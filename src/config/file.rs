//! Configuration file support
//!
//! Optional YAML or JSON file providing defaults for a run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{expand_path, RunConfig};
use crate::output::OutputFormat;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./behat-parallel.yaml",
    "./behat-parallel.yml",
    "./.behat-parallel.yaml",
    "~/.config/behat-parallel/config.yaml",
];

/// Configuration file structure; every field is optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub concurrency: Option<usize>,
    pub bin: Option<String>,
    pub features: Option<String>,
    pub color: Option<bool>,
    pub format: Option<OutputFormat>,
    pub extras_marker: Option<char>,
}

impl ConfigFile {
    /// Find a configuration file in the standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }

    /// Override the fields this file sets
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(bin) = &self.bin {
            config.bin_path = expand_path(bin);
        }
        if let Some(features) = &self.features {
            config.features_path = expand_path(features);
        }
        if let Some(color) = self.color {
            config.colorize = color;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(marker) = self.extras_marker {
            config.extras_marker = marker;
        }
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_load_and_apply() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("behat-parallel.yaml");
        std::fs::write(
            &path,
            "concurrency: 3\nbin: vendor/bin/behat\nformat: json\ncolor: false\n",
        )
        .unwrap();

        let file = ConfigFile::load(&path).unwrap();
        assert_eq!(file.concurrency, Some(3));
        assert!(file.features.is_none());

        let mut config = RunConfig::default();
        file.apply(&mut config);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.bin_path, PathBuf::from("vendor/bin/behat"));
        assert_eq!(config.features_path, PathBuf::from("features"));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.colorize);
    }

    #[test]
    fn test_json_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"features": "tests/features", "extras_marker": " ", "format": "text"}"#,
        )
        .unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(
            loaded,
            ConfigFile {
                features: Some("tests/features".to_string()),
                extras_marker: Some(' '),
                format: Some(OutputFormat::Text),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "concurrency: [not a number").unwrap();
        assert!(ConfigFile::load(&path).is_err());
        assert!(ConfigFile::load(dir.path().join("missing.json")).is_err());
    }
}
