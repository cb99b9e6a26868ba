//! Environment variable configuration
//!
//! Provides `BEHAT_PARALLEL_*` overrides for configuration.

use std::env;

use super::{expand_path, RunConfig};
use crate::output::OutputFormat;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BEHAT_PARALLEL";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Concurrency from BEHAT_PARALLEL_CONCURRENCY
    pub concurrency: Option<usize>,
    /// Executable from BEHAT_PARALLEL_BIN
    pub bin: Option<String>,
    /// Feature directory from BEHAT_PARALLEL_FEATURES
    pub features: Option<String>,
    /// Config file from BEHAT_PARALLEL_CONFIG
    pub config_file: Option<String>,
    /// Disable colors from BEHAT_PARALLEL_NO_COLOR
    pub no_color: Option<bool>,
    /// Report format from BEHAT_PARALLEL_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));
        Self {
            concurrency: get("CONCURRENCY").and_then(|v| v.parse().ok()),
            bin: get("BIN"),
            features: get("FEATURES"),
            config_file: get("CONFIG"),
            no_color: get("NO_COLOR").map(|v| parse_bool(&v)),
            format: get("FORMAT"),
        }
    }

    /// Override the fields set in the environment
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
        if let Some(no_color) = self.no_color {
            config.colorize = !no_color;
        }
        if let Some(format) = self.format.as_deref().and_then(OutputFormat::from_str) {
            config.format = format;
        }
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(
        v.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_config_empty() {
        let config = EnvConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EnvConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let env = EnvConfig::from_lookup(lookup(&[
            ("BEHAT_PARALLEL_CONCURRENCY", "6"),
            ("BEHAT_PARALLEL_BIN", "vendor/bin/behat"),
            ("BEHAT_PARALLEL_NO_COLOR", "yes"),
            ("BEHAT_PARALLEL_FORMAT", "JSON"),
        ]));
        assert_eq!(env.concurrency, Some(6));

        let mut config = RunConfig::default();
        env.apply(&mut config);
        assert_eq!(config.concurrency, 6);
        assert_eq!(config.bin_path, PathBuf::from("vendor/bin/behat"));
        assert!(!config.colorize);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_env_invalid_values_ignored() {
        let env = EnvConfig::from_lookup(lookup(&[
            ("BEHAT_PARALLEL_CONCURRENCY", "many"),
            ("BEHAT_PARALLEL_FORMAT", "xml"),
        ]));
        let mut config = RunConfig::default();
        let before = config.clone();
        env.apply(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
    }
}
