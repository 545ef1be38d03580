//! Viewer configuration.
//!
//! Every setting has a default and can be overridden from a `SCROLLSPY_*`
//! environment variable.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use scrollspy::{ConfigError, Threshold};

const ENV_THRESHOLD: &str = "SCROLLSPY_THRESHOLD";
const ENV_LOAD_DELAY_MS: &str = "SCROLLSPY_LOAD_DELAY_MS";
const ENV_SECTIONS: &str = "SCROLLSPY_SECTIONS";
const ENV_LOG_FILE: &str = "SCROLLSPY_LOG_FILE";
const ENV_LOG_LEVEL: &str = "SCROLLSPY_LOG_LEVEL";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Fraction of a section that must be on screen before it counts as visible.
    ///
    /// Default: 0.1
    pub threshold: Threshold,

    /// Simulated time to fetch a section's content.
    ///
    /// Default: 600ms
    pub load_delay: Duration,

    /// Number of sections in the document.
    ///
    /// Default: 12
    pub sections: usize,

    /// Where log output goes.
    ///
    /// Default: `scrollspy.log`
    pub log_file: PathBuf,

    /// Default: debug
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::DEFAULT,
            load_delay: Duration::from_millis(600),
            sections: 12,
            log_file: PathBuf::from("scrollspy.log"),
            log_level: LevelFilter::Debug,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_THRESHOLD) {
            config.threshold = value.parse()?;
        }
        if let Some(value) = lookup(ENV_LOAD_DELAY_MS) {
            config.load_delay = Duration::from_millis(parse(ENV_LOAD_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_SECTIONS) {
            config.sections = parse(ENV_SECTIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_LOG_FILE) {
            config.log_file = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            config.log_level = parse(ENV_LOG_LEVEL, &value)?;
        }

        Ok(config)
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn with_sections(mut self, sections: usize) -> Self {
        self.sections = sections;
        self
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.threshold, Threshold::DEFAULT);
        assert_eq!(config.sections, 12);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SCROLLSPY_THRESHOLD", "0.5"),
            ("SCROLLSPY_LOAD_DELAY_MS", "25"),
            ("SCROLLSPY_SECTIONS", "3"),
            ("SCROLLSPY_LOG_FILE", "/tmp/spy.log"),
            ("SCROLLSPY_LOG_LEVEL", "trace"),
        ]))
        .unwrap();

        assert_eq!(config.threshold.get(), 0.5);
        assert_eq!(config.load_delay, Duration::from_millis(25));
        assert_eq!(config.sections, 3);
        assert_eq!(config.log_file, PathBuf::from("/tmp/spy.log"));
        assert_eq!(config.log_level, LevelFilter::Trace);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[("SCROLLSPY_SECTIONS", "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "SCROLLSPY_SECTIONS".to_string(),
                value: "many".to_string(),
            }
        );

        let err = AppConfig::from_lookup(lookup(&[("SCROLLSPY_THRESHOLD", "3")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidThreshold(3.0));
    }
}
