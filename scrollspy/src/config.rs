//! Tracker configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Minimum fraction of an element's area that must be inside the viewport for
/// the element to count as visible.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f32);

impl Threshold {
    /// 10% of the element's area.
    pub const DEFAULT: Self = Self(0.1);

    /// Any overlap at all.
    pub const ANY: Self = Self(0.0);

    /// The whole element.
    pub const FULL: Self = Self(1.0);

    pub fn new(fraction: f32) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(ConfigError::InvalidThreshold(fraction))
        }
    }

    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Threshold {
    type Error = ConfigError;

    fn try_from(fraction: f32) -> Result<Self, Self::Error> {
        Self::new(fraction)
    }
}

impl FromStr for Threshold {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fraction: f32 = s.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: "threshold".to_string(),
            value: s.to_string(),
        })?;
        Self::new(fraction)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for a [`ViewportTracker`](crate::ViewportTracker).
///
/// # Example
///
/// ```
/// use scrollspy::{Threshold, TrackerConfig};
///
/// let config = TrackerConfig::default().with_threshold(Threshold::new(0.5).unwrap());
/// assert_eq!(config.threshold.get(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Visibility threshold applied to every observed element.
    ///
    /// Default: 0.1
    pub threshold: Threshold,
}

impl TrackerConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the visibility threshold.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }
}
