//! Configuration errors.

use thiserror::Error;

/// Errors raised while building tracker or host configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Threshold outside `[0.0, 1.0]` or not a number.
    #[error("Intersection threshold must be within [0.0, 1.0], got {0}")]
    InvalidThreshold(f32),

    /// A setting could not be parsed from its textual form.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue {
        /// The setting name (e.g. an environment variable).
        key: String,
        /// The raw value that failed to parse.
        value: String,
    },
}
