//! Error types for the canvas crate.
//!
//! Numeric paths never fail; they sanitize their inputs instead. Errors only
//! surface when configuration or a textual drag step cannot be parsed.

/// Error returned while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was set but did not parse.
    #[error("invalid value for {key}: {value:?}")]
    Parse { key: String, value: String },
    /// A parameter parsed but falls outside its legal range.
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange { field: &'static str, value: f64, expected: &'static str },
}

/// Error returned when a textual drag step does not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid drag step {input:?} (expected \"dx,dy\" or \"dx,dy,up\")")]
pub struct DeltaParseError {
    pub input: String,
}
