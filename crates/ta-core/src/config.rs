//! Validated analysis settings.

use thiserror::Error;

/// Validation errors for analysis settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A pattern was empty or whitespace only.
    #[error("{field} cannot be empty")]
    EmptyPattern { field: &'static str },

    /// The threshold was negative, infinite or NaN.
    #[error("threshold must be a finite number of seconds >= 0, got {value}")]
    InvalidThreshold { value: f64 },
}

/// Patterns and threshold for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    entry_pattern: String,
    exit_pattern: String,
    threshold_seconds: f64,
}

impl AnalyzerConfig {
    /// Creates settings after validation.
    pub fn new(
        entry_pattern: impl Into<String>,
        exit_pattern: impl Into<String>,
        threshold_seconds: f64,
    ) -> Result<Self, ValidationError> {
        let entry_pattern = entry_pattern.into();
        let exit_pattern = exit_pattern.into();

        if entry_pattern.trim().is_empty() {
            return Err(ValidationError::EmptyPattern {
                field: "entry pattern",
            });
        }
        if exit_pattern.trim().is_empty() {
            return Err(ValidationError::EmptyPattern {
                field: "exit pattern",
            });
        }
        if !threshold_seconds.is_finite() || threshold_seconds < 0.0 {
            return Err(ValidationError::InvalidThreshold {
                value: threshold_seconds,
            });
        }

        Ok(Self {
            entry_pattern,
            exit_pattern,
            threshold_seconds,
        })
    }

    pub fn entry_pattern(&self) -> &str {
        &self.entry_pattern
    }

    pub fn exit_pattern(&self) -> &str {
        &self.exit_pattern
    }

    pub const fn threshold_seconds(&self) -> f64 {
        self.threshold_seconds
    }
}
