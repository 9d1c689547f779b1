//! Unified error hierarchy for healthweek
//!
//! Partial data and rejected navigation are not errors; they are resolved by
//! the normalizer and the window navigator. What remains here are precondition
//! violations, input validation failures, and I/O around the engine.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all healthweek operations
#[derive(Debug, Error)]
pub enum HealthWeekError {
    /// Aggregation precondition violations
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Report formatting errors
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors raised when folding a window of daily records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// No daily records were supplied for the window
    #[error("cannot aggregate an empty window{}", window_suffix(.start))]
    EmptyWindow { start: Option<NaiveDate> },
}

fn window_suffix(start: &Option<NaiveDate>) -> String {
    match start {
        Some(date) => format!(" starting {}", date),
        None => String::new(),
    }
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Date string is not ISO `YYYY-MM-DD`
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Records file could not be found
    #[error("Records file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unsupported option value
    #[error("Unsupported {option}: {value}")]
    Unsupported { option: String, value: String },
}

/// Result type alias for healthweek operations
pub type Result<T> = std::result::Result<T, HealthWeekError>;

impl HealthWeekError {
    /// Whether the caller should show a loading placeholder rather than an error
    pub fn is_loading_state(&self) -> bool {
        matches!(
            self,
            HealthWeekError::Aggregation(AggregationError::EmptyWindow { .. })
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HealthWeekError::Aggregation(AggregationError::EmptyWindow { .. }) => {
                ErrorSeverity::Warning
            }
            HealthWeekError::Validation(_) => ErrorSeverity::Warning,
            HealthWeekError::Configuration(_) => ErrorSeverity::Error,
            HealthWeekError::Io(_) | HealthWeekError::Json(_) | HealthWeekError::Format(_) => {
                ErrorSeverity::Error
            }
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            HealthWeekError::Aggregation(AggregationError::EmptyWindow { .. }) => {
                "Loading health data...".to_string()
            }
            HealthWeekError::Validation(ValidationError::FileNotFound { path }) => {
                format!("Could not find records file: {}", path.display())
            }
            HealthWeekError::Validation(ValidationError::InvalidDate { value }) => {
                format!("'{}' is not a valid date. Use the YYYY-MM-DD format.", value)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent the rest of the view from rendering
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
