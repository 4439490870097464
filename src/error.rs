//! Unified error hierarchy for liftrs
//!
//! The analytics engine favors graceful degeneracy: insufficient data
//! produces well-defined degenerate results instead of errors. Errors here
//! signal caller contract violations and boundary failures only.

use thiserror::Error;

/// Top-level error type for all liftrs operations
#[derive(Debug, Error)]
pub enum LiftrsError {
    /// Caller contract violation (unsorted log, malformed schedule week).
    /// Always a programmer error, never worked around silently.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Calculation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Log import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Calculation errors
#[derive(Debug, Error)]
pub enum CalculationError {
    /// Insufficient data for calculation
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData { calculation: String, reason: String },

    /// Invalid parameter
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },

    /// Division by zero
    #[error("Division by zero in {calculation}")]
    DivisionByZero { calculation: String },
}

/// Workout-log import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// Unsupported file format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    ParseError { format: String, reason: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Field value violates a model invariant
    #[error("Invalid value in {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type alias for liftrs operations
pub type Result<T> = std::result::Result<T, LiftrsError>;

impl LiftrsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftrsError::InvalidInput(_) => ErrorSeverity::Error,
            LiftrsError::Calculation(_) => ErrorSeverity::Warning,
            LiftrsError::Import(_) => ErrorSeverity::Warning,
            LiftrsError::Configuration(_) => ErrorSeverity::Error,
            LiftrsError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftrsError::InvalidInput(reason) => {
                format!("The request could not be processed: {}", reason)
            }
            LiftrsError::Import(ImportError::ParseError { format, .. }) => {
                format!("Could not read the workout log ({} format)", format)
            }
            LiftrsError::Import(ImportError::UnsupportedFormat { format }) => {
                format!("Unsupported log format: {}", format)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation but the system can continue
    Error,
    /// Warning that doesn't prevent operation
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
