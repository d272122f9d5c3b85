//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll computation.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     id: "emp_042".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_042");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No employee exists for the requested identifier.
    ///
    /// Fatal for that single employee; a batch converts it into a
    /// per-employee failure entry and keeps going.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee identifier that was not found.
        id: String,
    },

    /// Malformed input, such as an unparseable month string or an
    /// expression that fails the arithmetic character gate.
    #[error("Validation error: {message}")]
    Validation {
        /// A description of what made the input invalid.
        message: String,
    },

    /// A data-store call failed or timed out.
    ///
    /// Surfaced as a per-employee failure in a batch; the engine does not
    /// retry. Retrying a single employee is the caller's concern.
    #[error("Backend error during {operation}: {message}")]
    Backend {
        /// The store operation that failed (e.g. "attendance_for_month").
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// The cancellation flag was observed set.
    ///
    /// Propagates up to stop the batch loop cleanly; never recorded as a
    /// per-employee failure.
    #[error("Calculation cancelled")]
    Cancelled,

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Builds a backend error for a named store operation.
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors that must stop a batch rather than be
    /// recorded against a single employee.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
