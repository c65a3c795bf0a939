//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during classification,
//! ledger reconciliation and overtime rating.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::NoScheduleAssigned {
///     employee_id: "emp_001".to_string(),
///     date: chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No work schedule assigned to employee 'emp_001' as of 2026-02-01"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input was malformed and rejected before any write.
    #[error("Validation error in '{field}': {message}")]
    Validation {
        /// The field or argument that failed validation.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A write would violate a structural constraint and was rejected,
    /// never silently coerced.
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        /// A description of the violated constraint.
        message: String,
    },

    /// No schedule assignment covers the requested date for the employee.
    #[error("No work schedule assigned to employee '{employee_id}' as of {date}")]
    NoScheduleAssigned {
        /// The employee whose schedule was requested.
        employee_id: String,
        /// The date of the lookup.
        date: NaiveDate,
    },

    /// The stored day-status validation constraint disagrees with the
    /// in-code enum. Fatal at startup; the engine refuses to serve.
    #[error("Configuration inconsistency: {message}")]
    ConfigurationInconsistency {
        /// A description of the divergence.
        message: String,
    },

    /// A holiday add/remove reclassification failed part-way; the whole
    /// cascade was rolled back.
    #[error("Holiday cascade failed for {date}: {message}")]
    CascadeFailure {
        /// The holiday date whose cascade failed.
        date: NaiveDate,
        /// A description including the failing row(s).
        message: String,
    },

    /// A policy cap refused the operation. Distinct from validation:
    /// the input was well-formed but exceeds a configured limit.
    #[error("Policy rejection: {message} (cap: {cap})")]
    PolicyRejection {
        /// A description of the rejected operation.
        message: String,
        /// The specific cap that was exceeded.
        cap: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A requested entity does not exist.
    #[error("Not found: {entity} '{id}'")]
    NotFound {
        /// The kind of entity (e.g. "recovery_declaration").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },
}

impl EngineError {
    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a constraint violation error.
    pub fn constraint(message: impl Into<String>) -> Self {
        EngineError::ConstraintViolation {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
