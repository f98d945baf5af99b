//! Error types for the CQM crate.

use thiserror::Error;

/// Errors that can occur while building or evaluating a model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CqmError {
    /// A constraint with this label already exists.
    #[error("Constraint '{0}' already exists in model")]
    DuplicateConstraint(String),

    /// Constraint label was empty.
    #[error("Constraint label must not be empty")]
    EmptyLabel,

    /// Constraint not found.
    #[error("Constraint '{0}' not found in model")]
    ConstraintNotFound(String),

    /// Sample is missing a model variable.
    #[error("Sample has no value for variable '{0}'")]
    MissingVariable(String),

    /// Sample assigns something other than 0 or 1.
    #[error("Variable '{label}' must be 0 or 1, got {value}")]
    NonBinaryValue {
        /// Variable label.
        label: String,
        /// Offending value.
        value: u8,
    },

    /// A coefficient or bound is NaN or infinite.
    #[error("Non-finite coefficient {value} for '{context}'")]
    NonFinite {
        /// Where the value appeared.
        context: String,
        /// The value itself.
        value: f64,
    },
}

/// Result type for CQM operations.
pub type CqmResult<T> = Result<T, CqmError>;
