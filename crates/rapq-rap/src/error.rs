//! Error types for the RAP formulation.

use rapq_cqm::CqmError;
use thiserror::Error;

/// Errors raised while validating a problem or assembling its model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RapError {
    /// No component types were given.
    #[error("At least one component type is required")]
    NoComponents,

    /// Two parallel sequences disagree in length.
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        /// Which input is inconsistent.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// A reliability lies outside the open interval (0, 1).
    #[error("Reliability of component {index} must be strictly between 0 and 1, got {value}")]
    ReliabilityOutOfRange {
        /// Component index (0-based).
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A unit cost is NaN or infinite.
    #[error("Cost of component {index} must be finite, got {value}")]
    NonFiniteCost {
        /// Component index (0-based).
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// The budget is NaN or infinite.
    #[error("Budget must be finite, got {0}")]
    NonFiniteBudget(f64),

    /// Lower count bound exceeds the upper bound.
    #[error("n_min ({n_min}) must not exceed n_max ({n_max})")]
    BoundsInverted {
        /// Lower bound.
        n_min: u32,
        /// Upper bound.
        n_max: u32,
    },

    /// The model builder rejected the formulation.
    #[error("Model error: {0}")]
    Model(#[from] CqmError),
}

/// Result type for RAP operations.
pub type RapResult<T> = Result<T, RapError>;
