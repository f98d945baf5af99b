//! Error types for the Leap adapter.

use rapq_hal::HalError;
use thiserror::Error;

/// Result type for Leap operations.
pub type LeapResult<T> = Result<T, LeapError>;

/// Errors that can occur when using the Leap hybrid solver.
#[derive(Debug, Error)]
pub enum LeapError {
    /// Missing API token.
    #[error("Leap API token not found. Set the DWAVE_API_TOKEN environment variable.")]
    MissingToken,

    /// Invalid API token.
    #[error("Invalid Leap API token")]
    InvalidToken,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("Leap API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Problem not found.
    #[error("Problem not found: {0}")]
    ProblemNotFound(String),

    /// Problem failed on the solver.
    #[error("Problem failed: {0}")]
    ProblemFailed(String),

    /// Problem was cancelled.
    #[error("Problem was cancelled: {0}")]
    ProblemCancelled(String),

    /// Solver not available.
    #[error("Solver not available: {0}")]
    SolverUnavailable(String),

    /// Answer could not be interpreted.
    #[error("Malformed answer: {0}")]
    MalformedAnswer(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<LeapError> for HalError {
    fn from(e: LeapError) -> Self {
        match e {
            LeapError::MissingToken | LeapError::InvalidToken => {
                HalError::AuthenticationFailed(e.to_string())
            }
            LeapError::ApiError { status: 401 | 403, .. } => {
                HalError::AuthenticationFailed(e.to_string())
            }
            LeapError::ProblemNotFound(id) => HalError::JobNotFound(id),
            LeapError::ProblemFailed(msg) => HalError::JobFailed(msg),
            LeapError::ProblemCancelled(_) => HalError::JobCancelled,
            LeapError::SolverUnavailable(msg) => HalError::SolverUnavailable(msg),
            LeapError::InvalidParameter(msg) => HalError::Configuration(msg),
            LeapError::HttpError(err) => HalError::Network(err),
            LeapError::JsonError(err) => HalError::Serialization(err),
            LeapError::ApiError { .. } | LeapError::MalformedAnswer(_) => {
                HalError::Solver(e.to_string())
            }
        }
    }
}
