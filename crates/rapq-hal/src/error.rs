//! Error types for the HAL crate.

use rapq_cqm::CqmError;
use thiserror::Error;

/// Errors that can occur in solver operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Solver is not available.
    #[error("Solver not available: {0}")]
    SolverUnavailable(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Authentication error (missing or malformed token).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Problem submission failed.
    #[error("Problem submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Model rejected by the solver.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Model could not be evaluated.
    #[error("Model error: {0}")]
    Model(#[from] CqmError),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// Model exceeds solver capabilities.
    #[error("Problem exceeds solver capabilities: {0}")]
    ProblemTooLarge(String),

    /// Generic solver error.
    #[error("Solver error: {0}")]
    Solver(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
