//! Sampler trait and configuration.
//!
//! The [`Sampler`] trait defines the lifecycle for sending a constrained
//! quadratic model to a solver:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! Most callers only need [`Sampler::sample_cqm`], which chains the whole
//! lifecycle and blocks (asynchronously) until the solver answers.
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&SolverCapabilities` |
//! | `availability()` | async | yes | `HalResult<SolverAvailability>` |
//! | `validate()` | async | provided | `HalResult<ValidationResult>` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<SampleSet>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<SampleSet>` |
//! | `sample_cqm()` | async | provided | `HalResult<SampleSet>` |

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rapq_cqm::ConstrainedQuadraticModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::SolverCapabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::sampleset::SampleSet;

/// Configuration for a solver instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Name of the solver.
    pub name: String,
    /// API endpoint URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Authentication token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SolverConfig {
    /// Create a new solver configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the authentication token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Solver availability information.
#[derive(Debug, Clone)]
pub struct SolverAvailability {
    /// Whether the solver is currently accepting problems.
    pub is_available: bool,
    /// Estimated wait time for a new problem (if known).
    pub estimated_wait: Option<Duration>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl SolverAvailability {
    /// Availability for an in-process solver.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            estimated_wait: Some(Duration::ZERO),
            status_message: None,
        }
    }

    /// Availability for an offline solver.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            estimated_wait: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of checking a model against solver limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Model can be submitted as-is.
    Valid,
    /// Model cannot run on this solver.
    Invalid {
        /// Reasons the model is rejected.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check the model against a capability descriptor.
    pub fn check(caps: &SolverCapabilities, cqm: &ConstrainedQuadraticModel) -> Self {
        let mut reasons = Vec::new();
        if cqm.num_variables() > caps.max_variables {
            reasons.push(format!(
                "model has {} variables but {} supports at most {}",
                cqm.num_variables(),
                caps.name,
                caps.max_variables
            ));
        }
        if cqm.num_constraints() > caps.max_constraints {
            reasons.push(format!(
                "model has {} constraints but {} supports at most {}",
                cqm.num_constraints(),
                caps.name,
                caps.max_constraints
            ));
        }
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    /// Check if the model is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for CQM solvers.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible, cached at
///   construction.
/// - `submit()` MUST return a `JobId` whose status is `Queued`, or already
///   terminal for solvers that run inline.
/// - `result()` MUST only be called when status is `Completed`.
/// - The model is borrowed; solvers never mutate it.
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Get the name of this solver.
    fn name(&self) -> &str;

    /// Get the capabilities of this solver.
    fn capabilities(&self) -> &SolverCapabilities;

    /// Check solver availability.
    async fn availability(&self) -> HalResult<SolverAvailability>;

    /// Validate a model against solver limits.
    async fn validate(&self, cqm: &ConstrainedQuadraticModel) -> HalResult<ValidationResult> {
        Ok(ValidationResult::check(self.capabilities(), cqm))
    }

    /// Submit a model under a problem label.
    async fn submit(&self, cqm: &ConstrainedQuadraticModel, label: &str) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the sample set of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<SampleSet>;

    /// Cancel a pending job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Interval between status polls in [`Sampler::wait`].
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(500)
    }

    /// Upper bound on the time [`Sampler::wait`] blocks.
    fn max_wait(&self) -> Duration {
        Duration::from_secs(600)
    }

    /// Wait for a job to complete and return its sample set.
    async fn wait(&self, job_id: &JobId) -> HalResult<SampleSet> {
        let interval = self.poll_interval();
        let deadline = tokio::time::Instant::now() + self.max_wait();

        loop {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(HalError::Timeout(job_id.0.clone()));
                    }
                    debug!("job {job_id} pending, polling again in {interval:?}");
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    /// Validate, submit, and wait for a model in one call.
    async fn sample_cqm(
        &self,
        cqm: &ConstrainedQuadraticModel,
        label: &str,
    ) -> HalResult<SampleSet> {
        if let ValidationResult::Invalid { reasons } = self.validate(cqm).await? {
            return Err(HalError::InvalidModel(reasons.join("; ")));
        }
        let job_id = self.submit(cqm, label).await?;
        info!(solver = self.name(), %job_id, label, "problem submitted");
        self.wait(&job_id).await
    }
}

/// Trait for creating samplers from configuration.
pub trait SamplerFactory: Sampler + Sized {
    /// Create a sampler from configuration.
    fn from_config(config: SolverConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapq_cqm::{Binary, LinearExpr};

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::new("leap")
            .with_endpoint("https://api.example.com")
            .with_token("secret-token")
            .with_extra("time_limit", serde_json::json!(5));

        assert_eq!(config.name, "leap");
        assert_eq!(config.endpoint, Some("https://api.example.com".to_string()));
        assert_eq!(config.token, Some("secret-token".to_string()));
        assert!(config.extra.contains_key("time_limit"));
    }

    #[test]
    fn test_solver_config_debug_redacts_token() {
        let config = SolverConfig::new("leap").with_token("secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_solver_config_never_serializes_token() {
        let config = SolverConfig::new("leap").with_token("secret-token");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn test_availability() {
        assert!(SolverAvailability::always_available().is_available);
        let down = SolverAvailability::unavailable("maintenance");
        assert!(!down.is_available);
        assert_eq!(down.status_message, Some("maintenance".to_string()));
    }

    #[test]
    fn test_validation_rejects_oversized_model() {
        let vars: Vec<Binary> = (0..3).map(|i| Binary::new(format!("x{i}"))).collect();
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(LinearExpr::weighted_sum(&vars, &[1.0, 1.0, 1.0]))
            .unwrap();

        let caps = SolverCapabilities::exact(2);
        let result = ValidationResult::check(&caps, &cqm);
        assert!(!result.is_valid());

        let caps = SolverCapabilities::exact(3);
        assert!(ValidationResult::check(&caps, &cqm).is_valid());
    }
}
