//! Leap hybrid CQM sampler implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rapq_cqm::{Binary, ConstrainedQuadraticModel, Sample};
use rapq_hal::{
    DWAVE_TOKEN_ENV, HalError, HalResult, Job, JobId, JobStatus, SampleRecord, SampleSet, Sampler,
    SamplerFactory, SolverAvailability, SolverCapabilities, SolverConfig, TokenProvider,
    ValidationResult,
};
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::api::{Answer, DEFAULT_ENDPOINT, DEFAULT_SOLVER, LeapClient, ProblemStatus, SolverInfo};
use crate::error::{LeapError, LeapResult};

/// Environment variable overriding the SAPI endpoint.
pub const DWAVE_ENDPOINT_ENV: &str = "DWAVE_API_ENDPOINT";

/// How long to cache solver properties before refreshing from the API.
const SOLVER_INFO_TTL: Duration = Duration::from_secs(5 * 60);

/// A submitted problem, kept until its answer is fetched so the answer can
/// be re-evaluated locally.
struct Submitted {
    job: Job,
    cqm: ConstrainedQuadraticModel,
}

/// Leap hybrid CQM solver adapter.
pub struct LeapHybridCqmSampler {
    /// API client.
    client: Arc<LeapClient>,
    /// Target solver name.
    solver: String,
    /// Optional run-time limit in seconds.
    time_limit: Option<f64>,
    /// Cached capabilities.
    capabilities: SolverCapabilities,
    /// Cached solver info with fetch timestamp for TTL-based refresh.
    solver_info: Arc<RwLock<Option<(SolverInfo, Instant)>>>,
    /// Problems awaiting their answer, keyed by problem id.
    submitted: Arc<RwLock<FxHashMap<String, Submitted>>>,
}

impl LeapHybridCqmSampler {
    /// Create a sampler with default settings.
    ///
    /// Reads the token from `DWAVE_API_TOKEN` and the endpoint from
    /// `DWAVE_API_ENDPOINT`, falling back to the public SAPI endpoint.
    pub fn new() -> LeapResult<Self> {
        let token = std::env::var(DWAVE_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(LeapError::MissingToken)?;
        let endpoint =
            std::env::var(DWAVE_ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Self::build(LeapClient::new(endpoint, &token)?, DEFAULT_SOLVER, None)
    }

    /// Create a sampler with a token from any provider.
    pub async fn connect(
        provider: &dyn TokenProvider,
        endpoint: impl Into<String>,
        solver: impl Into<String>,
    ) -> LeapResult<Self> {
        let token = provider
            .get_token()
            .await
            .map_err(|_| LeapError::MissingToken)?;
        Self::build(LeapClient::new(endpoint, &token)?, solver, None)
    }

    /// Create a sampler with explicit configuration.
    ///
    /// Recognised `extra` keys: `solver` (name) and `time_limit` (seconds).
    pub fn with_config(config: SolverConfig) -> LeapResult<Self> {
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let token = config.token.as_deref().ok_or(LeapError::MissingToken)?;

        let solver = config
            .extra
            .get("solver")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_SOLVER);

        let time_limit = match config.extra.get("time_limit") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(v.as_f64().ok_or_else(|| {
                LeapError::InvalidParameter(format!("time_limit must be a number, got {v}"))
            })?),
        };

        Self::build(LeapClient::new(endpoint, token)?, solver, time_limit)
    }

    fn build(
        client: LeapClient,
        solver: impl Into<String>,
        time_limit: Option<f64>,
    ) -> LeapResult<Self> {
        let time_limit = time_limit.map(check_time_limit).transpose()?;
        let solver = solver.into();
        Ok(Self {
            client: Arc::new(client),
            capabilities: SolverCapabilities::hybrid_cqm(&solver),
            solver,
            time_limit,
            solver_info: Arc::new(RwLock::new(None)),
            submitted: Arc::new(RwLock::new(FxHashMap::default())),
        })
    }

    /// Set the run-time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> LeapResult<Self> {
        self.time_limit = Some(check_time_limit(seconds)?);
        Ok(self)
    }

    /// Target solver name.
    pub fn solver(&self) -> &str {
        &self.solver
    }

    /// Configured run-time limit.
    pub fn time_limit(&self) -> Option<f64> {
        self.time_limit
    }

    /// List every remote solver that accepts constrained quadratic models.
    pub async fn list_cqm_solvers(&self) -> HalResult<Vec<SolverInfo>> {
        let solvers = self.client.list_solvers().await?;
        Ok(solvers.into_iter().filter(SolverInfo::supports_cqm).collect())
    }

    /// Get solver information, fetching from API if not cached or stale.
    async fn get_solver_info(&self) -> LeapResult<SolverInfo> {
        {
            let cached = self.solver_info.read().await;
            if let Some((ref info, fetched_at)) = *cached {
                if fetched_at.elapsed() < SOLVER_INFO_TTL {
                    return Ok(info.clone());
                }
            }
        }

        let info = self.client.get_solver(&self.solver).await?;

        {
            let mut cached = self.solver_info.write().await;
            *cached = Some((info.clone(), Instant::now()));
        }

        Ok(info)
    }

    async fn remember(&self, job: Job, cqm: &ConstrainedQuadraticModel) {
        self.submitted.write().await.insert(
            job.id.0.clone(),
            Submitted {
                job,
                cqm: cqm.clone(),
            },
        );
    }

    async fn forget(&self, job_id: &JobId) -> Option<Submitted> {
        self.submitted.write().await.remove(&job_id.0)
    }
}

fn check_time_limit(seconds: f64) -> LeapResult<f64> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(LeapError::InvalidParameter(format!(
            "time_limit must be positive, got {seconds}"
        )))
    }
}

/// Map a SAPI problem status to a job status.
pub fn map_status(status: &ProblemStatus) -> JobStatus {
    if status.is_completed() {
        JobStatus::Completed
    } else if status.is_failed() {
        JobStatus::Failed(
            status
                .error_message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        )
    } else if status.is_cancelled() {
        JobStatus::Cancelled
    } else if status.is_pending() {
        JobStatus::Queued
    } else {
        // IN_PROGRESS and unknown states are still in flight
        JobStatus::Running
    }
}

/// Build a sample set from a SAPI answer.
///
/// With the submitted model at hand every sample is re-evaluated locally, so
/// energies and per-constraint feasibility are consistent with the model.
/// Otherwise the energies and feasibility flags of the answer are used.
pub fn answer_to_sample_set(
    label: &str,
    answer: &Answer,
    cqm: Option<&ConstrainedQuadraticModel>,
) -> LeapResult<SampleSet> {
    let width = answer.variables.len();
    let variables: Vec<Binary> = answer.variables.iter().map(Binary::new).collect();

    let mut set = SampleSet {
        label: label.to_string(),
        variables: cqm.map_or_else(|| variables.clone(), |m| m.variables().to_vec()),
        records: Vec::with_capacity(answer.samples.len()),
        info: answer.info.clone(),
    };

    for (i, row) in answer.samples.iter().enumerate() {
        if row.len() != width {
            return Err(LeapError::MalformedAnswer(format!(
                "sample {i} has {} values for {width} variables",
                row.len()
            )));
        }
        let sample = Sample::from_bits(&variables, row);
        let occurrences = answer.num_occurrences.get(i).copied().unwrap_or(1);

        let record = match cqm {
            Some(model) => SampleRecord::evaluate(model, sample, occurrences)
                .map_err(|e| LeapError::MalformedAnswer(e.to_string()))?,
            None => SampleRecord {
                sample,
                energy: *answer.energies.get(i).ok_or_else(|| {
                    LeapError::MalformedAnswer(format!("no energy for sample {i}"))
                })?,
                num_occurrences: occurrences,
                is_feasible: answer.is_feasible.get(i).copied().unwrap_or(false),
                is_satisfied: Default::default(),
            },
        };
        set.push(record);
    }

    set.sort();
    Ok(set)
}

#[async_trait]
impl Sampler for LeapHybridCqmSampler {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "leap"
    }

    fn capabilities(&self) -> &SolverCapabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<SolverAvailability> {
        match self.get_solver_info().await {
            Ok(info) if info.is_online() => Ok(SolverAvailability {
                is_available: true,
                estimated_wait: None,
                status_message: info.status,
            }),
            Ok(info) => Ok(SolverAvailability::unavailable(
                info.status.unwrap_or_else(|| "solver offline".to_string()),
            )),
            Err(e) => {
                warn!("Leap solver availability check failed: {e}");
                Ok(SolverAvailability::unavailable("failed to query solver"))
            }
        }
    }

    async fn validate(&self, cqm: &ConstrainedQuadraticModel) -> HalResult<ValidationResult> {
        let mut caps = self.capabilities.clone();
        let mut min_time = caps.min_time_limit_secs;

        // Prefer live limits; fall back to the cached defaults
        if let Ok(info) = self.get_solver_info().await {
            let props = &info.properties;
            if let Some(v) = props.maximum_number_of_variables {
                caps.max_variables = v;
            }
            if let Some(c) = props.maximum_number_of_constraints {
                caps.max_constraints = c;
            }
            min_time = props.min_time_limit(cqm.num_variables()).or(min_time);
        }

        let mut reasons = match ValidationResult::check(&caps, cqm) {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid { reasons } => reasons,
        };
        if let (Some(limit), Some(min)) = (self.time_limit, min_time) {
            if limit < min {
                reasons.push(format!(
                    "time_limit {limit}s is below the solver minimum of {min}s"
                ));
            }
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, cqm), fields(solver = %self.solver))]
    async fn submit(&self, cqm: &ConstrainedQuadraticModel, label: &str) -> HalResult<JobId> {
        let status = self
            .client
            .submit_problem(&self.solver, label, cqm, self.time_limit)
            .await
            .map_err(|e| match e {
                LeapError::MissingToken | LeapError::InvalidToken => HalError::from(e),
                LeapError::ApiError { status: 401 | 403, .. } => HalError::from(e),
                other => HalError::SubmissionFailed(other.to_string()),
            })?;

        debug!("Submitted problem {} ({})", status.id, status.status);

        let job_id = JobId::new(status.id.clone());
        let mut job = Job::submitted(job_id.clone(), label, &self.solver);
        job.advance(map_status(&status));
        self.remember(job, cqm).await;

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let status = map_status(&self.client.problem_status(&job_id.0).await?);
        if let Some(entry) = self.submitted.write().await.get_mut(&job_id.0) {
            entry.job.advance(status.clone());
        }
        Ok(status)
    }

    async fn result(&self, job_id: &JobId) -> HalResult<SampleSet> {
        let status = self.client.problem_status(&job_id.0).await?;
        match map_status(&status) {
            JobStatus::Completed => {}
            JobStatus::Failed(msg) => {
                self.forget(job_id).await;
                return Err(HalError::JobFailed(msg));
            }
            JobStatus::Cancelled => {
                self.forget(job_id).await;
                return Err(HalError::JobCancelled);
            }
            JobStatus::Queued | JobStatus::Running => {
                return Err(HalError::Solver(format!(
                    "Problem {} not yet completed",
                    job_id.0
                )));
            }
        }

        let answer = self.client.answer(&job_id.0).await?;

        // The answer is handed over once; drop the stored model with it
        let entry = self.forget(job_id).await;
        let label = entry
            .as_ref()
            .map(|s| s.job.label.as_str())
            .or(status.label.as_deref())
            .unwrap_or_default();

        let mut set = answer_to_sample_set(label, &answer, entry.as_ref().map(|s| &s.cqm))?;
        if let Some(mut submitted) = entry {
            submitted.job.advance(JobStatus::Completed);
            set = set.with_job(&submitted.job);
        }
        Ok(set.with_info("problem_id", serde_json::json!(job_id.0)))
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.client.cancel_problem(&job_id.0).await?;
        self.forget(job_id).await;
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(1)
    }
}

impl SamplerFactory for LeapHybridCqmSampler {
    fn from_config(config: SolverConfig) -> HalResult<Self> {
        Ok(Self::with_config(config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapq_cqm::{LinearExpr, Sense};

    fn status(s: &str) -> ProblemStatus {
        ProblemStatus {
            id: "p-1".into(),
            status: s.into(),
            solver: None,
            label: None,
            submitted_on: None,
            solved_on: None,
            error_message: None,
        }
    }

    fn model() -> ConstrainedQuadraticModel {
        let vars = [Binary::new("a"), Binary::new("b")];
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(LinearExpr::weighted_sum(&vars, &[-1.0, -2.0]))
            .unwrap();
        cqm.add_constraint(
            LinearExpr::weighted_sum(&vars, &[1.0, 1.0]),
            Sense::Le,
            1.0,
            "one_hot",
        )
        .unwrap();
        cqm
    }

    fn answer() -> Answer {
        Answer {
            format: Some("json".into()),
            variables: vec!["a".into(), "b".into()],
            samples: vec![vec![1, 1], vec![1, 0], vec![0, 1]],
            energies: vec![-3.0, -1.0, -2.0],
            num_occurrences: vec![1, 2, 4],
            is_feasible: vec![false, true, true],
            info: serde_json::Map::new(),
        }
    }

    fn config() -> SolverConfig {
        SolverConfig::new("leap")
            .with_endpoint("https://sapi.example.com")
            .with_token("DEV-test-token")
    }

    #[test]
    fn test_map_status() {
        assert_eq!(map_status(&status("PENDING")), JobStatus::Queued);
        assert_eq!(map_status(&status("completed")), JobStatus::Completed);
        assert_eq!(map_status(&status("IN_PROGRESS")), JobStatus::Running);
        assert_eq!(map_status(&status("COMPLETED")), JobStatus::Completed);
        assert_eq!(map_status(&status("CANCELLED")), JobStatus::Cancelled);
        assert_eq!(map_status(&status("whatever")), JobStatus::Running);

        let mut failed = status("FAILED");
        failed.error_message = Some("bad model".into());
        assert_eq!(
            map_status(&failed),
            JobStatus::Failed("bad model".to_string())
        );
    }

    #[test]
    fn test_answer_reevaluated_against_model() {
        let cqm = model();
        let set = answer_to_sample_set("RAP", &answer(), Some(&cqm)).unwrap();

        assert_eq!(set.label, "RAP");
        assert_eq!(set.len(), 3);
        let best = set.best_feasible().unwrap();
        assert_eq!(best.energy, -2.0);
        assert_eq!(best.num_occurrences, 4);
        assert!(best.is_satisfied["one_hot"]);
        assert!(!set.records[2].is_feasible);
    }

    #[test]
    fn test_answer_without_model_uses_reported_values() {
        let set = answer_to_sample_set("RAP", &answer(), None).unwrap();
        assert_eq!(set.records[0].energy, -2.0);
        assert!(set.records[0].is_feasible);
        assert!(set.records[0].is_satisfied.is_empty());
        assert_eq!(set.total_occurrences(), 7);
    }

    #[test]
    fn test_answer_with_ragged_row_is_rejected() {
        let mut bad = answer();
        bad.samples[1] = vec![1];
        assert!(matches!(
            answer_to_sample_set("RAP", &bad, None),
            Err(LeapError::MalformedAnswer(_))
        ));
    }

    #[test]
    fn test_with_config() {
        let sampler = LeapHybridCqmSampler::with_config(
            config().with_extra("time_limit", serde_json::json!(10)),
        )
        .unwrap();
        assert_eq!(sampler.solver(), DEFAULT_SOLVER);
        assert_eq!(sampler.time_limit(), Some(10.0));
        assert!(!sampler.capabilities().is_local);
        assert_eq!(sampler.name(), "leap");
    }

    #[test]
    fn test_with_config_custom_solver() {
        let sampler = LeapHybridCqmSampler::with_config(
            config().with_extra("solver", serde_json::json!("hybrid_cqm_test")),
        )
        .unwrap();
        assert_eq!(sampler.solver(), "hybrid_cqm_test");
        assert_eq!(sampler.capabilities().name, "hybrid_cqm_test");
    }

    #[test]
    fn test_with_config_requires_token() {
        let result = LeapHybridCqmSampler::with_config(SolverConfig::new("leap"));
        assert!(matches!(result, Err(LeapError::MissingToken)));
    }

    #[test]
    fn test_with_config_rejects_bad_time_limit() {
        let result = LeapHybridCqmSampler::with_config(
            config().with_extra("time_limit", serde_json::json!("soon")),
        );
        assert!(matches!(result, Err(LeapError::InvalidParameter(_))));

        let result = LeapHybridCqmSampler::with_config(
            config().with_extra("time_limit", serde_json::json!(-1.0)),
        );
        assert!(matches!(result, Err(LeapError::InvalidParameter(_))));
    }

    #[test]
    fn test_with_time_limit_is_checked() {
        let sampler = LeapHybridCqmSampler::with_config(config()).unwrap();
        let sampler = sampler.with_time_limit(12.5).unwrap();
        assert_eq!(sampler.time_limit(), Some(12.5));

        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                sampler_with(bad),
                Err(LeapError::InvalidParameter(_))
            ));
        }
    }

    fn sampler_with(time_limit: f64) -> LeapResult<LeapHybridCqmSampler> {
        LeapHybridCqmSampler::with_config(config())?.with_time_limit(time_limit)
    }

    #[tokio::test]
    async fn test_submitted_entries_are_released() {
        let sampler = LeapHybridCqmSampler::with_config(config()).unwrap();
        let job_id = JobId::new("p-1");
        sampler
            .remember(Job::submitted(job_id.clone(), "RAP", "hybrid_x"), &model())
            .await;
        assert_eq!(sampler.submitted.read().await.len(), 1);

        let entry = sampler.forget(&job_id).await.unwrap();
        assert_eq!(entry.job.label, "RAP");
        assert_eq!(entry.cqm.num_variables(), 2);
        assert!(sampler.submitted.read().await.is_empty());
        assert!(sampler.forget(&job_id).await.is_none());
    }

    #[test]
    fn test_factory_maps_missing_token() {
        let result = LeapHybridCqmSampler::from_config(SolverConfig::new("leap"));
        assert!(matches!(result, Err(HalError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    async fn test_connect_with_static_token() {
        let provider = rapq_hal::StaticTokenProvider::new("DEV-test-token");
        let sampler =
            LeapHybridCqmSampler::connect(&provider, "https://sapi.example.com", "hybrid_x")
                .await
                .unwrap();
        assert_eq!(sampler.solver(), "hybrid_x");
    }
}
