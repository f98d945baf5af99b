//! Exhaustive solver implementation.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use rapq_cqm::{ConstrainedQuadraticModel, Sample};
use rapq_hal::{
    HalError, HalResult, Job, JobId, JobStatus, SampleSet, Sampler, SamplerFactory,
    SolverAvailability, SolverCapabilities, SolverConfig,
};

/// Default variable limit: 2^20 assignments.
const DEFAULT_MAX_VARIABLES: usize = 20;

/// Hard ceiling for the enumeration counter.
const ABSOLUTE_MAX_VARIABLES: usize = 30;

/// Job data for the exact solver.
struct ExactJob {
    job: Job,
    result: Option<SampleSet>,
}

/// Local exhaustive CQM solver.
///
/// Evaluates every assignment of the model's variables and returns all of
/// them, feasible first and then by ascending energy. Suitable for models of
/// up to about 20 variables.
pub struct ExactCqmSolver {
    /// Solver configuration.
    config: SolverConfig,
    /// Cached capabilities.
    capabilities: SolverCapabilities,
    /// Submitted jobs.
    jobs: Arc<Mutex<FxHashMap<String, ExactJob>>>,
}

impl ExactCqmSolver {
    /// Create a solver with the default variable limit.
    pub fn new() -> Self {
        Self::with_max_variables(DEFAULT_MAX_VARIABLES)
    }

    /// Create a solver with a custom variable limit (capped at 30).
    pub fn with_max_variables(max_variables: usize) -> Self {
        let max_variables = max_variables.min(ABSOLUTE_MAX_VARIABLES);
        Self {
            config: SolverConfig::new("exact"),
            capabilities: SolverCapabilities::exact(max_variables),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Enumerate and evaluate every assignment.
    #[instrument(skip(self, cqm), fields(variables = cqm.num_variables()))]
    pub fn solve(&self, cqm: &ConstrainedQuadraticModel, label: &str) -> HalResult<SampleSet> {
        let n = cqm.num_variables();
        if n > self.capabilities.max_variables {
            return Err(HalError::ProblemTooLarge(format!(
                "Model has {} variables but exact solver only supports {}",
                n, self.capabilities.max_variables
            )));
        }

        let start = Instant::now();
        let variables = cqm.variables();
        let total: u64 = 1 << n;
        debug!("Enumerating {} assignments", total);

        let mut set = SampleSet::new(label, cqm);
        let mut bits = vec![0_u8; n];
        for state in 0..total {
            for (i, bit) in bits.iter_mut().enumerate() {
                *bit = ((state >> i) & 1) as u8;
            }
            let sample = Sample::from_bits(variables, &bits);
            set.push(rapq_hal::SampleRecord::evaluate(cqm, sample, 1)?);
        }
        set.sort();

        let elapsed = start.elapsed();
        debug!("Enumeration completed in {:?}", elapsed);

        Ok(set
            .with_info("solver", serde_json::json!(self.config.name))
            .with_info("num_evaluated", serde_json::json!(total))
            .with_info("run_time_ms", serde_json::json!(elapsed.as_millis() as u64)))
    }
}

impl Default for ExactCqmSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sampler for ExactCqmSolver {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &SolverCapabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<SolverAvailability> {
        Ok(SolverAvailability::always_available())
    }

    #[instrument(skip(self, cqm))]
    async fn submit(&self, cqm: &ConstrainedQuadraticModel, label: &str) -> HalResult<JobId> {
        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::submitted(job_id.clone(), label, self.name());

        // Solve before registering so an oversized model leaves no job behind
        job.advance(JobStatus::Running);
        let result = self.solve(cqm, label)?;
        job.advance(JobStatus::Completed);

        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.insert(
            job_id.0.clone(),
            ExactJob {
                job,
                result: Some(result),
            },
        );

        debug!("Submitted job: {}", job_id);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<SampleSet> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let exact_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match &exact_job.job.status {
            // Handed over once; the table keeps only the job record
            JobStatus::Completed => exact_job
                .result
                .take()
                .map(|set| set.with_job(&exact_job.job))
                .ok_or_else(|| {
                    HalError::Solver(format!("result of job {job_id} was already retrieved"))
                }),
            JobStatus::Cancelled => Err(HalError::JobCancelled),
            JobStatus::Failed(msg) => Err(HalError::JobFailed(msg.clone())),
            JobStatus::Queued | JobStatus::Running => Err(HalError::Solver(format!(
                "job {job_id} has not completed"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(exact_job) = jobs.get_mut(&job_id.0) {
            exact_job.job.advance(JobStatus::Cancelled);
            Ok(())
        } else {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }
    }
}

impl SamplerFactory for ExactCqmSolver {
    fn from_config(config: SolverConfig) -> HalResult<Self> {
        let max_variables = config
            .extra
            .get("max_variables")
            .and_then(serde_json::Value::as_u64)
            .map_or(DEFAULT_MAX_VARIABLES, |v| v as usize)
            .min(ABSOLUTE_MAX_VARIABLES);

        Ok(Self {
            config,
            capabilities: SolverCapabilities::exact(max_variables),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapq_cqm::{Binary, LinearExpr, Sense};

    fn knapsack() -> ConstrainedQuadraticModel {
        let vars: Vec<Binary> = ["a", "b", "c"].into_iter().map(Binary::new).collect();
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(LinearExpr::weighted_sum(&vars, &[-3.0, -4.0, -5.0]))
            .unwrap();
        cqm.add_constraint(
            LinearExpr::weighted_sum(&vars, &[2.0, 3.0, 4.0]),
            Sense::Le,
            5.0,
            "weight",
        )
        .unwrap();
        cqm
    }

    #[test]
    fn test_exact_capabilities() {
        let solver = ExactCqmSolver::new();
        let caps = solver.capabilities();
        assert!(caps.is_local);
        assert_eq!(caps.max_variables, 20);
    }

    #[test]
    fn test_solve_enumerates_everything() {
        let solver = ExactCqmSolver::new();
        let set = solver.solve(&knapsack(), "t").unwrap();
        assert_eq!(set.len(), 8);
        assert_eq!(set.info["num_evaluated"], serde_json::json!(8));
    }

    #[test]
    fn test_solve_finds_optimum() {
        let solver = ExactCqmSolver::new();
        let set = solver.solve(&knapsack(), "t").unwrap();
        let best = set.best_feasible().unwrap();
        // a + b: weight 5, value 7
        assert_eq!(best.energy, -7.0);
        assert_eq!(best.sample.get("a"), Some(1));
        assert_eq!(best.sample.get("b"), Some(1));
        assert_eq!(best.sample.get("c"), Some(0));
        assert_eq!(set.records[0].energy, -7.0);
    }

    #[tokio::test]
    async fn test_submit_and_result() {
        let solver = ExactCqmSolver::new();
        let job_id = solver.submit(&knapsack(), "RAP").await.unwrap();

        let status = solver.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let set = solver.result(&job_id).await.unwrap();
        assert_eq!(set.label, "RAP");
        assert_eq!(set.info["job_id"], serde_json::json!(job_id.0));
        assert!(set.info.contains_key("submitted_at"));
        assert!(set.info.contains_key("finished_at"));
    }

    #[tokio::test]
    async fn test_result_is_handed_over_once() {
        let solver = ExactCqmSolver::new();
        let job_id = solver.submit(&knapsack(), "RAP").await.unwrap();

        assert_eq!(solver.result(&job_id).await.unwrap().len(), 8);
        assert!(matches!(
            solver.result(&job_id).await,
            Err(HalError::Solver(_))
        ));
        // The job record outlives its result
        assert_eq!(solver.status(&job_id).await.unwrap(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_sample_cqm() {
        let solver = ExactCqmSolver::new();
        let set = solver.sample_cqm(&knapsack(), "RAP").await.unwrap();
        assert_eq!(set.best_feasible().unwrap().energy, -7.0);
    }

    #[tokio::test]
    async fn test_too_many_variables() {
        let solver = ExactCqmSolver::with_max_variables(2);
        let result = solver.submit(&knapsack(), "t").await;
        assert!(matches!(result, Err(HalError::ProblemTooLarge(_))));

        let result = solver.sample_cqm(&knapsack(), "t").await;
        assert!(matches!(result, Err(HalError::InvalidModel(_))));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let solver = ExactCqmSolver::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            solver.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(solver.cancel(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_completed_job_keeps_result() {
        let solver = ExactCqmSolver::new();
        let job_id = solver.submit(&knapsack(), "t").await.unwrap();
        solver.cancel(&job_id).await.unwrap();
        assert_eq!(solver.status(&job_id).await.unwrap(), JobStatus::Completed);
    }

    #[test]
    fn test_from_config() {
        let config = SolverConfig::new("exact").with_extra("max_variables", serde_json::json!(8));
        let solver = ExactCqmSolver::from_config(config).unwrap();
        assert_eq!(solver.capabilities().max_variables, 8);
    }

    #[test]
    fn test_empty_model_yields_single_sample() {
        let solver = ExactCqmSolver::new();
        let set = solver.solve(&ConstrainedQuadraticModel::new(), "t").unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.records[0].is_feasible);
        assert_eq!(set.records[0].energy, 0.0);
    }
}
