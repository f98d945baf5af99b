//! Solve dispatch and answer interpretation.

use std::fmt;

use rapq_cqm::ConstrainedQuadraticModel;
use rapq_hal::{HalResult, SampleRecord, SampleSet, Sampler};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::encoding::BinaryEncoding;
use crate::problem::RapProblem;
use crate::reliability::{system_log_unreliability, system_reliability};

/// Problem label sent with every RAP submission.
pub const DEFAULT_LABEL: &str = "RAP";

/// Send a model to a solver and wait for its sample set.
pub async fn run_on_solver<S>(cqm: &ConstrainedQuadraticModel, sampler: &S) -> HalResult<SampleSet>
where
    S: Sampler + ?Sized,
{
    run_on_solver_with_label(cqm, sampler, DEFAULT_LABEL).await
}

/// Like [`run_on_solver`] with a custom problem label.
#[instrument(skip(cqm, sampler), fields(solver = sampler.name(), variables = cqm.num_variables()))]
pub async fn run_on_solver_with_label<S>(
    cqm: &ConstrainedQuadraticModel,
    sampler: &S,
    label: &str,
) -> HalResult<SampleSet>
where
    S: Sampler + ?Sized,
{
    let sample_set = sampler.sample_cqm(cqm, label).await?;
    info!(
        records = sample_set.len(),
        feasible = sample_set.feasible().count(),
        "sample set received"
    );
    Ok(sample_set)
}

/// A decoded allocation: how many units of each type to install.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Units per component type.
    pub counts: Vec<u32>,
    /// Total units across types.
    ///
    /// Wider than a single count: infeasible records may set every bit of
    /// every type.
    pub total_units: u64,
    /// Total cost of the allocation.
    pub total_cost: f64,
    /// `Σ count · ln(1 − r)`, equal to the model energy.
    pub log_unreliability: f64,
    /// Series-parallel system reliability of the allocation.
    pub system_reliability: f64,
    /// Energy reported for the record.
    pub energy: f64,
    /// Whether the record satisfied every constraint.
    pub is_feasible: bool,
}

impl Allocation {
    /// Decode one sample-set record.
    pub fn decode(problem: &RapProblem, encoding: &BinaryEncoding, record: &SampleRecord) -> Self {
        let counts = encoding.decode(&record.sample);
        let total_units = counts.iter().map(|&n| u64::from(n)).sum();
        let total_cost = problem
            .costs
            .iter()
            .zip(&counts)
            .map(|(c, &n)| c * f64::from(n))
            .sum();

        Self {
            log_unreliability: system_log_unreliability(&problem.reliabilities, &counts),
            system_reliability: system_reliability(&problem.reliabilities, &counts),
            counts,
            total_units,
            total_cost,
            energy: record.energy,
            is_feasible: record.is_feasible,
        }
    }

    /// Decode the lowest-energy feasible record, if any.
    pub fn best(problem: &RapProblem, sample_set: &SampleSet) -> Option<Self> {
        let encoding = problem.encoding();
        sample_set
            .best_feasible()
            .map(|record| Self::decode(problem, &encoding, record))
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, n) in self.counts.iter().enumerate() {
            writeln!(f, "  type {}: {n} unit(s)", k + 1)?;
        }
        writeln!(f, "  total units: {}", self.total_units)?;
        writeln!(f, "  total cost: {}", self.total_cost)?;
        writeln!(f, "  log-unreliability: {:.6}", self.log_unreliability)?;
        write!(f, "  system reliability: {:.6}", self.system_reliability)
    }
}
