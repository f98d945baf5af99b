//! Solver capability introspection.

use serde::{Deserialize, Serialize};

/// Problem type identifier for constrained quadratic models.
pub const PROBLEM_TYPE_CQM: &str = "cqm";

/// What a solver can accept.
///
/// Cached at construction; orchestration code uses it to reject models
/// before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverCapabilities {
    /// Name of the solver.
    pub name: String,
    /// Maximum number of variables per model.
    pub max_variables: usize,
    /// Maximum number of constraints per model.
    pub max_constraints: usize,
    /// Whether the solver runs in-process.
    pub is_local: bool,
    /// Accepted problem types (`"cqm"`, `"bqm"`, ...).
    #[serde(default)]
    pub problem_types: Vec<String>,
    /// Minimum run time in seconds, for solvers that take a time limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time_limit_secs: Option<f64>,
}

impl SolverCapabilities {
    /// Capabilities of an in-process exhaustive solver.
    pub fn exact(max_variables: usize) -> Self {
        Self {
            name: "exact".into(),
            max_variables,
            max_constraints: usize::MAX,
            is_local: true,
            problem_types: vec![PROBLEM_TYPE_CQM.into()],
            min_time_limit_secs: None,
        }
    }

    /// Capabilities of a cloud hybrid CQM solver.
    ///
    /// Limits default to the published values for Leap's hybrid CQM solver
    /// and are refreshed from the solver's properties when available.
    pub fn hybrid_cqm(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_variables: 500_000,
            max_constraints: 100_000,
            is_local: false,
            problem_types: vec![PROBLEM_TYPE_CQM.into()],
            min_time_limit_secs: Some(5.0),
        }
    }

    /// Whether the solver accepts a given problem type.
    pub fn supports(&self, problem_type: &str) -> bool {
        self.problem_types.iter().any(|p| p == problem_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_capabilities() {
        let caps = SolverCapabilities::exact(20);
        assert!(caps.is_local);
        assert_eq!(caps.max_variables, 20);
        assert!(caps.supports("cqm"));
        assert!(!caps.supports("bqm"));
    }

    #[test]
    fn test_hybrid_capabilities() {
        let caps = SolverCapabilities::hybrid_cqm("hybrid_constrained_quadratic_model_version1p");
        assert!(!caps.is_local);
        assert_eq!(caps.min_time_limit_secs, Some(5.0));
    }
}
