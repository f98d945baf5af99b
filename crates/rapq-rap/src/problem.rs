//! Problem definition and model assembly.

use rapq_cqm::{ConstrainedQuadraticModel, LinearExpr, Sense};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::encoding::{BinaryEncoding, encode};
use crate::error::{RapError, RapResult};
use crate::reliability::ln_unreliability;
use crate::weights::rescale;

/// Label of the budget constraint.
pub const BUDGET_LIMITATION: &str = "budget_limitation";
/// Label of the upper count constraint.
pub const UPPER_LIMIT: &str = "upper_limit";
/// Label of the lower count constraint.
pub const BOUND_LIMIT: &str = "bound_limit";

/// A redundancy allocation instance.
///
/// `n_min` and `n_max` bound the total number of units summed across all
/// component types, not each type on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RapProblem {
    /// Unit cost per component type.
    pub costs: Vec<f64>,
    /// Unit reliability per component type, each in (0, 1).
    pub reliabilities: Vec<f64>,
    /// Lower bound on the total unit count.
    #[serde(default)]
    pub n_min: u32,
    /// Upper bound on the total unit count.
    pub n_max: u32,
    /// Total budget.
    pub budget: f64,
}

impl Default for RapProblem {
    /// Two component types, at most two units, budget 5.
    fn default() -> Self {
        Self {
            costs: vec![3.0, 2.0],
            reliabilities: vec![0.98, 0.95],
            n_min: 0,
            n_max: 2,
            budget: 5.0,
        }
    }
}

impl RapProblem {
    /// Create a problem instance.
    pub fn new(
        costs: Vec<f64>,
        reliabilities: Vec<f64>,
        n_min: u32,
        n_max: u32,
        budget: f64,
    ) -> Self {
        Self {
            costs,
            reliabilities,
            n_min,
            n_max,
            budget,
        }
    }

    /// Number of component types.
    pub fn num_types(&self) -> usize {
        self.costs.len()
    }

    /// Check every precondition of model assembly.
    pub fn validate(&self) -> RapResult<()> {
        if self.costs.is_empty() {
            return Err(RapError::NoComponents);
        }
        if self.reliabilities.len() != self.costs.len() {
            return Err(RapError::LengthMismatch {
                what: "reliabilities",
                expected: self.costs.len(),
                got: self.reliabilities.len(),
            });
        }
        for (index, &value) in self.reliabilities.iter().enumerate() {
            // NaN fails both comparisons
            if !(value > 0.0 && value < 1.0) {
                return Err(RapError::ReliabilityOutOfRange { index, value });
            }
        }
        for (index, &value) in self.costs.iter().enumerate() {
            if !value.is_finite() {
                return Err(RapError::NonFiniteCost { index, value });
            }
        }
        if !self.budget.is_finite() {
            return Err(RapError::NonFiniteBudget(self.budget));
        }
        if self.n_min > self.n_max {
            return Err(RapError::BoundsInverted {
                n_min: self.n_min,
                n_max: self.n_max,
            });
        }
        Ok(())
    }

    /// Binary encoding used by this instance's model.
    pub fn encoding(&self) -> BinaryEncoding {
        encode(self.n_max, self.num_types())
    }

    /// Validate and assemble the constrained model.
    ///
    /// - objective: minimise `Σ x_i · 2^bit · ln(1 − r_type)`
    /// - `budget_limitation`: `Σ x_i · 2^bit · cost_type <= budget`
    /// - `upper_limit`: `Σ x_i · 2^bit <= n_max`
    /// - `bound_limit`: `Σ x_i · 2^bit >= n_min`
    #[instrument(skip(self), fields(types = self.num_types(), n_max = self.n_max))]
    pub fn build_cqm(&self) -> RapResult<ConstrainedQuadraticModel> {
        self.validate()?;

        let ln_rs = ln_unreliability(&self.reliabilities);
        let encoding = self.encoding();
        let objective_weights = rescale(&encoding.weights, &ln_rs, self.n_max)?;
        let cost_weights = rescale(&encoding.weights, &self.costs, self.n_max)?;
        let count_weights = encoding.positional_coefficients();

        debug!(
            "Encoded {} types with {} bits each ({} variables)",
            encoding.num_types,
            encoding.bits,
            encoding.len()
        );

        let vars = &encoding.variables;
        let mut cqm = ConstrainedQuadraticModel::new();
        cqm.set_objective(LinearExpr::weighted_sum(vars, &objective_weights))?;
        cqm.add_constraint(
            LinearExpr::weighted_sum(vars, &cost_weights),
            Sense::Le,
            self.budget,
            BUDGET_LIMITATION,
        )?;
        cqm.add_constraint(
            LinearExpr::weighted_sum(vars, &count_weights),
            Sense::Le,
            f64::from(self.n_max),
            UPPER_LIMIT,
        )?;
        cqm.add_constraint(
            LinearExpr::weighted_sum(vars, &count_weights),
            Sense::Ge,
            f64::from(self.n_min),
            BOUND_LIMIT,
        )?;

        Ok(cqm)
    }
}

/// Build the model from loose parameters.
///
/// Argument order follows the classic formulation `(n_max, n_min, Rs, C, cs)`.
pub fn get_cqm(
    n_max: u32,
    n_min: u32,
    reliabilities: &[f64],
    budget: f64,
    costs: &[f64],
) -> RapResult<ConstrainedQuadraticModel> {
    RapProblem::new(costs.to_vec(), reliabilities.to_vec(), n_min, n_max, budget).build_cqm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instance_validates() {
        assert!(RapProblem::default().validate().is_ok());
    }

    #[test]
    fn test_validate_no_components() {
        let p = RapProblem::new(vec![], vec![], 0, 2, 5.0);
        assert!(matches!(p.validate(), Err(RapError::NoComponents)));
    }

    #[test]
    fn test_validate_length_mismatch() {
        let p = RapProblem::new(vec![3.0, 2.0], vec![0.9], 0, 2, 5.0);
        assert!(matches!(
            p.validate(),
            Err(RapError::LengthMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_reliability_range() {
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let p = RapProblem::new(vec![1.0], vec![bad], 0, 2, 5.0);
            assert!(
                matches!(p.validate(), Err(RapError::ReliabilityOutOfRange { index: 0, .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_non_finite_cost_and_budget() {
        let p = RapProblem::new(vec![f64::INFINITY], vec![0.9], 0, 2, 5.0);
        assert!(matches!(p.validate(), Err(RapError::NonFiniteCost { .. })));

        let p = RapProblem::new(vec![1.0], vec![0.9], 0, 2, f64::NAN);
        assert!(matches!(p.validate(), Err(RapError::NonFiniteBudget(_))));
    }

    #[test]
    fn test_validate_bounds_inverted() {
        let p = RapProblem::new(vec![1.0], vec![0.9], 3, 2, 5.0);
        assert!(matches!(
            p.validate(),
            Err(RapError::BoundsInverted { n_min: 3, n_max: 2 })
        ));
    }

    #[test]
    fn test_build_cqm_structure() {
        let cqm = RapProblem::default().build_cqm().unwrap();
        assert_eq!(cqm.num_variables(), 4);
        assert_eq!(cqm.objective().len(), 4);
        let labels: Vec<&str> = cqm.constraints().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec![BUDGET_LIMITATION, UPPER_LIMIT, BOUND_LIMIT]);
    }

    #[test]
    fn test_build_cqm_coefficients() {
        let cqm = RapProblem::default().build_cqm().unwrap();

        let budget = cqm.constraint(BUDGET_LIMITATION).unwrap();
        let coeffs: Vec<f64> = budget.lhs.terms().iter().map(|(_, c)| *c).collect();
        assert_eq!(coeffs, vec![3.0, 6.0, 2.0, 4.0]);
        assert_eq!(budget.sense, Sense::Le);
        assert_eq!(budget.rhs, 5.0);

        let upper = cqm.constraint(UPPER_LIMIT).unwrap();
        let coeffs: Vec<f64> = upper.lhs.terms().iter().map(|(_, c)| *c).collect();
        assert_eq!(coeffs, vec![1.0, 2.0, 1.0, 2.0]);
        assert_eq!(upper.rhs, 2.0);

        let lower = cqm.constraint(BOUND_LIMIT).unwrap();
        assert_eq!(lower.sense, Sense::Ge);
        assert_eq!(lower.rhs, 0.0);

        let objective: Vec<f64> = cqm.objective().terms().iter().map(|(_, c)| *c).collect();
        let ln_a = 0.02_f64.ln();
        let ln_b = 0.05_f64.ln();
        let expected = [ln_a, 2.0 * ln_a, ln_b, 2.0 * ln_b];
        for (got, want) in objective.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_get_cqm_matches_problem() {
        let direct = get_cqm(2, 0, &[0.98, 0.95], 5.0, &[3.0, 2.0]).unwrap();
        let via_problem = RapProblem::default().build_cqm().unwrap();
        assert_eq!(direct, via_problem);
    }

    #[test]
    fn test_build_cqm_rejects_invalid() {
        let p = RapProblem::new(vec![1.0], vec![1.0], 0, 2, 5.0);
        assert!(p.build_cqm().is_err());
    }

    #[test]
    fn test_problem_yaml_shape() {
        let json = serde_json::to_value(RapProblem::default()).unwrap();
        assert_eq!(json["n_max"], 2);
        assert_eq!(json["costs"], serde_json::json!([3.0, 2.0]));
    }
}
