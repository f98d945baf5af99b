//! The constrained quadratic model.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constraint::{Constraint, Sense};
use crate::error::{CqmError, CqmResult};
use crate::expr::LinearExpr;
use crate::sample::Sample;
use crate::variable::Binary;

/// A constrained model over binary variables.
///
/// Holds an objective to minimise and an ordered list of labelled
/// constraints. Variables are registered in the order they are first seen
/// and every variable referenced by the objective or a constraint is part of
/// the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelRepr")]
pub struct ConstrainedQuadraticModel {
    variables: Vec<Binary>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
}

/// Wire form used to rebuild the variable index on deserialization.
#[derive(Deserialize)]
struct ModelRepr {
    variables: Vec<Binary>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
}

impl TryFrom<ModelRepr> for ConstrainedQuadraticModel {
    type Error = CqmError;

    fn try_from(repr: ModelRepr) -> CqmResult<Self> {
        let mut model = Self::new();
        for var in repr.variables {
            model.add_variable(var);
        }
        model.set_objective(repr.objective)?;
        for c in repr.constraints {
            model.add_constraint(c.lhs, c.sense, c.rhs, c.label)?;
        }
        Ok(model)
    }
}

impl ConstrainedQuadraticModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable, returning its index.
    ///
    /// Registering an existing variable returns the existing index.
    pub fn add_variable(&mut self, var: Binary) -> usize {
        if let Some(&idx) = self.index.get(var.label()) {
            return idx;
        }
        let idx = self.variables.len();
        self.index.insert(var.label().to_string(), idx);
        self.variables.push(var);
        idx
    }

    fn register(&mut self, expr: &LinearExpr) {
        for var in expr.variables() {
            if !self.index.contains_key(var.label()) {
                self.add_variable(var.clone());
            }
        }
    }

    /// Set the objective to minimise, replacing any previous objective.
    pub fn set_objective(&mut self, objective: LinearExpr) -> CqmResult<()> {
        objective.check_finite("objective")?;
        self.register(&objective);
        self.objective = objective;
        Ok(())
    }

    /// Add a labelled constraint `lhs <sense> rhs`.
    pub fn add_constraint(
        &mut self,
        lhs: LinearExpr,
        sense: Sense,
        rhs: f64,
        label: impl Into<String>,
    ) -> CqmResult<()> {
        let label = label.into();
        if label.is_empty() {
            return Err(CqmError::EmptyLabel);
        }
        if self.constraints.iter().any(|c| c.label == label) {
            return Err(CqmError::DuplicateConstraint(label));
        }
        if !rhs.is_finite() {
            return Err(CqmError::NonFinite {
                context: format!("{label} rhs"),
                value: rhs,
            });
        }
        lhs.check_finite(&label)?;
        self.register(&lhs);
        self.constraints.push(Constraint::new(label, lhs, sense, rhs));
        Ok(())
    }

    /// The objective expression.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Look up a constraint by label.
    pub fn constraint(&self, label: &str) -> CqmResult<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.label == label)
            .ok_or_else(|| CqmError::ConstraintNotFound(label.to_string()))
    }

    /// Variables in registration order.
    pub fn variables(&self) -> &[Binary] {
        &self.variables
    }

    /// Whether a variable belongs to the model.
    pub fn contains_variable(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check that a sample assigns every model variable a binary value.
    pub fn check_sample(&self, sample: &Sample) -> CqmResult<()> {
        for var in &self.variables {
            match sample.get(var.label()) {
                None => return Err(CqmError::MissingVariable(var.label().to_string())),
                Some(0 | 1) => {}
                Some(value) => {
                    return Err(CqmError::NonBinaryValue {
                        label: var.label().to_string(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Objective value of a sample.
    pub fn energy(&self, sample: &Sample) -> CqmResult<f64> {
        self.check_sample(sample)?;
        self.objective.evaluate(sample)
    }

    /// Signed violation of every constraint, in constraint order.
    pub fn violations(&self, sample: &Sample) -> CqmResult<Vec<(&str, f64)>> {
        self.check_sample(sample)?;
        self.constraints
            .iter()
            .map(|c| Ok((c.label.as_str(), c.violation(sample)?)))
            .collect()
    }

    /// Whether a sample satisfies every constraint.
    pub fn is_feasible(&self, sample: &Sample) -> CqmResult<bool> {
        self.check_sample(sample)?;
        for c in &self.constraints {
            if !c.is_satisfied(sample)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for ConstrainedQuadraticModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Constrained quadratic model: {} variables of type Binary, {} constraints",
            self.num_variables(),
            self.num_constraints()
        )?;
        writeln!(f, "Minimize")?;
        writeln!(f, "  {}", self.objective)?;
        writeln!(f, "Subject to")?;
        for c in &self.constraints {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}
