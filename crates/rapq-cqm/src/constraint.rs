//! Labelled linear constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CqmResult;
use crate::expr::LinearExpr;
use crate::sample::Sample;

/// Absolute tolerance used when checking constraint satisfaction.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Comparison sense of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    /// `lhs <= rhs`
    #[serde(rename = "<=")]
    Le,
    /// `lhs >= rhs`
    #[serde(rename = ">=")]
    Ge,
    /// `lhs == rhs`
    #[serde(rename = "==")]
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Le => write!(f, "<="),
            Sense::Ge => write!(f, ">="),
            Sense::Eq => write!(f, "=="),
        }
    }
}

/// A constraint `lhs <sense> rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique label within the model.
    pub label: String,
    /// Left-hand side expression.
    pub lhs: LinearExpr,
    /// Comparison sense.
    pub sense: Sense,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(label: impl Into<String>, lhs: LinearExpr, sense: Sense, rhs: f64) -> Self {
        Self {
            label: label.into(),
            lhs,
            sense,
            rhs,
        }
    }

    /// Signed violation for a sample.
    ///
    /// Zero or negative means satisfied; for `Eq` the absolute deviation is
    /// returned.
    pub fn violation(&self, sample: &Sample) -> CqmResult<f64> {
        let lhs = self.lhs.evaluate(sample)?;
        Ok(match self.sense {
            Sense::Le => lhs - self.rhs,
            Sense::Ge => self.rhs - lhs,
            Sense::Eq => (lhs - self.rhs).abs(),
        })
    }

    /// Whether the sample satisfies the constraint.
    pub fn is_satisfied(&self, sample: &Sample) -> CqmResult<bool> {
        Ok(self.violation(sample)? <= FEASIBILITY_TOLERANCE)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} {}", self.label, self.lhs, self.sense, self.rhs)
    }
}
