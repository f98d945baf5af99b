//! Linear expressions over binary variables.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CqmError, CqmResult};
use crate::sample::Sample;
use crate::variable::Binary;

/// A linear expression `Σ coeff_i · x_i + offset`.
///
/// Terms keep their insertion order. A variable may appear more than once;
/// its coefficients are summed on evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    terms: Vec<(Binary, f64)>,
    #[serde(default)]
    offset: f64,
}

impl LinearExpr {
    /// Create an empty expression (evaluates to 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an expression from `(variable, coefficient)` pairs.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (Binary, f64)>,
    {
        Self {
            terms: terms.into_iter().collect(),
            offset: 0.0,
        }
    }

    /// Build `Σ variables[i] · coefficients[i]`.
    ///
    /// Extra entries on either side are ignored.
    pub fn weighted_sum(variables: &[Binary], coefficients: &[f64]) -> Self {
        Self::from_terms(variables.iter().cloned().zip(coefficients.iter().copied()))
    }

    /// Append a term.
    pub fn add_term(&mut self, variable: Binary, coefficient: f64) -> &mut Self {
        self.terms.push((variable, coefficient));
        self
    }

    /// Set the constant offset.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// The terms in insertion order.
    pub fn terms(&self) -> &[(Binary, f64)] {
        &self.terms
    }

    /// The constant offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate the variables referenced by the expression.
    pub fn variables(&self) -> impl Iterator<Item = &Binary> {
        self.terms.iter().map(|(v, _)| v)
    }

    /// Evaluate the expression against a sample.
    pub fn evaluate(&self, sample: &Sample) -> CqmResult<f64> {
        let mut total = self.offset;
        for (var, coeff) in &self.terms {
            let value = sample
                .get(var.label())
                .ok_or_else(|| CqmError::MissingVariable(var.label().to_string()))?;
            match value {
                0 => {}
                1 => total += coeff,
                other => {
                    return Err(CqmError::NonBinaryValue {
                        label: var.label().to_string(),
                        value: other,
                    });
                }
            }
        }
        Ok(total)
    }

    /// Reject NaN or infinite coefficients.
    pub(crate) fn check_finite(&self, context: &str) -> CqmResult<()> {
        if !self.offset.is_finite() {
            return Err(CqmError::NonFinite {
                context: format!("{context} offset"),
                value: self.offset,
            });
        }
        for (var, coeff) in &self.terms {
            if !coeff.is_finite() {
                return Err(CqmError::NonFinite {
                    context: format!("{context} term {var}"),
                    value: *coeff,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(Binary, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (Binary, f64)>>(iter: I) -> Self {
        Self::from_terms(iter)
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.offset);
        }
        for (i, (var, coeff)) in self.terms.iter().enumerate() {
            if i == 0 {
                write!(f, "{coeff}*{var}")?;
            } else if *coeff < 0.0 {
                write!(f, " - {}*{var}", -coeff)?;
            } else {
                write!(f, " + {coeff}*{var}")?;
            }
        }
        if self.offset != 0.0 {
            write!(f, " + {}", self.offset)?;
        }
        Ok(())
    }
}
