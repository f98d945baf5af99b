//! Variable assignments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::variable::{Binary, VarLabel};

/// An assignment of values to variables.
///
/// Values are stored as `u8` so that a sample arriving from an external
/// solver can be checked for non-binary entries instead of silently
/// truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    values: BTreeMap<VarLabel, u8>,
}

impl Sample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sample from `(label, value)` pairs.
    pub fn from_pairs<L, I>(pairs: I) -> Self
    where
        L: Into<VarLabel>,
        I: IntoIterator<Item = (L, u8)>,
    {
        Self {
            values: pairs.into_iter().map(|(l, v)| (l.into(), v)).collect(),
        }
    }

    /// Build a sample by assigning `bits[i]` to `variables[i]`.
    pub fn from_bits(variables: &[Binary], bits: &[u8]) -> Self {
        Self {
            values: variables
                .iter()
                .zip(bits)
                .map(|(v, &b)| (v.label().to_string(), b))
                .collect(),
        }
    }

    /// Assign a value.
    pub fn set(&mut self, label: impl Into<VarLabel>, value: u8) {
        self.values.insert(label.into(), value);
    }

    /// Get the value of a variable.
    pub fn get(&self, label: &str) -> Option<u8> {
        self.values.get(label).copied()
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate assignments in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (label, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{label}': {value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        let vars = vec![Binary::new("a"), Binary::new("b"), Binary::new("c")];
        let sample = Sample::from_bits(&vars, &[1, 0, 1]);
        assert_eq!(sample.len(), 3);
        assert_eq!(sample.get("a"), Some(1));
        assert_eq!(sample.get("b"), Some(0));
        assert_eq!(sample.get("c"), Some(1));
    }

    #[test]
    fn test_missing_variable() {
        let sample = Sample::from_pairs([("a", 1)]);
        assert_eq!(sample.get("b"), None);
    }

    #[test]
    fn test_display() {
        let sample = Sample::from_pairs([("y", 0), ("x", 1)]);
        assert_eq!(sample.to_string(), "{'x': 1, 'y': 0}");
    }
}
