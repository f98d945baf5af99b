//! Binary decision variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label identifying a variable within a model.
pub type VarLabel = String;

/// A named binary (0/1) decision variable.
///
/// Two variables with the same label are the same variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binary {
    label: VarLabel,
}

impl Binary {
    /// Create a binary variable with the given label.
    pub fn new(label: impl Into<VarLabel>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Get the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<&str> for Binary {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Binary {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
