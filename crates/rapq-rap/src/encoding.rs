//! Binary encoding of per-type component counts.
//!
//! A count in `[0, n_max]` is represented by `bit_length(n_max)` binary
//! variables with weights `1, 2, 4, ...`. Variables are laid out type-major,
//! bit-minor:
//!
//! ```text
//! n_max = 2, n = 2  →  bits = 2
//!
//!   index    0       1       2       3
//!   name     b_0,1   b_1,1   b_0,2   b_1,2
//!   weight   1       2       1       2
//! ```
//!
//! Each type's bits can represent up to `2^bits − 1`, which may exceed
//! `n_max`; the model's count constraints are what bound the total.

use rapq_cqm::{Binary, Sample};

/// Number of binary digits needed to represent `n`.
///
/// `bit_length(0) == 0`: an upper bound of zero needs no variables.
pub fn bit_length(n: u32) -> u32 {
    u32::BITS - n.leading_zeros()
}

/// Label of the variable for `bit` of component type `type_index` (0-based).
///
/// Type numbers in labels are 1-based, e.g. `b_0,1` is bit 0 of the first type.
pub fn variable_label(bit: u32, type_index: usize) -> String {
    format!("b_{bit},{}", type_index + 1)
}

/// Binary variables and positional weights for every component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryEncoding {
    /// Variables, type-major then bit-minor.
    pub variables: Vec<Binary>,
    /// Positional weight `2^bit` of each variable.
    pub weights: Vec<u64>,
    /// Bits per component type.
    pub bits: u32,
    /// Number of component types.
    pub num_types: usize,
}

/// Build the encoding of `num_types` counts bounded by `n_max`.
pub fn encode(n_max: u32, num_types: usize) -> BinaryEncoding {
    let bits = bit_length(n_max);
    let len = num_types * bits as usize;
    let mut variables = Vec::with_capacity(len);
    let mut weights = Vec::with_capacity(len);

    for k in 0..num_types {
        for i in 0..bits {
            variables.push(Binary::new(variable_label(i, k)));
            weights.push(1_u64 << i);
        }
    }

    BinaryEncoding {
        variables,
        weights,
        bits,
        num_types,
    }
}

impl BinaryEncoding {
    /// Total number of variables (`num_types * bits`).
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the encoding has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Component type owning variable `index`.
    pub fn type_of(&self, index: usize) -> usize {
        index / self.bits.max(1) as usize
    }

    /// Positional weights as coefficients.
    pub fn positional_coefficients(&self) -> Vec<f64> {
        self.weights.iter().map(|&w| w as f64).collect()
    }

    /// Recover per-type counts from a sample.
    ///
    /// Variables missing from the sample count as 0.
    pub fn decode(&self, sample: &Sample) -> Vec<u32> {
        let mut counts = vec![0_u32; self.num_types];
        for (idx, (var, weight)) in self.variables.iter().zip(&self.weights).enumerate() {
            if sample.get(var.label()) == Some(1) {
                counts[self.type_of(idx)] += *weight as u32;
            }
        }
        counts
    }

    /// Sample that encodes the given per-type counts.
    ///
    /// Bits above the encoding width are dropped.
    pub fn sample_for(&self, counts: &[u32]) -> Sample {
        let mut sample = Sample::new();
        for (idx, var) in self.variables.iter().enumerate() {
            let bit = idx as u32 % self.bits;
            let count = counts.get(self.type_of(idx)).copied().unwrap_or(0);
            sample.set(var.label(), ((count >> bit) & 1) as u8);
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(2), 2);
        assert_eq!(bit_length(3), 2);
        assert_eq!(bit_length(4), 3);
        assert_eq!(bit_length(255), 8);
        assert_eq!(bit_length(256), 9);
        assert_eq!(bit_length(u32::MAX), 32);
    }

    #[test]
    fn test_encode_two_types() {
        let enc = encode(2, 2);
        assert_eq!(enc.bits, 2);
        assert_eq!(enc.len(), 4);
        assert_eq!(enc.weights, vec![1, 2, 1, 2]);
        let names: Vec<&str> = enc.variables.iter().map(Binary::label).collect();
        assert_eq!(names, vec!["b_0,1", "b_1,1", "b_0,2", "b_1,2"]);
    }

    #[test]
    fn test_encode_zero_bits() {
        let enc = encode(0, 3);
        assert_eq!(enc.bits, 0);
        assert!(enc.is_empty());
        assert!(enc.weights.is_empty());
        assert_eq!(enc.decode(&Sample::new()), vec![0, 0, 0]);
    }

    #[test]
    fn test_decode() {
        let enc = encode(3, 2);
        let sample = Sample::from_pairs([("b_0,1", 1), ("b_1,1", 1), ("b_0,2", 0), ("b_1,2", 1)]);
        assert_eq!(enc.decode(&sample), vec![3, 2]);
    }

    #[test]
    fn test_sample_for_roundtrip() {
        let enc = encode(5, 3);
        let counts = vec![5, 0, 7];
        assert_eq!(enc.decode(&enc.sample_for(&counts)), counts);
    }

    #[test]
    fn test_labels_are_unique() {
        let enc = encode(100, 10);
        let mut labels: Vec<&str> = enc.variables.iter().map(Binary::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), enc.len());
    }
}
