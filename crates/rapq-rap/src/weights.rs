//! Per-type rescaling of positional weights.

use crate::encoding::bit_length;
use crate::error::{RapError, RapResult};

/// Multiply each positional weight by the scalar of its component type.
///
/// Returns `weights[i] * factors[i / bits]` where `bits = bit_length(n_max)`.
/// The weights must come from an encoding of `factors.len()` types with the
/// same `n_max`; any other length is rejected.
///
/// ```rust
/// use rapq_rap::rescale;
///
/// assert_eq!(rescale(&[1, 2, 1, 2], &[3.0, 2.0], 2).unwrap(), vec![3.0, 6.0, 2.0, 4.0]);
/// ```
pub fn rescale(weights: &[u64], factors: &[f64], n_max: u32) -> RapResult<Vec<f64>> {
    let bits = bit_length(n_max) as usize;
    let expected = factors.len() * bits;
    if weights.len() != expected {
        return Err(RapError::LengthMismatch {
            what: "positional weights",
            expected,
            got: weights.len(),
        });
    }
    if bits == 0 {
        return Ok(Vec::new());
    }

    Ok(weights
        .iter()
        .enumerate()
        .map(|(i, &w)| w as f64 * factors[i / bits])
        .collect())
}
