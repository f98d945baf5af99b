//! Reliability transforms.
//!
//! A component with reliability `r` fails with probability `1 − r`. A
//! subsystem of `n` identical components in parallel fails only when all of
//! them fail, with probability `(1 − r)^n`, so
//! `ln P(fail) = n · ln(1 − r)`. Summing this over component types gives a
//! linear surrogate for the multiplicative failure structure, which is what
//! the model objective minimises.

/// Elementwise `ln(1 − r)`.
///
/// Every value must lie strictly between 0 and 1; the result is then finite
/// and negative. Out-of-range inputs are not checked here and produce NaN or
/// infinities; [`RapProblem::validate`](crate::RapProblem::validate) enforces
/// the range before any model is built.
pub fn ln_unreliability(reliabilities: &[f64]) -> Vec<f64> {
    reliabilities.iter().map(|r| (1.0 - r).ln()).collect()
}

/// Failure probability of `count` parallel components of reliability `r`.
pub fn subsystem_unreliability(reliability: f64, count: u32) -> f64 {
    (1.0 - reliability).powf(f64::from(count))
}

/// `Σ count_k · ln(1 − r_k)`, the objective value of an allocation.
pub fn system_log_unreliability(reliabilities: &[f64], counts: &[u32]) -> f64 {
    reliabilities
        .iter()
        .zip(counts)
        .map(|(r, &n)| f64::from(n) * (1.0 - r).ln())
        .sum()
}

/// Reliability of a series system of parallel subsystems.
///
/// `Π (1 − (1 − r_k)^count_k)`; a type with zero units contributes a
/// factor of 0.
pub fn system_reliability(reliabilities: &[f64], counts: &[u32]) -> f64 {
    reliabilities
        .iter()
        .zip(counts)
        .map(|(&r, &n)| 1.0 - subsystem_unreliability(r, n))
        .product()
}
