//! Property-based tests for the binary count encoding.

use proptest::prelude::*;
use rapq_rap::{RapProblem, bit_length, encode, rescale, system_log_unreliability};

proptest! {
    #[test]
    fn counts_survive_encoding(
        n_max in 0_u32..=64,
        raw in prop::collection::vec(0_u32..=64, 1..=4),
    ) {
        let encoding = encode(n_max, raw.len());
        // Only counts representable in bit_length(n_max) bits survive
        let mask = (1_u32 << bit_length(n_max)) - 1;
        let counts: Vec<u32> = raw.iter().map(|c| c & mask).collect();
        prop_assert_eq!(encoding.decode(&encoding.sample_for(&counts)), counts);
    }

    #[test]
    fn encoding_width_covers_n_max(n_max in 1_u32..=10_000, types in 1_usize..=5) {
        let encoding = encode(n_max, types);
        let per_type_max: u64 = encoding.weights[..encoding.bits as usize].iter().sum();
        prop_assert!(per_type_max >= u64::from(n_max));
        prop_assert_eq!(encoding.len(), types * bit_length(n_max) as usize);
    }

    #[test]
    fn weights_are_powers_of_two(n_max in 1_u32..=10_000, types in 1_usize..=5) {
        let encoding = encode(n_max, types);
        let bits = encoding.bits as usize;
        for (i, &w) in encoding.weights.iter().enumerate() {
            prop_assert_eq!(w, 1_u64 << (i % bits));
        }
    }

    #[test]
    fn rescale_multiplies_by_type_factor(
        n_max in 1_u32..=100,
        factors in prop::collection::vec(-10.0_f64..10.0, 1..=4),
    ) {
        let encoding = encode(n_max, factors.len());
        let bits = encoding.bits as usize;
        let scaled = rescale(&encoding.weights, &factors, n_max).unwrap();
        prop_assert_eq!(scaled.len(), encoding.len());
        for (i, value) in scaled.iter().enumerate() {
            prop_assert_eq!(*value, encoding.weights[i] as f64 * factors[i / bits]);
        }
    }

    #[test]
    fn rescale_rejects_foreign_lengths(n_max in 1_u32..=100, extra in 1_usize..=3) {
        let encoding = encode(n_max, 2);
        let mut weights = encoding.weights.clone();
        weights.extend(std::iter::repeat_n(1, extra));
        prop_assert!(rescale(&weights, &[1.0, 2.0], n_max).is_err());
    }

    #[test]
    fn energy_equals_log_unreliability(
        counts in prop::collection::vec(0_u32..=7, 2),
        r1 in 0.01_f64..0.99,
        r2 in 0.01_f64..0.99,
    ) {
        let problem = RapProblem::new(vec![1.0, 1.0], vec![r1, r2], 0, 7, 100.0);
        let cqm = problem.build_cqm().unwrap();
        let sample = problem.encoding().sample_for(&counts);
        let expected = system_log_unreliability(&problem.reliabilities, &counts);
        prop_assert!((cqm.energy(&sample).unwrap() - expected).abs() < 1e-9);
    }
}
