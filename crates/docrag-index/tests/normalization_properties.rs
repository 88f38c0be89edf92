//! Property tests for vector normalization.

use docrag_index::l2_normalize;
use proptest::prelude::*;

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

proptest! {
    #[test]
    fn normalization_is_idempotent_and_finite(
        v in prop::collection::vec(-1000.0f32..1000.0, 1..64),
    ) {
        let mut first = v.clone();
        l2_normalize(&mut first);

        prop_assert!(first.iter().all(|x| x.is_finite()));

        let n = norm(&first);
        // Either a unit vector or the zero vector (zero-norm input).
        prop_assert!(n == 0.0 || (n - 1.0).abs() < 1e-3);

        let mut second = first.clone();
        l2_normalize(&mut second);
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert!((a - b).abs() < 1e-5);
        }
    }
}
