//! Bootstrap resampling for per-tree training sets.

use rand::Rng;

/// Draw a bootstrap resample of `n_samples` row indices.
///
/// Returns a vector of exactly `n_samples` indices, each chosen
/// independently and uniformly at random from `0..n_samples`, with
/// replacement. Each tree in the ensemble is trained on its own
/// independent draw.
///
/// # Panics
///
/// Panics if `n_samples` is zero (the trainer rejects empty datasets
/// before sampling).
#[must_use]
pub fn bootstrap_indices(n_samples: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::bootstrap_indices;

    #[test]
    fn same_length_as_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in [1, 2, 17, 500] {
            assert_eq!(bootstrap_indices(n, &mut rng).len(), n);
        }
    }

    #[test]
    fn every_draw_contained_in_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in [1, 3, 64, 1000] {
            let indices = bootstrap_indices(n, &mut rng);
            assert!(indices.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn single_sample_always_index_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(bootstrap_indices(1, &mut rng), vec![0]);
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(bootstrap_indices(100, &mut rng1), bootstrap_indices(100, &mut rng2));
    }

    #[test]
    fn independent_rngs_differ() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(1);
        let mut rng2 = ChaCha8Rng::seed_from_u64(2);
        assert_ne!(bootstrap_indices(100, &mut rng1), bootstrap_indices(100, &mut rng2));
    }
}
