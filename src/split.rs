//! Train/holdout row splitting

use crate::error::{HomepriceError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of a train/holdout split
#[derive(Debug, Clone)]
pub struct TrainHoldoutSplit {
    pub train_indices: Vec<usize>,
    pub holdout_indices: Vec<usize>,
}

/// Shuffle `n_samples` row indices with a seeded generator and reserve the
/// trailing `holdout_fraction` share as the holdout set. Both sides must end
/// up non-empty.
pub fn train_holdout_split(
    n_samples: usize,
    holdout_fraction: f64,
    seed: u64,
) -> Result<TrainHoldoutSplit> {
    if !(0.0..1.0).contains(&holdout_fraction) || holdout_fraction <= 0.0 {
        return Err(HomepriceError::InvalidParameter {
            name: "holdout_fraction".to_string(),
            value: holdout_fraction.to_string(),
            reason: "must lie strictly between 0 and 1".to_string(),
        });
    }

    let n_holdout = ((n_samples as f64) * holdout_fraction).round() as usize;
    if n_holdout == 0 || n_holdout >= n_samples {
        return Err(HomepriceError::ValidationError(format!(
            "split of {} samples at fraction {} leaves an empty side",
            n_samples, holdout_fraction
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let holdout_indices = indices.split_off(n_samples - n_holdout);
    Ok(TrainHoldoutSplit {
        train_indices: indices,
        holdout_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_partitions_rows() {
        let split = train_holdout_split(100, 0.2, 42).unwrap();
        assert_eq!(split.holdout_indices.len(), 20);
        assert_eq!(split.train_indices.len(), 80);

        let all: HashSet<usize> = split
            .train_indices
            .iter()
            .chain(split.holdout_indices.iter())
            .copied()
            .collect();
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn test_split_is_deterministic() {
        let a = train_holdout_split(57, 0.25, 7).unwrap();
        let b = train_holdout_split(57, 0.25, 7).unwrap();
        assert_eq!(a.train_indices, b.train_indices);
        assert_eq!(a.holdout_indices, b.holdout_indices);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = train_holdout_split(100, 0.2, 1).unwrap();
        let b = train_holdout_split(100, 0.2, 2).unwrap();
        assert_ne!(a.holdout_indices, b.holdout_indices);
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(train_holdout_split(10, 0.0, 0).is_err());
        assert!(train_holdout_split(10, 1.0, 0).is_err());
        assert!(train_holdout_split(10, -0.1, 0).is_err());
    }

    #[test]
    fn test_degenerate_split_rejected() {
        // One sample cannot populate both sides
        assert!(train_holdout_split(1, 0.5, 0).is_err());
    }
}
