//! K-fold cross-validation

use crate::error::{HomepriceError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// One fold of a cross-validation split
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Shuffled k-fold splitter with a deterministic seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KFold {
    pub n_folds: usize,
    pub seed: u64,
}

impl KFold {
    pub fn new(n_folds: usize, seed: u64) -> Result<Self> {
        if n_folds < 2 {
            return Err(HomepriceError::InvalidParameter {
                name: "n_folds".to_string(),
                value: n_folds.to_string(),
                reason: "cross-validation needs at least 2 folds".to_string(),
            });
        }
        Ok(Self { n_folds, seed })
    }

    /// Split `n_samples` row indices into folds. Fold sizes differ by at
    /// most one; the remainder goes to the earliest folds.
    pub fn split(&self, n_samples: usize) -> Result<Vec<CVSplit>> {
        if n_samples < self.n_folds {
            return Err(HomepriceError::ValidationError(format!(
                "cannot split {} samples into {} folds",
                n_samples, self.n_folds
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let base = n_samples / self.n_folds;
        let remainder = n_samples % self.n_folds;

        let mut splits = Vec::with_capacity(self.n_folds);
        let mut start = 0;
        for fold_idx in 0..self.n_folds {
            let size = base + usize::from(fold_idx < remainder);
            let test_indices = indices[start..start + size].to_vec();
            let train_indices: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[start + size..].iter())
                .copied()
                .collect();
            splits.push(CVSplit {
                train_indices,
                test_indices,
                fold_idx,
            });
            start += size;
        }
        Ok(splits)
    }
}

/// Aggregate of per-fold validation scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CVResults {
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
}

impl CVResults {
    pub fn from_scores(fold_scores: Vec<f64>) -> Self {
        let n = fold_scores.len() as f64;
        let mean_score = if n > 0.0 {
            fold_scores.iter().sum::<f64>() / n
        } else {
            0.0
        };
        let std_score = if n > 1.0 {
            let var = fold_scores
                .iter()
                .map(|s| (s - mean_score).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        Self {
            fold_scores,
            mean_score,
            std_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_folds_partition_all_indices() {
        let kfold = KFold::new(5, 42).unwrap();
        let splits = kfold.split(103).unwrap();
        assert_eq!(splits.len(), 5);

        let mut seen = HashSet::new();
        for split in &splits {
            for &i in &split.test_indices {
                assert!(seen.insert(i), "index {} appears in two test folds", i);
            }
        }
        assert_eq!(seen.len(), 103);
    }

    #[test]
    fn test_fold_sizes_differ_by_at_most_one() {
        let kfold = KFold::new(4, 0).unwrap();
        let splits = kfold.split(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test_indices.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_train_and_test_are_disjoint() {
        let kfold = KFold::new(3, 7).unwrap();
        for split in kfold.split(30).unwrap() {
            let test: HashSet<usize> = split.test_indices.iter().copied().collect();
            assert!(split.train_indices.iter().all(|i| !test.contains(i)));
            assert_eq!(split.train_indices.len() + split.test_indices.len(), 30);
        }
    }

    #[test]
    fn test_same_seed_same_splits() {
        let a = KFold::new(5, 99).unwrap().split(50).unwrap();
        let b = KFold::new(5, 99).unwrap().split(50).unwrap();
        for (sa, sb) in a.iter().zip(b.iter()) {
            assert_eq!(sa.test_indices, sb.test_indices);
        }
    }

    #[test]
    fn test_too_few_folds_rejected() {
        assert!(KFold::new(1, 0).is_err());
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let kfold = KFold::new(5, 0).unwrap();
        assert!(kfold.split(3).is_err());
    }

    #[test]
    fn test_cv_results_stats() {
        let results = CVResults::from_scores(vec![0.8, 0.9, 1.0]);
        assert!((results.mean_score - 0.9).abs() < 1e-12);
        assert!((results.std_score - 0.1).abs() < 1e-12);
    }
}
