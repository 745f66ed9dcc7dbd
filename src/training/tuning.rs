//! Ridge regularization-strength grid search

use crate::error::{HomepriceError, Result};
use crate::training::cross_validation::{CVResults, KFold};
use crate::training::linear_models::RidgeRegression;
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Cross-validated outcome for a single alpha candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub alpha: f64,
    pub cv: CVResults,
}

/// Grid search over Ridge alpha candidates, scored by mean k-fold
/// validation R².
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeGridSearch {
    alphas: Vec<f64>,
    kfold: KFold,
}

impl RidgeGridSearch {
    /// Default alpha grid spanning four orders of magnitude
    pub fn default_grid() -> Vec<f64> {
        vec![0.01, 0.1, 1.0, 10.0, 100.0]
    }

    /// Build a grid search. Non-finite candidates are rejected outright;
    /// negative candidates are dropped with a warning since the L2 penalty
    /// is undefined for them. At least one usable candidate must remain.
    pub fn new(alphas: Vec<f64>, n_folds: usize, seed: u64) -> Result<Self> {
        if let Some(bad) = alphas.iter().find(|a| !a.is_finite()) {
            return Err(HomepriceError::InvalidParameter {
                name: "alphas".to_string(),
                value: bad.to_string(),
                reason: "alpha candidates must be finite".to_string(),
            });
        }

        let mut usable = Vec::with_capacity(alphas.len());
        for alpha in alphas {
            if alpha < 0.0 {
                warn!(alpha, "dropping negative alpha candidate");
            } else {
                usable.push(alpha);
            }
        }
        if usable.is_empty() {
            return Err(HomepriceError::InvalidParameter {
                name: "alphas".to_string(),
                value: "[]".to_string(),
                reason: "no non-negative alpha candidates remain".to_string(),
            });
        }

        Ok(Self {
            alphas: usable,
            kfold: KFold::new(n_folds, seed)?,
        })
    }

    /// Alpha candidates that survived validation
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Evaluate every candidate with k-fold cross-validation and return the
    /// results ordered as the candidates, plus the winning alpha. Ties on
    /// mean score go to the earliest candidate.
    pub fn search(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<(f64, Vec<GridSearchResult>)> {
        let splits = self.kfold.split(x.nrows())?;

        let results: Result<Vec<GridSearchResult>> = self
            .alphas
            .par_iter()
            .map(|&alpha| {
                let mut fold_scores = Vec::with_capacity(splits.len());
                for split in &splits {
                    let x_train = x.select(Axis(0), &split.train_indices);
                    let y_train = y.select(Axis(0), &split.train_indices);
                    let x_val = x.select(Axis(0), &split.test_indices);
                    let y_val = y.select(Axis(0), &split.test_indices);

                    let mut model = RidgeRegression::new(alpha);
                    model.fit(&x_train, &y_train)?;
                    fold_scores.push(model.score(&x_val, &y_val)?);
                }
                Ok(GridSearchResult {
                    alpha,
                    cv: CVResults::from_scores(fold_scores),
                })
            })
            .collect();
        let results = results?;

        let mut best_alpha = results[0].alpha;
        let mut best_score = results[0].cv.mean_score;
        for result in &results {
            debug!(
                alpha = result.alpha,
                mean_r2 = result.cv.mean_score,
                "grid search candidate"
            );
            if result.cv.mean_score > best_score {
                best_score = result.cv.mean_score;
                best_alpha = result.alpha;
            }
        }

        Ok((best_alpha, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn noisy_linear_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut x = Array2::zeros((n, 3));
        let mut y = Array1::zeros(n);
        for i in 0..n {
            for j in 0..3 {
                x[[i, j]] = rng.gen_range(-1.0..1.0);
            }
            y[i] = 2.0 * x[[i, 0]] - x[[i, 1]] + 0.5 * x[[i, 2]]
                + rng.gen_range(-0.05..0.05);
        }
        (x, y)
    }

    #[test]
    fn test_negative_candidates_are_dropped() {
        let search = RidgeGridSearch::new(vec![-1.0, 0.1, -3.0, 1.0], 3, 0).unwrap();
        assert_eq!(search.alphas(), &[0.1, 1.0]);
    }

    #[test]
    fn test_all_negative_grid_rejected() {
        assert!(RidgeGridSearch::new(vec![-1.0, -2.0], 3, 0).is_err());
    }

    #[test]
    fn test_non_finite_candidate_rejected() {
        assert!(RidgeGridSearch::new(vec![0.1, f64::NAN], 3, 0).is_err());
        assert!(RidgeGridSearch::new(vec![f64::INFINITY], 3, 0).is_err());
    }

    #[test]
    fn test_search_prefers_small_alpha_on_clean_data() {
        let (x, y) = noisy_linear_data(120);
        let search = RidgeGridSearch::new(vec![0.01, 1000.0], 5, 42).unwrap();
        let (best, results) = search.search(&x, &y).unwrap();

        // Near-noiseless linear data: heavy shrinkage only hurts
        assert_eq!(best, 0.01);
        assert_eq!(results.len(), 2);
        assert!(results[0].cv.mean_score > results[1].cv.mean_score);
    }

    #[test]
    fn test_search_is_deterministic() {
        let (x, y) = noisy_linear_data(80);
        let grid = RidgeGridSearch::default_grid();
        let a = RidgeGridSearch::new(grid.clone(), 4, 11).unwrap();
        let b = RidgeGridSearch::new(grid, 4, 11).unwrap();

        let (best_a, res_a) = a.search(&x, &y).unwrap();
        let (best_b, res_b) = b.search(&x, &y).unwrap();
        assert_eq!(best_a, best_b);
        for (ra, rb) in res_a.iter().zip(res_b.iter()) {
            assert_eq!(ra.cv.fold_scores, rb.cv.fold_scores);
        }
    }
}
