//! Regression evaluation metrics

use crate::error::{HomepriceError, Result};
use crate::training::linear_models::r_squared;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Distribution summary of prediction residuals (y_true - y_pred)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidualSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    /// Residual values at the 10%, 20%, ..., 90% quantiles
    pub deciles: Vec<f64>,
}

impl ResidualSummary {
    fn compute(residuals: &Array1<f64>) -> Self {
        let n = residuals.len() as f64;
        let mean = residuals.mean().unwrap_or(0.0);
        let std = if n > 1.0 {
            (residuals.mapv(|r| (r - mean).powi(2)).sum() / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        let mut sorted: Vec<f64> = residuals.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let deciles = (1..10)
            .map(|d| {
                let pos = (d as f64 / 10.0) * (sorted.len() - 1) as f64;
                let lo = pos.floor() as usize;
                let hi = pos.ceil() as usize;
                let frac = pos - lo as f64;
                sorted[lo] * (1.0 - frac) + sorted[hi] * frac
            })
            .collect();

        Self {
            min: sorted.first().copied().unwrap_or(0.0),
            max: sorted.last().copied().unwrap_or(0.0),
            mean,
            std,
            deciles,
        }
    }
}

/// Regression scores with residual diagnostics, computed in the target's
/// original units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
    pub n_samples: usize,
    pub residuals: ResidualSummary,
}

impl RegressionReport {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(HomepriceError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(HomepriceError::ValidationError(
                "cannot score an empty prediction set".to_string(),
            ));
        }

        let residuals = y_true - y_pred;
        let n = y_true.len() as f64;
        let mse = residuals.mapv(|r| r * r).sum() / n;
        let mae = residuals.mapv(f64::abs).sum() / n;

        Ok(Self {
            r2: r_squared(y_true, y_pred),
            rmse: mse.sqrt(),
            mae,
            n_samples: y_true.len(),
            residuals: ResidualSummary::compute(&residuals),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_predictions() {
        let y = array![100.0, 200.0, 300.0];
        let report = RegressionReport::compute(&y, &y).unwrap();
        assert_eq!(report.r2, 1.0);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.residuals.min, 0.0);
        assert_eq!(report.residuals.max, 0.0);
    }

    #[test]
    fn test_known_errors() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![1.5, 2.5, 2.5, 3.5];
        let report = RegressionReport::compute(&y_true, &y_pred).unwrap();

        assert!((report.rmse - 0.5).abs() < 1e-12);
        assert!((report.mae - 0.5).abs() < 1e-12);
        assert_eq!(report.n_samples, 4);
        assert_eq!(report.residuals.min, -0.5);
        assert_eq!(report.residuals.max, 0.5);
    }

    #[test]
    fn test_mean_prediction_gives_zero_r2() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 2.0];
        let report = RegressionReport::compute(&y_true, &y_pred).unwrap();
        assert!(report.r2.abs() < 1e-12);
    }

    #[test]
    fn test_decile_count_and_order() {
        let y_true = Array1::from_iter((0..100).map(|i| i as f64));
        let y_pred = Array1::zeros(100);
        let report = RegressionReport::compute(&y_true, &y_pred).unwrap();

        assert_eq!(report.residuals.deciles.len(), 9);
        for w in report.residuals.deciles.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let y_true = array![1.0, 2.0];
        let y_pred = array![1.0];
        assert!(RegressionReport::compute(&y_true, &y_pred).is_err());
    }
}
