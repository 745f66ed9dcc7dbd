//! Feature standardization

use crate::error::{HomepriceError, Result};
use crate::features::FeatureMatrix;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Standard (z-score) scaler over a feature matrix: (x - mean) / std.
///
/// Fit once on the training subset and reuse on any applied subset, so both
/// live on the same scale. Zero-variance columns scale by 1 instead of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
    column_names: Vec<String>,
    is_fitted: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        Self {
            means: Vec::new(),
            stds: Vec::new(),
            column_names: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit per-column mean and standard deviation (sample std, ddof = 1)
    pub fn fit(&mut self, m: &FeatureMatrix) -> Result<&mut Self> {
        let n = m.nrows();
        if n == 0 {
            return Err(HomepriceError::PreprocessingError(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let x = m.values();
        self.means = (0..m.ncols())
            .map(|j| x.column(j).mean().unwrap_or(0.0))
            .collect();
        self.stds = (0..m.ncols())
            .map(|j| {
                let mean = self.means[j];
                let ss: f64 = x.column(j).iter().map(|v| (v - mean).powi(2)).sum();
                let std = if n > 1 {
                    (ss / (n - 1) as f64).sqrt()
                } else {
                    0.0
                };
                if std == 0.0 {
                    1.0
                } else {
                    std
                }
            })
            .collect();
        self.column_names = m.names().to_vec();
        self.is_fitted = true;
        Ok(self)
    }

    /// Center and scale the matrix using the fitted parameters
    pub fn transform(&self, m: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.check_fitted(m)?;

        let mut values = Array2::zeros(m.values().dim());
        for j in 0..m.ncols() {
            let mean = self.means[j];
            let std = self.stds[j];
            for i in 0..m.nrows() {
                values[[i, j]] = (m.values()[[i, j]] - mean) / std;
            }
        }

        FeatureMatrix::new(m.names().to_vec(), values)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, m: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.fit(m)?;
        self.transform(m)
    }

    /// Undo the standardization
    pub fn inverse_transform(&self, m: &FeatureMatrix) -> Result<FeatureMatrix> {
        self.check_fitted(m)?;

        let mut values = Array2::zeros(m.values().dim());
        for j in 0..m.ncols() {
            let mean = self.means[j];
            let std = self.stds[j];
            for i in 0..m.nrows() {
                values[[i, j]] = m.values()[[i, j]] * std + mean;
            }
        }

        FeatureMatrix::new(m.names().to_vec(), values)
    }

    fn check_fitted(&self, m: &FeatureMatrix) -> Result<()> {
        if !self.is_fitted {
            return Err(HomepriceError::ModelNotFitted);
        }
        if m.ncols() != self.means.len() {
            return Err(HomepriceError::ShapeError {
                expected: format!("{} columns", self.means.len()),
                actual: format!("{} columns", m.ncols()),
            });
        }
        if m.names() != self.column_names.as_slice() {
            return Err(HomepriceError::ValidationError(
                "matrix columns differ from the columns the scaler was fit on".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> FeatureMatrix {
        FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b".to_string(), vec![10.0, 20.0, 30.0, 40.0, 50.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_transform_zero_mean_unit_std() {
        let m = sample_matrix();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&m).unwrap();

        let n = scaled.nrows() as f64;
        for j in 0..scaled.ncols() {
            let col = scaled.column(j);
            let mean = col.mean().unwrap();
            let var: f64 =
                col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            assert!(mean.abs() < 1e-10, "column {} mean = {}", j, mean);
            assert!((var.sqrt() - 1.0).abs() < 1e-10, "column {} std = {}", j, var.sqrt());
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = sample_matrix();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&m).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();

        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                assert!((m.values()[[i, j]] - restored.values()[[i, j]]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_constant_column() {
        let m = FeatureMatrix::assemble(vec![("c".to_string(), vec![7.0, 7.0, 7.0])]).unwrap();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&m).unwrap();

        // Scale of 1 for a zero-variance column: output is all zeros
        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_applies_train_scale() {
        let train = sample_matrix();
        let holdout = FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![3.0]),
            ("b".to_string(), vec![30.0]),
        ])
        .unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&train).unwrap();
        let scaled = scaler.transform(&holdout).unwrap();

        // Holdout value equal to the train mean maps to 0 under train scale
        assert!(scaled.values()[[0, 0]].abs() < 1e-10);
        assert!(scaled.values()[[0, 1]].abs() < 1e-10);
    }

    #[test]
    fn test_unfitted_transform_fails() {
        let m = sample_matrix();
        let scaler = StandardScaler::new();
        assert!(matches!(
            scaler.transform(&m),
            Err(HomepriceError::ModelNotFitted)
        ));
    }
}
