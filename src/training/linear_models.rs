//! Linear model implementations

use crate::error::{HomepriceError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Solve a symmetric positive-definite system Ax = b via Cholesky
/// decomposition, retrying once with a diagonal jitter when the matrix is
/// near-singular.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    match try_cholesky(a, b) {
        Some(x) => Ok(x),
        None => {
            let n = a.nrows();
            let jitter = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
            let mut a_reg = a.clone();
            for k in 0..n {
                a_reg[[k, k]] += jitter.max(1e-12);
            }
            try_cholesky(&a_reg, b).ok_or_else(|| {
                HomepriceError::ComputationError(
                    "normal equations are singular, cannot solve".to_string(),
                )
            })
        }
    }
}

fn try_cholesky(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // A = L * L^T
    let mut l = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Center X and y around their training means when fitting an intercept
fn center(
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> (Array2<f64>, Array1<f64>, Array1<f64>, f64) {
    let x_mean = x
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(x.ncols()));
    let y_mean = y.mean().unwrap_or(0.0);
    let x_c = x - &x_mean.clone().insert_axis(Axis(0));
    let y_c = y - y_mean;
    (x_c, y_c, x_mean, y_mean)
}

fn check_shapes(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(HomepriceError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(HomepriceError::TrainingError(
            "cannot fit on an empty matrix".to_string(),
        ));
    }
    Ok(())
}

/// Ordinary least squares baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new OLS model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            is_fitted: false,
        }
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fit via the normal equations: (X^T X) w = X^T y
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_shapes(x, y)?;

        let (x_c, y_c, x_mean, y_mean) = if self.fit_intercept {
            let (xc, yc, xm, ym) = center(x, y);
            (xc, yc, Some(xm), Some(ym))
        } else {
            (x.clone(), y.clone(), None, None)
        };

        let xtx = x_c.t().dot(&x_c);
        let xty = x_c.t().dot(&y_c);
        let coefficients = cholesky_solve(&xtx, &xty)?;

        self.intercept = match (x_mean, y_mean) {
            (Some(xm), Some(ym)) => Some(ym - coefficients.dot(&xm)),
            _ => Some(0.0),
        };
        self.coefficients = Some(coefficients);
        self.is_fitted = true;
        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(HomepriceError::ModelNotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(HomepriceError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }

    /// Coefficient of determination on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        Ok(r_squared(y, &y_pred))
    }
}

/// Ridge regression (L2-regularized linear regression)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    pub fit_intercept: bool,
    /// L2 regularization strength, must be finite and non-negative
    pub alpha: f64,
    pub is_fitted: bool,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha,
            is_fitted: false,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fit via the regularized normal equations:
    /// (X^T X + alpha * I) w = X^T y
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_shapes(x, y)?;

        // The L2 penalty is only defined for non-negative strengths
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(HomepriceError::InvalidParameter {
                name: "alpha".to_string(),
                value: self.alpha.to_string(),
                reason: "regularization strength must be finite and non-negative".to_string(),
            });
        }

        let (x_c, y_c, x_mean, y_mean) = if self.fit_intercept {
            let (xc, yc, xm, ym) = center(x, y);
            (xc, yc, Some(xm), Some(ym))
        } else {
            (x.clone(), y.clone(), None, None)
        };

        let mut xtx = x_c.t().dot(&x_c);
        for i in 0..x.ncols() {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_c.t().dot(&y_c);
        let coefficients = cholesky_solve(&xtx, &xty)?;

        self.intercept = match (x_mean, y_mean) {
            (Some(xm), Some(ym)) => Some(ym - coefficients.dot(&xm)),
            _ => Some(0.0),
        };
        self.coefficients = Some(coefficients);
        self.is_fitted = true;
        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(HomepriceError::ModelNotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(HomepriceError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }

    /// Coefficient of determination on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        Ok(r_squared(y, &y_pred))
    }
}

/// R² of predictions against observations
pub fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let y_mean = y_true.mean().unwrap_or(0.0);
    let ss_res = (y_pred - y_true).mapv(|v| v * v).sum();
    let ss_tot = y_true.mapv(|v| (v - y_mean).powi(2)).sum();
    if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    }
}
