//! Target transformation

use crate::error::{HomepriceError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Transform applied to the sale-price target before fitting.
///
/// `Log1p` stabilizes the variance of right-skewed prices; predictions are
/// inverse-transformed with expm1 before error metrics are computed in
/// original price units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetTransform {
    /// ln(1 + y), inverse exp(y) - 1
    Log1p,
    /// No transformation
    Identity,
}

impl Default for TargetTransform {
    fn default() -> Self {
        TargetTransform::Log1p
    }
}

impl TargetTransform {
    /// Apply the forward transform. `Log1p` requires y > -1 elementwise.
    pub fn apply(&self, y: &Array1<f64>) -> Result<Array1<f64>> {
        match self {
            TargetTransform::Log1p => {
                if let Some(bad) = y.iter().find(|v| **v <= -1.0 || !v.is_finite()) {
                    return Err(HomepriceError::InvalidParameter {
                        name: "target".to_string(),
                        value: bad.to_string(),
                        reason: "log1p requires finite values > -1".to_string(),
                    });
                }
                Ok(y.mapv(f64::ln_1p))
            }
            TargetTransform::Identity => Ok(y.clone()),
        }
    }

    /// Invert the transform on predictions
    pub fn invert(&self, y: &Array1<f64>) -> Array1<f64> {
        match self {
            TargetTransform::Log1p => y.mapv(f64::exp_m1),
            TargetTransform::Identity => y.clone(),
        }
    }
}
