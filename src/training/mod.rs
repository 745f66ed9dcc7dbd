//! Model training module
//!
//! Linear models (OLS baseline, Ridge), k-fold cross-validation,
//! regularization-strength grid search, and regression metrics.

pub mod cross_validation;
pub mod linear_models;
pub mod metrics;
pub mod tuning;

pub use cross_validation::{CVResults, CVSplit, KFold};
pub use linear_models::{LinearRegression, RidgeRegression};
pub use metrics::{RegressionReport, ResidualSummary};
pub use tuning::{GridSearchResult, RidgeGridSearch};
