//! Data preprocessing module
//!
//! Provides the preprocessing stages of the sale-price pipeline:
//! - Column selection by missingness threshold
//! - Categorical dummy encoding with an explicit missing indicator
//! - Feature standardization
//! - Target transformation (log1p / expm1)

mod encoder;
mod scaler;
mod selector;
mod target;

pub use encoder::DummyEncoder;
pub use scaler::StandardScaler;
pub use selector::{ColumnSelector, MissingnessProfile, SelectedColumns};
pub use target::TargetTransform;
