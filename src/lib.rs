//! Housing sale-price regression pipeline.
//!
//! Loads pre-cleaned housing CSVs, selects feature columns by type and
//! missingness, dummy-encodes categoricals with explicit missing indicators,
//! optionally expands degree-2 polynomial/interaction terms, and fits an OLS
//! baseline plus a cross-validated Ridge model on the log-transformed sale
//! price. Holdout metrics are reported in original price units.

pub mod cli;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod preprocessing;
pub mod split;
pub mod training;
pub mod utils;

pub use error::{HomepriceError, Result};
pub use pipeline::{PipelineConfig, PipelineReport, PricePipeline};
