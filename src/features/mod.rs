//! Feature assembly and engineering
//!
//! Builds the named feature matrix from selected numeric columns and encoded
//! categorical indicators, and optionally expands it with degree-2
//! polynomial/interaction terms.

mod matrix;
mod polynomial;

pub use matrix::FeatureMatrix;
pub use polynomial::PolynomialExpander;
