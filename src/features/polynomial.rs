//! Degree-2 polynomial/interaction feature expansion

use crate::error::{HomepriceError, Result};
use crate::features::FeatureMatrix;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Expands a feature matrix with degree-2 polynomial and interaction terms.
///
/// For an input with F columns the output has exactly F + F(F+1)/2 columns:
/// the originals, then x_i * x_j for all i <= j. No bias column is emitted.
/// Output names preserve provenance: `a`, `a^2`, `a * b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialExpander {
    degree: usize,
}

impl PolynomialExpander {
    /// Create an expander. Only degrees 1 (identity) and 2 are supported.
    pub fn new(degree: usize) -> Result<Self> {
        if !(1..=2).contains(&degree) {
            return Err(HomepriceError::InvalidParameter {
                name: "degree".to_string(),
                value: degree.to_string(),
                reason: "only degree 1 or 2 is supported".to_string(),
            });
        }
        Ok(Self { degree })
    }

    /// Expansion degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of output columns for an input with `n_features` columns
    pub fn n_output_columns(&self, n_features: usize) -> usize {
        match self.degree {
            1 => n_features,
            _ => n_features + n_features * (n_features + 1) / 2,
        }
    }

    /// Expand the matrix. Degree 1 returns the input unchanged.
    pub fn expand(&self, m: &FeatureMatrix) -> Result<FeatureMatrix> {
        if self.degree == 1 {
            return Ok(m.clone());
        }

        let n = m.nrows();
        let p = m.ncols();
        let x = m.values();
        let n_out = self.n_output_columns(p);

        let mut names = Vec::with_capacity(n_out);
        let mut values = Array2::zeros((n, n_out));

        // Originals
        for j in 0..p {
            names.push(m.names()[j].clone());
            values.column_mut(j).assign(&x.column(j));
        }

        // Squares and pairwise products
        let mut out_col = p;
        for i in 0..p {
            for j in i..p {
                let name = if i == j {
                    format!("{}^2", m.names()[i])
                } else {
                    format!("{} * {}", m.names()[i], m.names()[j])
                };
                names.push(name);
                for row in 0..n {
                    values[[row, out_col]] = x[[row, i]] * x[[row, j]];
                }
                out_col += 1;
            }
        }

        FeatureMatrix::new(names, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_feature_matrix() -> FeatureMatrix {
        FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![1.0, 3.0]),
            ("b".to_string(), vec![2.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_degree_2_column_count() {
        let m = two_feature_matrix();
        let expander = PolynomialExpander::new(2).unwrap();
        let out = expander.expand(&m).unwrap();

        // F + F(F+1)/2 = 2 + 3 = 5, no bias column
        assert_eq!(out.ncols(), 5);
        assert_eq!(expander.n_output_columns(2), 5);
    }

    #[test]
    fn test_degree_2_values_and_names() {
        let m = two_feature_matrix();
        let out = PolynomialExpander::new(2).unwrap().expand(&m).unwrap();

        assert_eq!(
            out.names(),
            &[
                "a".to_string(),
                "b".to_string(),
                "a^2".to_string(),
                "a * b".to_string(),
                "b^2".to_string()
            ]
        );

        // Row 0: [1, 2] -> [1, 2, 1, 2, 4]
        assert_eq!(out.values()[[0, 2]], 1.0);
        assert_eq!(out.values()[[0, 3]], 2.0);
        assert_eq!(out.values()[[0, 4]], 4.0);
        // Row 1: [3, 4] -> squares 9, product 12, 16
        assert_eq!(out.values()[[1, 2]], 9.0);
        assert_eq!(out.values()[[1, 3]], 12.0);
        assert_eq!(out.values()[[1, 4]], 16.0);
    }

    #[test]
    fn test_degree_1_is_identity() {
        let m = two_feature_matrix();
        let out = PolynomialExpander::new(1).unwrap().expand(&m).unwrap();
        assert_eq!(out.ncols(), 2);
        assert_eq!(out.names(), m.names());
    }

    #[test]
    fn test_count_formula_larger_f() {
        let expander = PolynomialExpander::new(2).unwrap();
        // F = 5 -> 5 + 15 = 20
        assert_eq!(expander.n_output_columns(5), 20);
    }

    #[test]
    fn test_invalid_degree() {
        assert!(PolynomialExpander::new(0).is_err());
        assert!(PolynomialExpander::new(3).is_err());
    }
}
