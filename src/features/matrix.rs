//! Named feature matrix

use crate::error::{HomepriceError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// A feature matrix with named columns.
///
/// Invariant: `names.len() == values.ncols()`. Column names trace every
/// engineered feature back to its source column(s).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Create a matrix from names and values
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(HomepriceError::ShapeError {
                expected: format!("{} column names", values.ncols()),
                actual: format!("{} column names", names.len()),
            });
        }
        Ok(Self { names, values })
    }

    /// Assemble a matrix by horizontally concatenating named column vectors.
    ///
    /// All columns must have the same length.
    pub fn assemble(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err(HomepriceError::PreprocessingError(
                "no feature columns to assemble".to_string(),
            ));
        }

        let n_rows = columns[0].1.len();
        for (name, values) in &columns {
            if values.len() != n_rows {
                return Err(HomepriceError::ShapeError {
                    expected: format!("{} rows", n_rows),
                    actual: format!("{} rows in column {}", values.len(), name),
                });
            }
        }

        let n_cols = columns.len();
        let names: Vec<String> = columns.iter().map(|(n, _)| n.clone()).collect();
        let mut values = Array2::zeros((n_rows, n_cols));
        for (j, (_, col)) in columns.iter().enumerate() {
            for (i, &v) in col.iter().enumerate() {
                values[[i, j]] = v;
            }
        }

        Ok(Self { names, values })
    }

    /// Number of rows (observations)
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (features)
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Column names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Underlying values
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// A single column by index
    pub fn column(&self, j: usize) -> Array1<f64> {
        self.values.column(j).to_owned()
    }

    /// Materialize a row subset in the given index order
    pub fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        for &i in indices {
            if i >= self.nrows() {
                return Err(HomepriceError::ValidationError(format!(
                    "row index {} out of bounds for {} rows",
                    i,
                    self.nrows()
                )));
            }
        }
        let values = self.values.select(Axis(0), indices);
        Ok(Self {
            names: self.names.clone(),
            values,
        })
    }

    /// Check that another matrix can be scored against this one.
    ///
    /// Column counts (and names) must match between a train-derived matrix
    /// and any applied matrix before scoring.
    pub fn check_alignment(&self, other: &FeatureMatrix) -> Result<()> {
        if self.ncols() != other.ncols() {
            return Err(HomepriceError::ShapeError {
                expected: format!("{} feature columns", self.ncols()),
                actual: format!("{} feature columns", other.ncols()),
            });
        }
        if self.names != other.names {
            return Err(HomepriceError::ValidationError(
                "feature column names differ between matrices".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_assemble() {
        let m = FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0]),
            ("b".to_string(), vec![4.0, 5.0, 6.0]),
        ])
        .unwrap();

        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(m.values()[[1, 1]], 5.0);
    }

    #[test]
    fn test_assemble_ragged_fails() {
        let result = FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![4.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_name_count_mismatch_fails() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(FeatureMatrix::new(vec!["a".to_string()], values).is_err());
    }

    #[test]
    fn test_take_rows() {
        let m = FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("b".to_string(), vec![5.0, 6.0, 7.0, 8.0]),
        ])
        .unwrap();

        let sub = m.take_rows(&[2, 0]).unwrap();
        assert_eq!(sub.nrows(), 2);
        assert_eq!(sub.values()[[0, 0]], 3.0);
        assert_eq!(sub.values()[[1, 1]], 5.0);

        assert!(m.take_rows(&[9]).is_err());
    }

    #[test]
    fn test_check_alignment() {
        let a = FeatureMatrix::assemble(vec![("a".to_string(), vec![1.0])]).unwrap();
        let b = FeatureMatrix::assemble(vec![("a".to_string(), vec![2.0, 3.0])]).unwrap();
        let c = FeatureMatrix::assemble(vec![("c".to_string(), vec![2.0])]).unwrap();
        let d = FeatureMatrix::assemble(vec![
            ("a".to_string(), vec![1.0]),
            ("b".to_string(), vec![1.0]),
        ])
        .unwrap();

        assert!(a.check_alignment(&b).is_ok());
        assert!(a.check_alignment(&c).is_err());
        assert!(a.check_alignment(&d).is_err());
    }
}
