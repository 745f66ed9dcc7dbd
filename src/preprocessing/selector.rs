//! Column selection by type and missingness

use crate::error::{HomepriceError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-column fraction of missing values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingnessProfile {
    fractions: HashMap<String, f64>,
    n_rows: usize,
}

impl MissingnessProfile {
    /// Compute the missing fraction for every column of the frame
    pub fn compute(df: &DataFrame) -> Self {
        let n_rows = df.height();
        let fractions = df
            .get_columns()
            .iter()
            .map(|col| {
                let frac = if n_rows > 0 {
                    col.null_count() as f64 / n_rows as f64
                } else {
                    0.0
                };
                (col.name().to_string(), frac)
            })
            .collect();

        Self { fractions, n_rows }
    }

    /// Missing fraction for a column, if present
    pub fn fraction(&self, column: &str) -> Option<f64> {
        self.fractions.get(column).copied()
    }

    /// Number of rows the profile was computed over
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Columns sorted by descending missing fraction
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .fractions
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out
    }
}

/// Result of column selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedColumns {
    /// Numeric feature columns, frame order
    pub numeric: Vec<String>,
    /// Categorical feature columns, frame order
    pub categorical: Vec<String>,
    /// Columns excluded for missingness >= threshold
    pub excluded_missing: Vec<String>,
}

/// Partitions frame columns into numeric and categorical feature sets,
/// excluding identifier/leakage columns and columns above the missingness
/// threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSelector {
    missing_threshold: f64,
    drop_columns: Vec<String>,
}

impl ColumnSelector {
    /// Create a selector with the given missingness threshold (exclusive
    /// upper bound on the missing fraction) and drop list.
    pub fn new(missing_threshold: f64, drop_columns: Vec<String>) -> Result<Self> {
        if !(0.0..=1.0).contains(&missing_threshold) {
            return Err(HomepriceError::InvalidParameter {
                name: "missing_threshold".to_string(),
                value: missing_threshold.to_string(),
                reason: "must be in [0, 1]".to_string(),
            });
        }
        Ok(Self {
            missing_threshold,
            drop_columns,
        })
    }

    /// Select feature columns from the frame.
    ///
    /// A column is kept only when its missing fraction is strictly below the
    /// threshold; identifier/leakage columns are never kept.
    pub fn select(&self, df: &DataFrame) -> Result<SelectedColumns> {
        let profile = MissingnessProfile::compute(df);

        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        let mut excluded_missing = Vec::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            if self.drop_columns.iter().any(|d| d == &name) {
                continue;
            }

            let frac = profile.fraction(&name).unwrap_or(0.0);
            if frac >= self.missing_threshold {
                excluded_missing.push(name);
                continue;
            }

            match col.dtype() {
                DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64 => numeric.push(name),
                DataType::String | DataType::Categorical(_, _) => categorical.push(name),
                DataType::Boolean => numeric.push(name),
                _ => {}
            }
        }

        Ok(SelectedColumns {
            numeric,
            categorical,
            excluded_missing,
        })
    }

    /// Extract the selected numeric columns as named f64 column vectors.
    ///
    /// Residual nulls (below the threshold by construction) are filled with
    /// the column mean computed on this frame.
    pub fn extract_numeric(
        &self,
        df: &DataFrame,
        columns: &[String],
    ) -> Result<Vec<(String, Vec<f64>)>> {
        let mut out = Vec::with_capacity(columns.len());

        for name in columns {
            let column = df
                .column(name)
                .map_err(|_| HomepriceError::FeatureNotFound(name.clone()))?;
            let casted = column
                .cast(&DataType::Float64)
                .map_err(|e| HomepriceError::DataError(e.to_string()))?;
            let ca = casted
                .f64()
                .map_err(|e| HomepriceError::DataError(e.to_string()))?;

            let mean = ca.mean().unwrap_or(0.0);
            let values: Vec<f64> = ca.into_iter().map(|v| v.unwrap_or(mean)).collect();
            out.push((name.clone(), values));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_missing() -> DataFrame {
        // "sparse" has 3/10 missing (30%), "lot_area" 1/10 (10%), "garage_cars" 0
        df!(
            "id" => &[1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            "lot_area" => &[Some(8450.0), Some(9600.0), Some(11250.0), Some(9550.0), Some(14260.0),
                            Some(14115.0), Some(10084.0), Some(10382.0), None, Some(7420.0)],
            "garage_cars" => &[2.0, 2.0, 2.0, 3.0, 3.0, 2.0, 2.0, 2.0, 1.0, 1.0],
            "sparse" => &[Some(1.0), None, None, None, Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(6.0), Some(7.0)],
            "neighborhood" => &["a", "b", "a", "c", "a", "b", "c", "a", "b", "a"],
            "saleprice" => &[208500.0, 181500.0, 223500.0, 140000.0, 250000.0,
                             143000.0, 307000.0, 200000.0, 129900.0, 118000.0]
        )
        .unwrap()
    }

    #[test]
    fn test_missingness_profile() {
        let df = frame_with_missing();
        let profile = MissingnessProfile::compute(&df);

        assert_eq!(profile.fraction("garage_cars"), Some(0.0));
        assert!((profile.fraction("sparse").unwrap() - 0.3).abs() < 1e-12);
        assert!((profile.fraction("lot_area").unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_excludes_both_kinds() {
        let df = frame_with_missing();
        let selector = ColumnSelector::new(
            0.10,
            vec!["id".to_string(), "saleprice".to_string()],
        )
        .unwrap();
        let selected = selector.select(&df).unwrap();

        // sparse (30%) and lot_area (exactly 10%, >= threshold) are excluded
        assert!(!selected.numeric.contains(&"sparse".to_string()));
        assert!(!selected.numeric.contains(&"lot_area".to_string()));
        assert!(selected.numeric.contains(&"garage_cars".to_string()));
        assert!(selected.categorical.contains(&"neighborhood".to_string()));
        assert_eq!(selected.excluded_missing.len(), 2);
    }

    #[test]
    fn test_drop_columns_never_selected() {
        let df = frame_with_missing();
        let selector = ColumnSelector::new(
            0.5,
            vec!["id".to_string(), "saleprice".to_string()],
        )
        .unwrap();
        let selected = selector.select(&df).unwrap();

        assert!(!selected.numeric.contains(&"id".to_string()));
        assert!(!selected.numeric.contains(&"saleprice".to_string()));
    }

    #[test]
    fn test_extract_numeric_fills_nulls_with_mean() {
        let df = df!(
            "x" => &[Some(1.0), None, Some(3.0)]
        )
        .unwrap();
        let selector = ColumnSelector::new(0.5, vec![]).unwrap();
        let cols = selector
            .extract_numeric(&df, &["x".to_string()])
            .unwrap();

        assert_eq!(cols[0].1, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(ColumnSelector::new(1.5, vec![]).is_err());
    }
}
