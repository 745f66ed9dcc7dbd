//! Categorical dummy encoding with explicit missing indicators

use crate::error::{HomepriceError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One-hot encoder for the selected categorical columns.
///
/// A source column with k observed non-null categories produces exactly k+1
/// indicator columns: one per category plus a trailing missing indicator.
/// Indicators per source column are mutually exclusive and exhaustive, so
/// each row's k+1 indicators sum to exactly 1. Categories unseen at
/// transform time fall into the missing indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DummyEncoder {
    // Column name -> categories in order of first appearance during fit
    categories: HashMap<String, Vec<String>>,
    // Fit-time column order, so output column order is stable
    column_order: Vec<String>,
    is_fitted: bool,
}

impl Default for DummyEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {
            categories: HashMap::new(),
            column_order: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the encoder: record the observed non-null categories per column
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.categories.clear();
        self.column_order = columns.to_vec();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| HomepriceError::FeatureNotFound(col_name.clone()))?;
            let ca = Self::as_str_chunked(column, col_name)?;

            let mut seen: Vec<String> = Vec::new();
            for val in ca.into_iter().flatten() {
                if !seen.iter().any(|s| s == val) {
                    seen.push(val.to_string());
                }
            }
            self.categories.insert(col_name.clone(), seen);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the fitted columns into named indicator vectors.
    ///
    /// Output order follows fit-time column order; per column the category
    /// indicators come first, the missing indicator last.
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<(String, Vec<f64>)>> {
        if !self.is_fitted {
            return Err(HomepriceError::ModelNotFitted);
        }

        let mut out = Vec::new();

        for col_name in &self.column_order {
            let cats = self
                .categories
                .get(col_name)
                .ok_or_else(|| HomepriceError::FeatureNotFound(col_name.clone()))?;
            let column = df
                .column(col_name)
                .map_err(|_| HomepriceError::FeatureNotFound(col_name.clone()))?;
            let ca = Self::as_str_chunked(column, col_name)?;

            let values: Vec<Option<String>> = ca
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect();

            for cat in cats {
                let indicator: Vec<f64> = values
                    .iter()
                    .map(|v| match v {
                        Some(s) if s == cat => 1.0,
                        _ => 0.0,
                    })
                    .collect();
                out.push((format!("{}={}", col_name, cat), indicator));
            }

            // Null or unseen at transform time
            let missing: Vec<f64> = values
                .iter()
                .map(|v| match v {
                    Some(s) if cats.iter().any(|c| c == s) => 0.0,
                    _ => 1.0,
                })
                .collect();
            out.push((format!("{}=missing", col_name), missing));
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(
        &mut self,
        df: &DataFrame,
        columns: &[String],
    ) -> Result<Vec<(String, Vec<f64>)>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Number of indicator columns the fitted encoder produces
    pub fn n_output_columns(&self) -> usize {
        self.column_order
            .iter()
            .filter_map(|c| self.categories.get(c))
            .map(|cats| cats.len() + 1)
            .sum()
    }

    fn as_str_chunked<'a>(column: &'a Column, name: &str) -> Result<&'a StringChunked> {
        column
            .as_materialized_series()
            .str()
            .map_err(|_| {
                HomepriceError::PreprocessingError(format!(
                    "column {} is not a string column",
                    name
                ))
            })
    }
}
