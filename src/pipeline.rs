//! End-to-end sale-price regression pipeline
//!
//! Wires the stages together: column selection, dummy encoding, feature
//! assembly, optional polynomial expansion, seeded train/holdout split,
//! standardization, log-target transform, OLS baseline, Ridge grid search,
//! and holdout evaluation in original price units.

use crate::error::{HomepriceError, Result};
use crate::features::{FeatureMatrix, PolynomialExpander};
use crate::preprocessing::{ColumnSelector, DummyEncoder, StandardScaler, TargetTransform};
use crate::split::train_holdout_split;
use crate::training::{
    GridSearchResult, LinearRegression, RegressionReport, RidgeGridSearch, RidgeRegression,
};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target column name
    pub target_column: String,
    /// Identifier/leakage columns never used as features
    pub drop_columns: Vec<String>,
    /// Exclusive upper bound on a feature column's missing fraction
    pub missing_threshold: f64,
    /// Polynomial expansion degree (1 = off, 2 = squares + interactions)
    pub polynomial_degree: usize,
    /// Fraction of rows reserved for the holdout set
    pub holdout_fraction: f64,
    /// Number of cross-validation folds for the alpha search
    pub cv_folds: usize,
    /// Ridge alpha candidates
    pub alpha_grid: Vec<f64>,
    /// Seed for the split and fold shuffles
    pub seed: u64,
    /// Target transform applied before fitting
    pub target_transform: TargetTransform,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_column: "saleprice".to_string(),
            drop_columns: vec![
                "id".to_string(),
                "pid".to_string(),
                "mo_sold".to_string(),
            ],
            missing_threshold: 0.10,
            polynomial_degree: 2,
            holdout_fraction: 0.2,
            cv_folds: 5,
            alpha_grid: RidgeGridSearch::default_grid(),
            seed: 42,
            target_transform: TargetTransform::Log1p,
        }
    }
}

/// Evaluation outcome of a single fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOutcome {
    pub name: String,
    /// Scores on the held-out subset
    pub holdout: RegressionReport,
    /// Scores over all rows, for gauging train/holdout gap
    pub full: RegressionReport,
}

/// Full run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_holdout: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub excluded_missing: Vec<String>,
    pub feature_names: Vec<String>,
    pub n_features: usize,
    pub best_alpha: f64,
    pub grid: Vec<GridSearchResult>,
    pub baseline: ModelOutcome,
    pub ridge: ModelOutcome,
}

/// Sale-price regression pipeline.
///
/// `fit` trains on a frame and returns a report; afterwards `predict` scores
/// new frames with the fitted encoder, scaler, and Ridge model.
#[derive(Debug, Clone)]
pub struct PricePipeline {
    config: PipelineConfig,
    encoder: DummyEncoder,
    scaler: StandardScaler,
    model: RidgeRegression,
    numeric_columns: Vec<String>,
    feature_names: Vec<String>,
    is_fitted: bool,
}

impl PricePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            encoder: DummyEncoder::new(),
            scaler: StandardScaler::new(),
            model: RidgeRegression::default(),
            numeric_columns: Vec::new(),
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Names of the features the fitted model consumes
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Train on the given frame and evaluate on a held-out subset
    pub fn fit(&mut self, df: &DataFrame) -> Result<PipelineReport> {
        let n_rows = df.height();
        info!(n_rows, n_cols = df.width(), "fitting pipeline");

        // Select feature columns; the target never leaks into the features
        let mut drop = self.config.drop_columns.clone();
        if !drop.contains(&self.config.target_column) {
            drop.push(self.config.target_column.clone());
        }
        let selector = ColumnSelector::new(self.config.missing_threshold, drop)?;
        let selected = selector.select(df)?;
        if selected.numeric.is_empty() && selected.categorical.is_empty() {
            return Err(HomepriceError::PreprocessingError(
                "no usable feature columns after selection".to_string(),
            ));
        }
        info!(
            numeric = selected.numeric.len(),
            categorical = selected.categorical.len(),
            excluded = selected.excluded_missing.len(),
            "selected feature columns"
        );

        // Numeric columns plus dummy-encoded categoricals
        let mut columns = selector.extract_numeric(df, &selected.numeric)?;
        columns.extend(self.encoder.fit_transform(df, &selected.categorical)?);
        let assembled = FeatureMatrix::assemble(columns)?;

        let expander = PolynomialExpander::new(self.config.polynomial_degree)?;
        let features = expander.expand(&assembled)?;
        info!(
            n_features = features.ncols(),
            degree = self.config.polynomial_degree,
            "assembled feature matrix"
        );

        let y = self.extract_target(df)?;
        let y = self.config.target_transform.apply(&y)?;

        let split =
            train_holdout_split(n_rows, self.config.holdout_fraction, self.config.seed)?;
        let x_train = features.take_rows(&split.train_indices)?;
        let x_holdout = features.take_rows(&split.holdout_indices)?;
        let y_train = y.select(ndarray::Axis(0), &split.train_indices);
        let y_holdout = y.select(ndarray::Axis(0), &split.holdout_indices);

        // Standardize with training statistics only
        let x_train = self.scaler.fit_transform(&x_train)?;
        let x_holdout = self.scaler.transform(&x_holdout)?;
        let x_full = self.scaler.transform(&features)?;
        x_train.check_alignment(&x_holdout)?;

        // OLS baseline
        let mut baseline = LinearRegression::new();
        baseline.fit(x_train.values(), &y_train)?;
        let baseline_outcome = ModelOutcome {
            name: "ols".to_string(),
            holdout: self.evaluate(&baseline.predict(x_holdout.values())?, &y_holdout)?,
            full: self.evaluate(&baseline.predict(x_full.values())?, &y)?,
        };
        info!(
            r2 = baseline_outcome.holdout.r2,
            rmse = baseline_outcome.holdout.rmse,
            "baseline holdout scores"
        );

        // Cross-validated alpha search, then refit on the full training set
        let search = RidgeGridSearch::new(
            self.config.alpha_grid.clone(),
            self.config.cv_folds,
            self.config.seed,
        )?;
        let (best_alpha, grid) = search.search(x_train.values(), &y_train)?;
        info!(best_alpha, "alpha grid search complete");

        self.model = RidgeRegression::new(best_alpha);
        self.model.fit(x_train.values(), &y_train)?;
        let ridge_outcome = ModelOutcome {
            name: "ridge".to_string(),
            holdout: self.evaluate(&self.model.predict(x_holdout.values())?, &y_holdout)?,
            full: self.evaluate(&self.model.predict(x_full.values())?, &y)?,
        };
        info!(
            r2 = ridge_outcome.holdout.r2,
            rmse = ridge_outcome.holdout.rmse,
            "ridge holdout scores"
        );

        self.numeric_columns = selected.numeric.clone();
        self.feature_names = x_train.names().to_vec();
        self.is_fitted = true;

        Ok(PipelineReport {
            n_rows,
            n_train: split.train_indices.len(),
            n_holdout: split.holdout_indices.len(),
            numeric_columns: selected.numeric,
            categorical_columns: selected.categorical,
            excluded_missing: selected.excluded_missing,
            feature_names: self.feature_names.clone(),
            n_features: features.ncols(),
            best_alpha,
            grid,
            baseline: baseline_outcome,
            ridge: ridge_outcome,
        })
    }

    /// Predict prices (original units) for a new frame using the fitted
    /// transforms and Ridge model.
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(HomepriceError::ModelNotFitted);
        }

        let features = self.build_features(df)?;
        if features.names() != self.feature_names.as_slice() {
            return Err(HomepriceError::ValidationError(
                "frame produces different feature columns than the fitted pipeline".to_string(),
            ));
        }
        let features = self.scaler.transform(&features)?;

        let predictions = self.model.predict(features.values())?;
        Ok(self.config.target_transform.invert(&predictions))
    }

    fn build_features(&self, df: &DataFrame) -> Result<FeatureMatrix> {
        let selector = ColumnSelector::new(1.0, Vec::new())?;
        let mut columns = selector.extract_numeric(df, &self.numeric_columns)?;
        columns.extend(self.encoder.transform(df)?);
        let assembled = FeatureMatrix::assemble(columns)?;
        PolynomialExpander::new(self.config.polynomial_degree)?.expand(&assembled)
    }

    fn extract_target(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let column = df
            .column(&self.config.target_column)
            .map_err(|_| HomepriceError::FeatureNotFound(self.config.target_column.clone()))?;
        if column.null_count() > 0 {
            return Err(HomepriceError::DataError(format!(
                "target column {} has {} missing values",
                self.config.target_column,
                column.null_count()
            )));
        }
        let casted = column
            .cast(&DataType::Float64)
            .map_err(|e| HomepriceError::DataError(e.to_string()))?;
        let ca = casted
            .f64()
            .map_err(|e| HomepriceError::DataError(e.to_string()))?;
        Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
    }

    /// Score predictions against observations in the target's original units
    fn evaluate(&self, y_pred: &Array1<f64>, y_true: &Array1<f64>) -> Result<RegressionReport> {
        let pred = self.config.target_transform.invert(y_pred);
        let truth = self.config.target_transform.invert(y_true);
        RegressionReport::compute(&truth, &pred)
    }
}
