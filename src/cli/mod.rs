//! Command-line interface

use crate::pipeline::{PipelineConfig, PipelineReport, PricePipeline};
use crate::preprocessing::MissingnessProfile;
use crate::training::RidgeGridSearch;
use crate::utils::DataLoader;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "homeprice")]
#[command(about = "Housing sale-price regression: OLS baseline and tuned Ridge", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on a CSV file and report holdout metrics
    Train {
        /// Training data CSV
        #[arg(long)]
        data: PathBuf,

        /// Target column
        #[arg(long, default_value = "saleprice")]
        target: String,

        /// Identifier/leakage columns to drop (comma-separated)
        #[arg(long, value_delimiter = ',', default_values_t = [
            "id".to_string(), "pid".to_string(), "mo_sold".to_string()
        ])]
        drop: Vec<String>,

        /// Exclusive missingness threshold for feature columns
        #[arg(long, default_value_t = 0.10)]
        missing_threshold: f64,

        /// Polynomial expansion degree (1 or 2)
        #[arg(long, default_value_t = 2)]
        degree: usize,

        /// Holdout fraction
        #[arg(long, default_value_t = 0.2)]
        holdout: f64,

        /// Cross-validation folds for the alpha search
        #[arg(long, default_value_t = 5)]
        cv_folds: usize,

        /// Ridge alpha candidates (comma-separated)
        #[arg(long, value_delimiter = ',')]
        alphas: Option<Vec<f64>>,

        /// Random seed for split and fold shuffles
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write the full run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Score this CSV with the fitted model after training
        #[arg(long)]
        predict: Option<PathBuf>,

        /// Where to write predictions (CSV with a `prediction` column)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show shape and per-column missingness of a CSV file
    Info {
        /// Data CSV
        #[arg(long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Train {
            data,
            target,
            drop,
            missing_threshold,
            degree,
            holdout,
            cv_folds,
            alphas,
            seed,
            report,
            predict,
            output,
        } => {
            let config = PipelineConfig {
                target_column: target,
                drop_columns: drop,
                missing_threshold,
                polynomial_degree: degree,
                holdout_fraction: holdout,
                cv_folds,
                alpha_grid: alphas.unwrap_or_else(RidgeGridSearch::default_grid),
                seed,
                ..Default::default()
            };
            run_train(&data, config, report, predict, output)
        }
        Commands::Info { data } => run_info(&data),
    }
}

fn run_train(
    data: &PathBuf,
    config: PipelineConfig,
    report_path: Option<PathBuf>,
    predict_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let loader = DataLoader::default();
    let df = loader
        .load_csv(data)
        .with_context(|| format!("failed to load {}", data.display()))?;
    info!(rows = df.height(), cols = df.width(), "loaded training data");

    let mut pipeline = PricePipeline::new(config);
    let run_report = pipeline.fit(&df).context("pipeline training failed")?;
    print_report(&run_report);

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&run_report)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "wrote run report");
    }

    if let Some(path) = predict_path {
        let test_df = loader
            .load_csv(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        let predictions = pipeline.predict(&test_df).context("prediction failed")?;

        let mut out = df!(
            "prediction" => predictions.to_vec()
        )?;
        match output_path {
            Some(out_path) => {
                let mut file = fs::File::create(&out_path)
                    .with_context(|| format!("failed to create {}", out_path.display()))?;
                CsvWriter::new(&mut file).finish(&mut out)?;
                info!(path = %out_path.display(), rows = out.height(), "wrote predictions");
            }
            None => println!("{}", out),
        }
    }

    Ok(())
}

fn run_info(data: &PathBuf) -> Result<()> {
    let loader = DataLoader::default();
    let info = loader
        .get_file_info(data)
        .with_context(|| format!("failed to inspect {}", data.display()))?;
    println!("file:    {}", info.path);
    println!("rows:    {}", info.n_rows);
    println!("columns: {}", info.n_cols);

    let df = loader.load_csv(data)?;
    let profile = MissingnessProfile::compute(&df);
    println!("\nmissingness (descending):");
    for (name, frac) in profile.ranked() {
        println!("  {:<24} {:>6.1}%", name, frac * 100.0);
    }
    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!("rows:            {} ({} train / {} holdout)", report.n_rows, report.n_train, report.n_holdout);
    println!(
        "features:        {} ({} numeric, {} categorical, {} excluded for missingness)",
        report.n_features,
        report.numeric_columns.len(),
        report.categorical_columns.len(),
        report.excluded_missing.len()
    );
    println!("\nalpha grid (mean CV R²):");
    for result in &report.grid {
        let marker = if result.alpha == report.best_alpha { " *" } else { "" };
        println!(
            "  alpha {:>10.4}  r2 {:>8.4} ± {:.4}{}",
            result.alpha, result.cv.mean_score, result.cv.std_score, marker
        );
    }
    println!("\nholdout (original price units):");
    for outcome in [&report.baseline, &report.ridge] {
        println!(
            "  {:<6} r2 {:>8.4}  rmse {:>12.2}  mae {:>12.2}  (full-data r2 {:.4})",
            outcome.name,
            outcome.holdout.r2,
            outcome.holdout.rmse,
            outcome.holdout.mae,
            outcome.full.r2
        );
    }
}
