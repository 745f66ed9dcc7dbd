//! Data loading utilities

use crate::error::{HomepriceError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loader for the delimited flat files the pipeline consumes.
pub struct DataLoader {
    /// Number of rows used for schema inference
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: 100,
        }
    }

    /// Set the number of rows used for schema inference
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = n;
        self
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        self.load_delimited(path, b',')
    }

    /// Load a delimited file with an explicit separator
    pub fn load_delimited(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| HomepriceError::DataError(format!("{}: {}", path.display(), e)))?;

        let parse_opts = CsvParseOptions::default().with_separator(delimiter);

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| HomepriceError::DataError(e.to_string()))
    }

    /// Detect the delimiter from the file extension and load
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let delimiter = match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        self.load_delimited(path, delimiter)
    }

    /// Read header and row count without materializing the full frame
    pub fn get_file_info(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| HomepriceError::DataError(format!("{}: {}", path.display(), e)))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = lines
            .next()
            .transpose()
            .map_err(|e| HomepriceError::DataError(e.to_string()))?
            .unwrap_or_default();

        let columns: Vec<String> = header.split(',').map(|s| s.trim().to_string()).collect();
        let n_cols = columns.len();
        let n_rows = lines.count();

        Ok(FileInfo {
            path: path.display().to_string(),
            n_rows,
            n_cols,
            columns,
        })
    }
}

/// File information
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<String>,
}
