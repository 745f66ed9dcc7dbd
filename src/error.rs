//! Error types for the homeprice pipeline

use thiserror::Error;

/// Result type alias for homeprice operations
pub type Result<T> = std::result::Result<T, HomepriceError>;

/// Main error type for the homeprice pipeline
#[derive(Error, Debug)]
pub enum HomepriceError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Computation error: {0}")]
    ComputationError(String),
}

impl From<polars::error::PolarsError> for HomepriceError {
    fn from(err: polars::error::PolarsError) -> Self {
        HomepriceError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for HomepriceError {
    fn from(err: serde_json::Error) -> Self {
        HomepriceError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for HomepriceError {
    fn from(err: ndarray::ShapeError) -> Self {
        HomepriceError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HomepriceError::DataError("bad column".to_string());
        assert_eq!(err.to_string(), "Data error: bad column");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HomepriceError = io_err.into();
        assert!(matches!(err, HomepriceError::IoError(_)));
    }
}
