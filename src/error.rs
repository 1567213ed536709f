//! Error types for the cam-eval library.

use thiserror::Error;

/// Result type for cam-eval operations.
pub type Result<T> = std::result::Result<T, CamEvalError>;

/// Error types that can occur during activation-map evaluation.
#[derive(Error, Debug)]
pub enum CamEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error raised by the CSV/DataFrame layer.
    #[error("DataFrame error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),

    /// Activation map contains NaN cells and cannot be thresholded.
    #[error("Invalid activation map: {0}")]
    InvalidActivationMap(String),

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Activation-map dimensions do not match the declared shape.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Missing required column in the annotation table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Empty dataset provided.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),
}
