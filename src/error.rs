//! Error types for every fallible stage of the analysis pipeline.
//!
//! Lower layers return their own error enums; the orchestrator folds them into
//! [`AnalysisError`], which maps one-to-one onto the error records that leave
//! the crate.
use crate::types::ImageMetadata;
use std::path::PathBuf;
use thiserror::Error;

/// Message surfaced for unreadable or corrupt input images.
pub const IMAGE_DECODE_MESSAGE: &str = "Could not read the image.";
/// Message surfaced when no classifier is loaded.
pub const CLASSIFIER_UNAVAILABLE_MESSAGE: &str = "No trained model available for analysis.";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image codec error: {0}")]
    Decode(#[from] ::image::ImageError),
    #[error("invalid image dimensions {width}x{height}")]
    Dimensions { width: usize, height: usize },
    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("plane is {actual:?}, expected {expected:?}")]
    PlaneMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier is not loaded")]
    Unavailable,
    #[error("failed to read classifier artifact {}: {source}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse classifier artifact {}: {source}", path.display())]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("classifier input has shape {actual:?}, expected {expected}")]
    Shape { expected: String, actual: Vec<usize> },
    #[error("classifier produced an invalid distribution: {0}")]
    InvalidOutput(String),
}

#[derive(Debug, Error)]
pub enum TensorError {
    #[error("resize failed: {0}")]
    Image(#[from] ImageError),
    #[error("invalid input size {width}x{height}")]
    InputSize { width: u32, height: u32 },
    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Terminal failure of one `analyze` call.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{}", IMAGE_DECODE_MESSAGE)]
    ImageDecode { detail: String },
    #[error("{}", CLASSIFIER_UNAVAILABLE_MESSAGE)]
    ClassifierUnavailable { metadata: ImageMetadata },
    #[error("{0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Image metadata that survives into the error record, if any.
    pub fn metadata(&self) -> Option<ImageMetadata> {
        match self {
            AnalysisError::ClassifierUnavailable { metadata } => Some(*metadata),
            _ => None,
        }
    }
}

impl From<TensorError> for AnalysisError {
    fn from(err: TensorError) -> Self {
        AnalysisError::Unexpected(err.to_string())
    }
}

impl From<ImageError> for AnalysisError {
    fn from(err: ImageError) -> Self {
        AnalysisError::Unexpected(err.to_string())
    }
}
