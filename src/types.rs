use crate::diagnosis::DiagnosisRecord;
use crate::error::AnalysisError;
use crate::probability::ProbabilityVector;
use serde::Serialize;

/// Sentinel reported as `most_likely_disease` below the detection threshold.
pub const NO_DISEASE_DETECTED: &str = "No disease detected";
/// Message attached to every completed analysis.
pub const COMPLETED_MESSAGE: &str = "Eye disease analysis completed.";

/// Source image geometry carried into every result record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    pub height: u32,
    pub width: u32,
    pub channels: u8,
}

impl ImageMetadata {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            height: u32::try_from(height).unwrap_or(u32::MAX),
            width: u32::try_from(width).unwrap_or(u32::MAX),
            channels: u8::try_from(channels).unwrap_or(u8::MAX),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub metadata: ImageMetadata,
    pub disease_detected: bool,
    pub most_likely_disease: String,
    /// Maximum calibrated probability.
    pub confidence: f64,
    /// Calibrated distribution keyed by display name.
    pub disease_probabilities: ProbabilityVector,
    pub uncertain_prediction: bool,
    pub diagnosis: DiagnosisRecord,
    pub model_version: String,
    pub message: String,
}

/// Reduced record emitted when an analysis fails.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorResult {
    pub error: String,
    #[serde(flatten)]
    pub metadata: Option<ImageMetadata>,
}

impl From<&AnalysisError> for ErrorResult {
    fn from(err: &AnalysisError) -> Self {
        Self {
            error: err.to_string(),
            metadata: err.metadata(),
        }
    }
}

/// What one `analyze` call hands back. Serializes as whichever record it
/// holds, with no wrapping tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    Failed(ErrorResult),
}

impl AnalysisOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisOutcome::Completed(_))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Completed(result) => Some(result),
            AnalysisOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            AnalysisOutcome::Completed(_) => None,
            AnalysisOutcome::Failed(err) => Some(err),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl From<AnalysisError> for AnalysisOutcome {
    fn from(err: AnalysisError) -> Self {
        AnalysisOutcome::Failed(ErrorResult::from(&err))
    }
}
