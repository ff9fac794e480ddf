//! Parameter types fixed at detector construction.
//!
//! The analysis configuration (`AnalysisConfig`) comes from a file and may
//! fall back to defaults; these knobs are chosen by the embedding program.
use crate::uncertainty::DEFAULT_UNCERTAINTY_THRESHOLD;

/// Model version reported in every completed result.
pub const DEFAULT_MODEL_VERSION: &str = "1.0.3";

#[derive(Clone, Debug, PartialEq)]
pub struct DetectorParams {
    /// Raw top-two margin below which a prediction is flagged uncertain.
    pub uncertainty_threshold: f64,
    /// Version string copied into `model_version`.
    pub model_version: String,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            uncertainty_threshold: DEFAULT_UNCERTAINTY_THRESHOLD,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}
