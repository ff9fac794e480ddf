#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Pipeline stages, usable on their own.
pub mod calibrate;
pub mod classifier;
pub mod diagnosis;
pub mod enhance;
pub mod normalize;
pub mod probability;
pub mod uncertainty;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{DetectorParams, RetinaDetector};
pub use crate::types::{AnalysisOutcome, AnalysisResult, ErrorResult, ImageMetadata};

// Configuration and the classifier seam.
pub use crate::classifier::{load_classifier, Classifier, ClassifierSlot, LinearProbe};
pub use crate::config::{load_config, load_config_or_default, AnalysisConfig};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{AnalysisReport, PipelineStage, PipelineTrace};

pub use crate::error::{AnalysisError, ClassifierError, ConfigError, ImageError};
pub use crate::probability::{Disease, ProbabilityVector};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use retina_detector::prelude::*;
///
/// # fn main() {
/// let (w, h) = (64usize, 48usize);
/// let rgb = vec![90u8; w * h * 3];
/// let raw = RawImage::from_raw(w, h, ChannelOrder::Rgb, rgb).unwrap();
///
/// let det = RetinaDetector::new(
///     AnalysisConfig::default(),
///     DetectorParams::default(),
///     ClassifierSlot::empty(),
/// );
///
/// let outcome = det.analyze_image(&raw);
/// println!("{}", outcome.to_json().unwrap());
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ChannelOrder, RawImage};
    pub use crate::{
        AnalysisConfig, AnalysisOutcome, ClassifierSlot, DetectorParams, RetinaDetector,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::calibrate::calibrate;
    pub use crate::diagnosis::{compose, DiagnosisRecord, DiagnosisTier};
    pub use crate::enhance::{enhance, EnhancementSet, Variant};
    pub use crate::normalize::{normalize, ModelInputTensor};
    pub use crate::uncertainty::{assess, margin, UncertaintyAssessor};

    pub use crate::diagnostics::{InputDescriptor, StageTiming, TimingBreakdown};
}
