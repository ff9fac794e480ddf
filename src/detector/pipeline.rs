//! Detector pipeline driving one retinal analysis end-to-end.
//!
//! Typical usage:
//! ```no_run
//! use retina_detector::{DetectorParams, RetinaDetector};
//! use std::path::Path;
//!
//! let detector = RetinaDetector::from_paths(
//!     Some(Path::new("config.json")),
//!     Some(Path::new("eye_disease_model.json")),
//!     DetectorParams::default(),
//! );
//! let outcome = detector.analyze_path(Path::new("fundus.png"));
//! if let Some(result) = outcome.result() {
//!     println!("{}: {:.3}", result.most_likely_disease, result.confidence);
//! }
//! ```
use super::params::DetectorParams;
use crate::calibrate::calibrate;
use crate::classifier::{load_classifier, ClassifierSlot};
use crate::config::{load_config_or_default, AnalysisConfig};
use crate::diagnosis::compose;
use crate::diagnostics::{elapsed_ms, AnalysisReport, InputDescriptor, PipelineStage, PipelineTrace};
use crate::enhance::{enhance, EnhancementSet};
use crate::error::{AnalysisError, ImageError};
use crate::image::io::{decode_color_image, load_color_image};
use crate::image::{RawImage, COLOR_CHANNELS};
use crate::normalize::normalize;
use crate::types::{
    AnalysisOutcome, AnalysisResult, ImageMetadata, COMPLETED_MESSAGE, NO_DISEASE_DETECTED,
};
use crate::uncertainty::{margin, UncertaintyAssessor};
use log::{debug, error, info};
use std::path::Path;
use std::time::Instant;

/// Retinal photograph analyzer.
///
/// Holds the configuration, the optional classifier and the uncertainty
/// threshold. Nothing is mutated after construction.
#[derive(Clone, Debug)]
pub struct RetinaDetector {
    config: AnalysisConfig,
    params: DetectorParams,
    classifier: ClassifierSlot,
    assessor: UncertaintyAssessor,
}

impl RetinaDetector {
    pub fn new(config: AnalysisConfig, params: DetectorParams, classifier: ClassifierSlot) -> Self {
        let assessor = UncertaintyAssessor::new(params.uncertainty_threshold);
        Self {
            config,
            params,
            classifier,
            assessor,
        }
    }

    /// Build a detector from files on disk.
    ///
    /// A missing or invalid configuration falls back to defaults. A missing
    /// or corrupt classifier artifact leaves the detector without a model, so
    /// analyses report the classifier as unavailable.
    pub fn from_paths(
        config_path: Option<&Path>,
        model_path: Option<&Path>,
        params: DetectorParams,
    ) -> Self {
        let config = match config_path {
            Some(path) => load_config_or_default(path).config,
            None => AnalysisConfig::default(),
        };
        let classifier = match model_path {
            Some(path) => match load_classifier(path) {
                Ok(probe) => ClassifierSlot::from(probe),
                Err(err) => {
                    error!("Error loading model: {err}");
                    ClassifierSlot::empty()
                }
            },
            None => {
                info!("No classifier artifact configured");
                ClassifierSlot::empty()
            }
        };
        Self::new(config, params, classifier)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_loaded()
    }

    /// Analyze an image file.
    pub fn analyze_path(&self, path: &Path) -> AnalysisOutcome {
        self.analyze_path_with_diagnostics(path).outcome
    }

    /// Analyze encoded image bytes (PNG, JPEG, ...).
    pub fn analyze_bytes(&self, bytes: &[u8]) -> AnalysisOutcome {
        self.analyze_bytes_with_diagnostics(bytes).outcome
    }

    /// Analyze an already decoded photograph.
    pub fn analyze_image(&self, raw: &RawImage) -> AnalysisOutcome {
        self.analyze_image_with_diagnostics(raw).outcome
    }

    pub fn analyze_path_with_diagnostics(&self, path: &Path) -> AnalysisReport {
        debug!("RetinaDetector::analyze_path {}", path.display());
        self.decode_and_run(|| load_color_image(path))
    }

    pub fn analyze_bytes_with_diagnostics(&self, bytes: &[u8]) -> AnalysisReport {
        debug!("RetinaDetector::analyze_bytes len={}", bytes.len());
        self.decode_and_run(|| decode_color_image(bytes))
    }

    pub fn analyze_image_with_diagnostics(&self, raw: &RawImage) -> AnalysisReport {
        let total_start = Instant::now();
        let mut trace = PipelineTrace::new();
        let outcome = self.run_traced(raw, &mut trace);
        trace.timings.total_ms = elapsed_ms(total_start);
        AnalysisReport { outcome, trace }
    }

    /// Decode and enhance an image file without classifying it.
    pub fn enhance_path(&self, path: &Path) -> Result<EnhancementSet, ImageError> {
        let raw = load_color_image(path)?;
        self.enhance_image(&raw)
    }

    pub fn enhance_image(&self, raw: &RawImage) -> Result<EnhancementSet, ImageError> {
        enhance(raw, &self.config.preprocessing)
    }

    fn decode_and_run<F>(&self, decode: F) -> AnalysisReport
    where
        F: FnOnce() -> Result<RawImage, ImageError>,
    {
        let total_start = Instant::now();
        let mut trace = PipelineTrace::new();

        let decode_start = Instant::now();
        let decoded = decode();
        trace.timings.record_since("decode", decode_start);

        let outcome = match decoded {
            Ok(raw) => self.run_traced(&raw, &mut trace),
            Err(err) => {
                let err = AnalysisError::ImageDecode {
                    detail: err.to_string(),
                };
                Self::fail(&mut trace, err)
            }
        };
        trace.timings.total_ms = elapsed_ms(total_start);
        AnalysisReport { outcome, trace }
    }

    fn run_traced(&self, raw: &RawImage, trace: &mut PipelineTrace) -> AnalysisOutcome {
        match self.run(raw, trace) {
            Ok(result) => {
                trace.enter(PipelineStage::Done);
                info!(
                    "analysis done detected={} disease={} confidence={:.3} uncertain={}",
                    result.disease_detected,
                    result.most_likely_disease,
                    result.confidence,
                    result.uncertain_prediction
                );
                AnalysisOutcome::Completed(result)
            }
            Err(err) => Self::fail(trace, err),
        }
    }

    fn fail(trace: &mut PipelineTrace, err: AnalysisError) -> AnalysisOutcome {
        match &err {
            AnalysisError::ImageDecode { detail } => error!("Image decode failed: {detail}"),
            other => error!("Error during analysis: {other}"),
        }
        trace.fail();
        AnalysisOutcome::from(err)
    }

    fn run(
        &self,
        raw: &RawImage,
        trace: &mut PipelineTrace,
    ) -> Result<AnalysisResult, AnalysisError> {
        trace.enter(PipelineStage::Loaded);
        trace.input = Some(InputDescriptor {
            width: raw.w,
            height: raw.h,
            channel_order: raw.order,
        });
        let metadata = ImageMetadata::new(raw.w, raw.h, COLOR_CHANNELS);

        if !self.classifier.is_loaded() {
            return Err(AnalysisError::ClassifierUnavailable { metadata });
        }

        let stage_start = Instant::now();
        let enhanced = enhance(raw, &self.config.preprocessing)?;
        trace.timings.record_since("enhance", stage_start);
        trace.enter(PipelineStage::Preprocessed);

        let stage_start = Instant::now();
        let input = normalize(&enhanced.enhanced_color, &self.config)?;
        trace.timings.record_since("normalize", stage_start);
        trace.enter(PipelineStage::Normalized);

        let stage_start = Instant::now();
        let raw_probs = self
            .classifier
            .predict(&input)
            .map_err(|err| AnalysisError::Unexpected(err.to_string()))?;
        trace.timings.record_since("classify", stage_start);
        trace.raw_probabilities = Some(raw_probs);
        trace.raw_margin = Some(margin(raw_probs.values()));
        trace.enter(PipelineStage::Classified);

        let calibrated = calibrate(&raw_probs);
        trace.enter(PipelineStage::Calibrated);

        let confidence = calibrated.max();
        let uncertain = self.assessor.assess(&raw_probs, confidence);
        trace.enter(PipelineStage::Assessed);

        let diagnosis = compose(&calibrated, uncertain);
        trace.enter(PipelineStage::Composed);

        let disease_detected = confidence > self.config.confidence_threshold;
        let most_likely_disease = if disease_detected {
            calibrated.argmax().display_name().to_string()
        } else {
            NO_DISEASE_DETECTED.to_string()
        };

        Ok(AnalysisResult {
            metadata,
            disease_detected,
            most_likely_disease,
            confidence,
            disease_probabilities: calibrated,
            uncertain_prediction: uncertain,
            diagnosis,
            model_version: self.params.model_version.clone(),
            message: COMPLETED_MESSAGE.to_string(),
        })
    }
}
