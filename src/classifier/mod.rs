//! Classifier seam.
//!
//! The pipeline treats the model as an opaque, blocking collaborator: one
//! [`ModelInputTensor`] in, one raw [`ProbabilityVector`] out. Implementations
//! must be `Send + Sync`; a detector shares its classifier across concurrent
//! analyses without locking.
//!
//! [`LinearProbe`] is a small loadable artifact implementing the trait.

mod linear;

pub use linear::{load_classifier, LinearProbe, LinearProbeArtifact, FEATURE_COUNT};

use crate::error::ClassifierError;
use crate::normalize::ModelInputTensor;
use crate::probability::{ProbabilityVector, NUM_CLASSES};
use std::fmt;
use std::sync::Arc;

pub trait Classifier: Send + Sync {
    /// Raw class distribution for one input, in [`Disease::ALL`] order.
    ///
    /// [`Disease::ALL`]: crate::probability::Disease::ALL
    fn predict(&self, input: &ModelInputTensor) -> Result<ProbabilityVector, ClassifierError>;

    /// Version tag of the loaded model.
    fn version(&self) -> &str;
}

/// Optional, shared classifier handle held by a detector.
#[derive(Clone, Default)]
pub struct ClassifierSlot {
    inner: Option<Arc<dyn Classifier>>,
}

impl ClassifierSlot {
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn loaded(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            inner: Some(classifier),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self) -> Option<&dyn Classifier> {
        self.inner.as_deref()
    }

    /// Predict with the loaded classifier and validate its output.
    pub fn predict(&self, input: &ModelInputTensor) -> Result<ProbabilityVector, ClassifierError> {
        let classifier = self.get().ok_or(ClassifierError::Unavailable)?;
        let raw = classifier.predict(input)?;
        validate_distribution(raw.values())
    }
}

impl<C: Classifier + 'static> From<C> for ClassifierSlot {
    fn from(classifier: C) -> Self {
        Self::loaded(Arc::new(classifier))
    }
}

impl fmt::Debug for ClassifierSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierSlot")
            .field("loaded", &self.is_loaded())
            .field("version", &self.get().map(|c| c.version().to_string()))
            .finish()
    }
}

/// Check that `values` is a usable distribution and rescale it to sum to 1.
pub fn validate_distribution(values: &[f64]) -> Result<ProbabilityVector, ClassifierError> {
    if values.len() != NUM_CLASSES {
        return Err(ClassifierError::InvalidOutput(format!(
            "expected {NUM_CLASSES} probabilities, got {}",
            values.len()
        )));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(ClassifierError::InvalidOutput(format!(
            "probability {bad} is negative or not finite"
        )));
    }
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        return Err(ClassifierError::InvalidOutput(
            "probabilities sum to zero".to_string(),
        ));
    }
    let mut out = [0.0; NUM_CLASSES];
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = v / sum;
    }
    Ok(ProbabilityVector::new(out))
}
