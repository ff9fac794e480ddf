use retina_detector::classifier::Classifier;
use retina_detector::normalize::ModelInputTensor;
use retina_detector::{ClassifierError, ProbabilityVector};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns the same raw distribution for every input.
pub struct FixedClassifier {
    probabilities: [f64; 3],
    calls: AtomicUsize,
}

impl FixedClassifier {
    pub fn new(probabilities: [f64; 3]) -> Self {
        Self {
            probabilities,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, input: &ModelInputTensor) -> Result<ProbabilityVector, ClassifierError> {
        assert_eq!(input.shape()[0], 1, "batch of one");
        assert_eq!(input.shape()[3], 3, "three channels");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProbabilityVector::new(self.probabilities))
    }

    fn version(&self) -> &str {
        "fixed-test"
    }
}
