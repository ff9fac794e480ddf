//! Linear probe over pooled colour statistics.
//!
//! Features are the per-channel mean and standard deviation of the input
//! tensor (R, G, B means, then R, G, B deviations). Logits are `W·f + b`,
//! turned into probabilities with a softmax.
use super::Classifier;
use crate::error::ClassifierError;
use crate::normalize::ModelInputTensor;
use crate::probability::{ProbabilityVector, NUM_CLASSES};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const FEATURE_COUNT: usize = 6;

/// On-disk form of a [`LinearProbe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearProbeArtifact {
    pub version: String,
    /// Expected `[width, height]` of the input tensor, if the probe was
    /// fitted for a specific size.
    #[serde(default)]
    pub input_size: Option<[usize; 2]>,
    pub weights: [[f64; FEATURE_COUNT]; NUM_CLASSES],
    pub bias: [f64; NUM_CLASSES],
}

#[derive(Clone, Debug)]
pub struct LinearProbe {
    artifact: LinearProbeArtifact,
}

impl LinearProbe {
    pub fn new(artifact: LinearProbeArtifact) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &LinearProbeArtifact {
        &self.artifact
    }

    fn features(input: &ModelInputTensor) -> [f64; FEATURE_COUNT] {
        let stats = input.channel_stats();
        let mut f = [0.0; FEATURE_COUNT];
        for (c, (mean, std)) in stats.iter().enumerate() {
            f[c] = *mean;
            f[c + 3] = *std;
        }
        f
    }

    fn check_shape(&self, input: &ModelInputTensor) -> Result<(), ClassifierError> {
        let shape = input.shape();
        let batch_ok = shape.len() == 4 && shape[0] == 1 && shape[3] == 3;
        let size_ok = match self.artifact.input_size {
            Some([w, h]) => batch_ok && shape[1] == h && shape[2] == w,
            None => batch_ok,
        };
        if size_ok {
            return Ok(());
        }
        let expected = match self.artifact.input_size {
            Some([w, h]) => format!("[1, {h}, {w}, 3]"),
            None => "[1, H, W, 3]".to_string(),
        };
        Err(ClassifierError::Shape {
            expected,
            actual: shape.to_vec(),
        })
    }
}

fn softmax(logits: [f64; NUM_CLASSES]) -> [f64; NUM_CLASSES] {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp = logits.map(|l| (l - max).exp());
    let sum: f64 = exp.iter().sum();
    exp.map(|e| e / sum)
}

impl Classifier for LinearProbe {
    fn predict(&self, input: &ModelInputTensor) -> Result<ProbabilityVector, ClassifierError> {
        self.check_shape(input)?;
        let f = Self::features(input);
        let mut logits = self.artifact.bias;
        for (logit, row) in logits.iter_mut().zip(&self.artifact.weights) {
            *logit += row.iter().zip(&f).map(|(w, x)| w * x).sum::<f64>();
        }
        Ok(ProbabilityVector::new(softmax(logits)))
    }

    fn version(&self) -> &str {
        &self.artifact.version
    }
}

/// Load a [`LinearProbe`] artifact from JSON.
pub fn load_classifier(path: &Path) -> Result<LinearProbe, ClassifierError> {
    let contents = fs::read_to_string(path).map_err(|source| ClassifierError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: LinearProbeArtifact =
        serde_json::from_str(&contents).map_err(|source| ClassifierError::ArtifactParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "Model {} loaded successfully from {}",
        artifact.version,
        path.display()
    );
    Ok(LinearProbe::new(artifact))
}
