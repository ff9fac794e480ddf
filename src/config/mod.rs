//! Analysis configuration: loading, validation and default fallback.
//!
//! The configuration is a JSON record. Every key is optional and falls back
//! to its documented default. [`load_config`] is strict; [`load_config_or_default`]
//! never fails and replaces a missing, unreadable, unparseable or invalid file
//! with the full default set, so a corrupt override is never partially applied.

pub mod runtime;

use crate::error::ConfigError;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Scaling applied to the resized image before classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// Subtract the image's own mean, divide by its own standard deviation.
    #[default]
    PerImage,
    /// Per-channel ImageNet mean/std.
    Imagenet,
    /// Divide by 255.
    ZeroOne,
}

/// Parameters of the image enhancement stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// CLAHE clip limit, relative to the mean histogram bin height.
    pub clahe_clip_limit: f32,
    /// CLAHE tile grid as `[rows, cols]`.
    pub clahe_grid_size: [usize; 2],
    /// Non-local-means filter strength; `0` disables denoising.
    pub denoise_strength: u32,
    /// Exponent of the gamma curve applied to the green channel.
    pub gamma_correction: f32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            clahe_clip_limit: 2.0,
            clahe_grid_size: [8, 8],
            denoise_strength: 10,
            gamma_correction: 1.2,
        }
    }
}

/// Session-wide analysis configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Classifier input as `[width, height]`.
    pub input_size: [u32; 2],
    pub normalization_method: NormalizationMethod,
    /// Calibrated confidence a class must exceed to count as detected.
    pub confidence_threshold: f64,
    /// Carried for compatibility; single-model inference ignores it.
    pub ensemble_models: bool,
    pub preprocessing: PreprocessingConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_size: [224, 224],
            normalization_method: NormalizationMethod::PerImage,
            confidence_threshold: 0.5,
            ensemble_models: false,
            preprocessing: PreprocessingConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn input_width(&self) -> u32 {
        self.input_size[0]
    }

    pub fn input_height(&self) -> u32 {
        self.input_size[1]
    }

    /// Check every range constraint, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [w, h] = self.input_size;
        if w == 0 || h == 0 {
            return Err(ConfigError::Invalid(format!(
                "input_size must be positive, got [{w}, {h}]"
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold must lie in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        self.preprocessing.validate()
    }
}

impl PreprocessingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.clahe_clip_limit.is_finite() && self.clahe_clip_limit > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "preprocessing.clahe_clip_limit must be > 0, got {}",
                self.clahe_clip_limit
            )));
        }
        let [rows, cols] = self.clahe_grid_size;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "preprocessing.clahe_grid_size must be positive, got [{rows}, {cols}]"
            )));
        }
        if !(self.gamma_correction.is_finite() && self.gamma_correction > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "preprocessing.gamma_correction must be > 0, got {}",
                self.gamma_correction
            )));
        }
        Ok(())
    }
}

/// Parse and validate a configuration from a JSON string.
pub fn parse_config(contents: &str, path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let config: AnalysisConfig =
        serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents, path)
}

/// Loaded configuration together with where it came from.
#[derive(Clone, Debug)]
pub struct ConfigHandle {
    pub config: AnalysisConfig,
    /// File the configuration was read from; `None` when defaults are in use.
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConfigHandle {
    pub fn is_default(&self) -> bool {
        self.source.is_none()
    }
}

/// Load `path`, falling back to [`AnalysisConfig::default`] on any failure.
pub fn load_config_or_default(path: &Path) -> ConfigHandle {
    if !path.exists() {
        let msg = format!(
            "No configuration found at {}. Using defaults.",
            path.display()
        );
        warn!("{msg}");
        return ConfigHandle {
            config: AnalysisConfig::default(),
            source: None,
            warnings: vec![msg],
        };
    }

    match load_config(path) {
        Ok(config) => {
            info!("Configuration loaded from {}", path.display());
            ConfigHandle {
                config,
                source: Some(path.to_path_buf()),
                warnings: Vec::new(),
            }
        }
        Err(err) => {
            let msg = format!("Error loading configuration: {err}. Using defaults.");
            error!("{msg}");
            ConfigHandle {
                config: AnalysisConfig::default(),
                source: None,
                warnings: vec![msg],
            }
        }
    }
}

#[cfg(test)]
mod tests;
