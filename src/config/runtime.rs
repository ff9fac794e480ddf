//! Runtime configuration for the `retina_detector` binary.
use crate::uncertainty::DEFAULT_UNCERTAINTY_THRESHOLD;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Write the analysis report here instead of printing it.
    pub json_out: Option<PathBuf>,
    /// Directory receiving every enhancement variant as PNG plus the trace.
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    /// Analysis configuration; defaults apply when absent or unreadable.
    pub config_path: Option<PathBuf>,
    /// Classifier artifact; the analysis reports an unavailable model when
    /// absent or unreadable.
    pub model_path: Option<PathBuf>,
    #[serde(default = "default_uncertainty_threshold")]
    pub uncertainty_threshold: f64,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_uncertainty_threshold() -> f64 {
    DEFAULT_UNCERTAINTY_THRESHOLD
}

pub fn load_runtime_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

/// Parse `<program> <runtime_config.json>` from the process arguments.
pub fn parse_cli(program: &str) -> Result<RuntimeConfig, String> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <runtime_config.json>"))?;
    if args.next().is_some() {
        return Err(format!("Usage: {program} <runtime_config.json>"));
    }
    load_runtime_config(Path::new(&path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_runtime_config_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str(r#"{"input_path": "eye.png"}"#).unwrap();
        assert_eq!(cfg.input_path, PathBuf::from("eye.png"));
        assert!(cfg.model_path.is_none());
        assert_eq!(cfg.uncertainty_threshold, 0.15);
        assert!(cfg.output.debug_dir.is_none());
    }
}
