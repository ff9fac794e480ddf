use super::*;
use tempfile::TempDir;

fn scratch_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn empty_object_yields_defaults() {
    let cfg = parse_config("{}", Path::new("inline")).unwrap();
    assert_eq!(cfg, AnalysisConfig::default());
    assert_eq!(cfg.input_size, [224, 224]);
    assert_eq!(cfg.normalization_method, NormalizationMethod::PerImage);
    assert_eq!(cfg.preprocessing.clahe_grid_size, [8, 8]);
    assert_eq!(cfg.preprocessing.denoise_strength, 10);
}

#[test]
fn partial_preprocessing_block_keeps_other_defaults() {
    let cfg = parse_config(
        r#"{"normalization_method": "zero_one", "preprocessing": {"gamma_correction": 0.8}}"#,
        Path::new("inline"),
    )
    .unwrap();
    assert_eq!(cfg.normalization_method, NormalizationMethod::ZeroOne);
    assert_eq!(cfg.preprocessing.gamma_correction, 0.8);
    assert_eq!(cfg.preprocessing.clahe_clip_limit, 2.0);
}

#[test]
fn out_of_range_values_are_rejected() {
    for json in [
        r#"{"input_size": [0, 224]}"#,
        r#"{"confidence_threshold": 1.5}"#,
        r#"{"preprocessing": {"clahe_clip_limit": 0.0}}"#,
        r#"{"preprocessing": {"clahe_grid_size": [8, 0]}}"#,
        r#"{"preprocessing": {"gamma_correction": -1.0}}"#,
    ] {
        let err = parse_config(json, Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{json}: {err}");
    }
}

#[test]
fn unknown_normalization_method_fails_to_parse() {
    let err = parse_config(r#"{"normalization_method": "minmax"}"#, Path::new("inline"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let handle = load_config_or_default(Path::new("/nonexistent/model_config.json"));
    assert!(handle.is_default());
    assert_eq!(handle.config, AnalysisConfig::default());
    assert_eq!(handle.warnings.len(), 1);
}

#[test]
fn corrupt_file_is_never_partially_applied() {
    let dir = TempDir::new().unwrap();
    let path = scratch_file(
        &dir,
        "corrupt.json",
        r#"{"confidence_threshold": 0.8, "preprocessing": {"gamma_correction": "#,
    );
    let handle = load_config_or_default(&path);
    assert!(handle.is_default());
    assert_eq!(handle.config.confidence_threshold, 0.5);
    assert!(handle.warnings[0].contains("Using defaults"));
}

#[test]
fn invalid_file_is_never_partially_applied() {
    let dir = TempDir::new().unwrap();
    let path = scratch_file(
        &dir,
        "invalid.json",
        r#"{"confidence_threshold": 0.8, "preprocessing": {"gamma_correction": 0}}"#,
    );
    let handle = load_config_or_default(&path);
    assert!(handle.is_default());
    assert_eq!(handle.config, AnalysisConfig::default());
}

#[test]
fn valid_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = scratch_file(
        &dir,
        "valid.json",
        r#"{"input_size": [128, 96], "normalization_method": "imagenet", "ensemble_models": true}"#,
    );
    let handle = load_config_or_default(&path);
    assert_eq!(handle.source.as_deref(), Some(path.as_path()));
    assert_eq!(handle.config.input_width(), 128);
    assert_eq!(handle.config.input_height(), 96);
    assert_eq!(
        handle.config.normalization_method,
        NormalizationMethod::Imagenet
    );
    assert!(handle.config.ensemble_models);
    assert!(handle.warnings.is_empty());
}
