use retina_detector::config::runtime::{self, RuntimeConfig};
use retina_detector::diagnostics::AnalysisReport;
use retina_detector::enhance::Variant;
use retina_detector::image::io::{load_color_image, save_color_u8, save_gray_u8, write_json_file};
use retina_detector::{AnalysisOutcome, DetectorParams, RetinaDetector};
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "retina_detector".to_string());
    let config = runtime::parse_cli(&program)?;

    let params = DetectorParams {
        uncertainty_threshold: config.uncertainty_threshold,
        ..Default::default()
    };
    let detector = RetinaDetector::from_paths(
        config.config_path.as_deref(),
        config.model_path.as_deref(),
        params,
    );

    let report = detector.analyze_path_with_diagnostics(&config.input_path);
    print_summary(&report);

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &report.outcome).map_err(|e| e.to_string())?;
            println!("JSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&report.outcome)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &detector, &config, &report)?;
        eprintln!("Debug artifacts written to {}", dir.display());
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let trace = &report.trace;
    eprintln!("Analysis summary");
    eprintln!("  stage: {:?}", trace.stage);
    if let Some(input) = &trace.input {
        eprintln!(
            "  input: {}x{} ({:?})",
            input.width, input.height, input.channel_order
        );
    }
    let stages: Vec<String> = trace
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    eprintln!(
        "  timings (ms): {} total={:.3}",
        stages.join(" "),
        trace.timings.total_ms
    );
    match &report.outcome {
        AnalysisOutcome::Completed(result) => {
            eprintln!(
                "  {} (confidence {:.3}, uncertain {})",
                result.most_likely_disease, result.confidence, result.uncertain_prediction
            );
            if let Some(margin) = trace.raw_margin {
                eprintln!("  raw margin: {margin:.3}");
            }
        }
        AnalysisOutcome::Failed(err) => eprintln!("  error: {}", err.error),
    }
}

fn save_debug_artifacts(
    dir: &Path,
    detector: &RetinaDetector,
    config: &RuntimeConfig,
    report: &AnalysisReport,
) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;

    write_json_file(&dir.join("trace.json"), &report.trace).map_err(|e| e.to_string())?;

    // Variants are only available for images that decode.
    let Ok(raw) = load_color_image(&config.input_path) else {
        return Ok(());
    };
    let set = detector.enhance_image(&raw).map_err(|e| e.to_string())?;
    for (name, variant) in set.variants() {
        let path = dir.join(format!("{name}.png"));
        let written = match variant {
            Variant::Color(img) => save_color_u8(img, &path),
            Variant::Gray(img) => save_gray_u8(img, &path),
        };
        written.map_err(|e| e.to_string())?;
    }
    Ok(())
}
