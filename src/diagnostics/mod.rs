//! Diagnostics data model returned alongside an analysis outcome.
//!
//! `AnalysisReport` is the entry point: the outcome record plus a
//! `PipelineTrace` naming the stage the analysis reached, per-stage timings
//! and the raw classifier output that calibration discards.

pub mod pipeline;
pub mod timing;

pub use pipeline::{AnalysisReport, InputDescriptor, PipelineStage, PipelineTrace};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
