use super::TimingBreakdown;
use crate::image::ChannelOrder;
use crate::probability::ProbabilityVector;
use crate::types::AnalysisOutcome;
use serde::Serialize;

/// Stages of one analysis, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    Loaded,
    Preprocessed,
    Normalized,
    Classified,
    Calibrated,
    Assessed,
    Composed,
    Done,
    Error,
}

impl PipelineStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Error)
    }
}

/// Result produced by the `*_with_diagnostics` entry points of
/// [`RetinaDetector`](crate::RetinaDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub outcome: AnalysisOutcome,
    pub trace: PipelineTrace,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channel_order: ChannelOrder,
}

/// Record of how far one analysis got and what it measured on the way.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    /// Last stage reached; `Error` when the analysis failed.
    pub stage: PipelineStage,
    /// Last stage completed before a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_after: Option<PipelineStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputDescriptor>,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_probabilities: Option<ProbabilityVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_margin: Option<f64>,
}

impl Default for PipelineTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineTrace {
    pub fn new() -> Self {
        Self {
            stage: PipelineStage::Start,
            failed_after: None,
            input: None,
            timings: TimingBreakdown::default(),
            raw_probabilities: None,
            raw_margin: None,
        }
    }

    /// Advance to `stage`. Stages only move forward; a finished trace is
    /// left untouched.
    pub fn enter(&mut self, stage: PipelineStage) {
        if self.stage.is_terminal() || stage <= self.stage {
            return;
        }
        self.stage = stage;
    }

    /// Move to `Error`, remembering the last completed stage.
    pub fn fail(&mut self) {
        if self.stage.is_terminal() {
            return;
        }
        self.failed_after = Some(self.stage);
        self.stage = PipelineStage::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_only_move_forward() {
        let mut trace = PipelineTrace::new();
        trace.enter(PipelineStage::Loaded);
        trace.enter(PipelineStage::Normalized);
        trace.enter(PipelineStage::Preprocessed);
        assert_eq!(trace.stage, PipelineStage::Normalized);
        trace.enter(PipelineStage::Done);
        trace.enter(PipelineStage::Error);
        assert_eq!(trace.stage, PipelineStage::Done);
    }

    #[test]
    fn failure_remembers_the_last_stage() {
        let mut trace = PipelineTrace::new();
        trace.enter(PipelineStage::Loaded);
        trace.fail();
        assert_eq!(trace.stage, PipelineStage::Error);
        assert_eq!(trace.failed_after, Some(PipelineStage::Loaded));
        trace.enter(PipelineStage::Done);
        assert_eq!(trace.stage, PipelineStage::Error);
    }
}
