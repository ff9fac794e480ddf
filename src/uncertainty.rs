//! Ambiguity detection on the raw (uncalibrated) classifier output.
use crate::calibrate::DOMINANT_PROBABILITY;
use crate::probability::ProbabilityVector;

/// Margin below which a prediction is flagged, unless calibration already
/// pinned the winner.
pub const DEFAULT_UNCERTAINTY_THRESHOLD: f64 = 0.15;

/// Gap between the two highest values. A single class is measured against
/// zero; an empty slice has no margin.
pub fn margin(raw: &[f64]) -> f64 {
    let mut sorted = raw.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    match sorted.as_slice() {
        [] => 0.0,
        [top] => *top,
        [top, second, ..] => top - second,
    }
}

/// Uncertainty flag for `raw`.
///
/// A calibrated top class at or above the 0.9 ceiling is never reported as
/// uncertain, whatever the raw margin; otherwise the flag is
/// `margin(raw) < threshold`.
pub fn assess(raw: &[f64], calibrated_max: f64, threshold: f64) -> bool {
    if calibrated_max >= DOMINANT_PROBABILITY {
        return false;
    }
    margin(raw) < threshold
}

/// Assessor bound to a threshold chosen at detector construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UncertaintyAssessor {
    threshold: f64,
}

impl Default for UncertaintyAssessor {
    fn default() -> Self {
        Self::new(DEFAULT_UNCERTAINTY_THRESHOLD)
    }
}

impl UncertaintyAssessor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn assess(&self, raw: &ProbabilityVector, calibrated_max: f64) -> bool {
        assess(raw.values(), calibrated_max, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibrated_ceiling_forces_certainty() {
        let raw = ProbabilityVector::new([0.34, 0.33, 0.33]);
        let assessor = UncertaintyAssessor::default();
        assert!(margin(raw.values()) < assessor.threshold());
        assert!(!assessor.assess(&raw, 0.9));
        assert!(!assessor.assess(&raw, 0.95));
    }

    #[test]
    fn margin_decides_below_the_ceiling() {
        assert!(assess(&[0.34, 0.33, 0.33], 0.34, 0.15));
        assert!(!assess(&[0.7, 0.2, 0.1], 0.7, 0.15));
        assert!(assess(&[0.55, 0.45], 0.55, 0.15));
    }

    #[test]
    fn margin_of_a_single_class_is_its_value() {
        assert_eq!(margin(&[0.1]), 0.1);
        assert!(assess(&[0.1], 0.1, 0.15));
        assert!(!assess(&[0.8], 0.8, 0.15));
        assert_eq!(margin(&[]), 0.0);
    }

    #[test]
    fn margin_ignores_input_order() {
        let m = margin(&[0.2, 0.5, 0.3]);
        assert!((m - 0.2).abs() < 1e-12);
    }
}
