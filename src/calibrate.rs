//! Fixed-ceiling probability calibration.
//!
//! The winning class is always reported at exactly [`DOMINANT_PROBABILITY`];
//! the remaining [`RESIDUAL_PROBABILITY`] is shared by the other classes in
//! proportion to their raw scores, or equally when they all scored zero.
//!
//! The output is a presentation rule, not a posterior. The raw vector must be
//! kept for the uncertainty check, which needs the information this step
//! discards.
use crate::probability::{argmax, ProbabilityVector};
use log::debug;

/// Probability assigned to the winning class.
pub const DOMINANT_PROBABILITY: f64 = 0.9;
/// Probability mass shared by the non-winning classes.
pub const RESIDUAL_PROBABILITY: f64 = 0.1;

/// Calibrate a three-class raw distribution.
pub fn calibrate(raw: &ProbabilityVector) -> ProbabilityVector {
    let mut out = [0.0; 3];
    out.copy_from_slice(&calibrate_slice(raw.values()));
    let calibrated = ProbabilityVector::new(out);
    debug!(
        "calibrate raw={:?} calibrated={:?}",
        raw.values(),
        calibrated.values()
    );
    calibrated
}

/// Calibrate a distribution of any length.
///
/// A single class yields `[0.9]`; an empty slice yields an empty vector.
pub fn calibrate_slice(raw: &[f64]) -> Vec<f64> {
    let Some(m) = argmax(raw) else {
        return Vec::new();
    };
    let mut out = vec![0.0; raw.len()];
    out[m] = DOMINANT_PROBABILITY;
    if raw.len() == 1 {
        return out;
    }

    let rest: f64 = raw
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != m)
        .map(|(_, &v)| v)
        .sum();
    let others = (raw.len() - 1) as f64;
    for (i, slot) in out.iter_mut().enumerate() {
        if i == m {
            continue;
        }
        *slot = if rest == 0.0 {
            RESIDUAL_PROBABILITY / others
        } else {
            RESIDUAL_PROBABILITY * raw[i] / rest
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::Disease;

    const TOL: f64 = 1e-12;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOL, "expected {b}, got {a}");
    }

    #[test]
    fn degenerate_remainder_is_split_equally() {
        let c = calibrate(&ProbabilityVector::new([1.0, 0.0, 0.0]));
        assert_eq!(c.values()[0], 0.9);
        assert_close(c.values()[1], 0.05);
        assert_close(c.values()[2], 0.05);
    }

    #[test]
    fn remainder_is_proportional_to_raw_scores() {
        let c = calibrate(&ProbabilityVector::new([0.5, 0.3, 0.2]));
        assert_eq!(c.values()[0], 0.9);
        assert_close(c.values()[1], 0.06);
        assert_close(c.values()[2], 0.04);
    }

    #[test]
    fn sums_to_one_and_pins_the_maximum() {
        let cases = [
            [0.34, 0.33, 0.33],
            [0.1, 0.7, 0.2],
            [0.05, 0.05, 0.9],
            [0.2, 0.2, 0.6],
            [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
            [0.0, 0.0, 1.0],
            [0.499, 0.5, 0.001],
        ];
        for raw in cases {
            let c = calibrate(&ProbabilityVector::new(raw));
            assert!((c.sum() - 1.0).abs() < 1e-6, "sum {} for {raw:?}", c.sum());
            assert_eq!(c.max(), 0.9, "max for {raw:?}");
        }
    }

    #[test]
    fn preserves_the_winning_class() {
        for (raw, winner) in [
            ([0.2, 0.5, 0.3], Disease::Glaucoma),
            ([0.1, 0.1, 0.8], Disease::Cataracts),
            ([0.6, 0.3, 0.1], Disease::DiabeticRetinopathy),
        ] {
            let raw = ProbabilityVector::new(raw);
            assert_eq!(raw.argmax(), winner);
            assert_eq!(calibrate(&raw).argmax(), winner);
        }
    }

    #[test]
    fn ties_resolve_to_the_first_class() {
        let c = calibrate(&ProbabilityVector::new([0.4, 0.4, 0.2]));
        assert_eq!(c.values()[0], 0.9);
        assert_close(c.values()[1], 0.1 * 0.4 / 0.6);
    }

    #[test]
    fn single_class_keeps_the_ceiling() {
        assert_eq!(calibrate_slice(&[1.0]), vec![0.9]);
        assert!(calibrate_slice(&[]).is_empty());
    }
}
