//! Clinical narrative for a calibrated distribution.
//!
//! Pure rule table over the sorted calibrated probabilities:
//!
//! | condition                | tier            |
//! |--------------------------|-----------------|
//! | flagged uncertain        | `Uncertain`     |
//! | top probability > 0.7    | `High`          |
//! | top probability > 0.5    | `Moderate`      |
//! | otherwise                | `NoIndicators`  |
//!
//! With the 0.9 calibration ceiling only `Uncertain` and `High` occur for the
//! three-class model; the other tiers apply to distributions produced some
//! other way.
use crate::probability::ProbabilityVector;
use serde::Serialize;

pub const HIGH_PROBABILITY: f64 = 0.7;
pub const MODERATE_PROBABILITY: f64 = 0.5;

/// Summary, supporting detail and next step for one analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosisRecord {
    pub summary: String,
    pub details: String,
    pub recommendation: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisTier {
    Uncertain,
    High,
    Moderate,
    NoIndicators,
}

impl DiagnosisTier {
    pub fn classify(top_probability: f64, uncertain: bool) -> Self {
        if uncertain {
            DiagnosisTier::Uncertain
        } else if top_probability > HIGH_PROBABILITY {
            DiagnosisTier::High
        } else if top_probability > MODERATE_PROBABILITY {
            DiagnosisTier::Moderate
        } else {
            DiagnosisTier::NoIndicators
        }
    }
}

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Render the diagnosis for `calibrated` and the uncertainty flag.
pub fn compose(calibrated: &ProbabilityVector, uncertain: bool) -> DiagnosisRecord {
    let ranked = calibrated.ranked();
    let (first, p_first) = ranked[0];
    let (second, p_second) = ranked[1];

    match DiagnosisTier::classify(p_first, uncertain) {
        DiagnosisTier::Uncertain => DiagnosisRecord {
            summary: "Uncertain diagnosis - further examination required.".to_string(),
            details: format!(
                "The system detected potential signs of {first} ({}) and {second} ({}), \
                 but cannot make a confident diagnosis.",
                percent(p_first),
                percent(p_second)
            ),
            recommendation: "Recommend comprehensive clinical examination to confirm diagnosis."
                .to_string(),
        },
        DiagnosisTier::High => DiagnosisRecord {
            summary: format!("High probability of {first}"),
            details: format!(
                "Analysis shows strong indicators of {first} with {} confidence.",
                percent(p_first)
            ),
            recommendation: "Recommend clinical confirmation and appropriate treatment."
                .to_string(),
        },
        DiagnosisTier::Moderate => DiagnosisRecord {
            summary: format!("Moderate probability of {first}"),
            details: format!(
                "Analysis shows moderate indicators of {first} with {} confidence.",
                percent(p_first)
            ),
            recommendation: "Recommend clinical examination to confirm diagnosis.".to_string(),
        },
        DiagnosisTier::NoIndicators => DiagnosisRecord {
            summary: "No clear disease indicators detected.".to_string(),
            details: "Analysis shows low probability for all target conditions.".to_string(),
            recommendation: "Recommend routine follow-up as per standard guidelines.".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_probability_names_the_winner() {
        let d = compose(&ProbabilityVector::new([0.9, 0.06, 0.04]), false);
        assert_eq!(d.summary, "High probability of Diabetic Retinopathy");
        assert_eq!(
            d.details,
            "Analysis shows strong indicators of Diabetic Retinopathy with 90.0% confidence."
        );
        assert!(d.recommendation.contains("clinical confirmation"));
    }

    #[test]
    fn uncertain_cites_the_top_two_classes() {
        let d = compose(&ProbabilityVector::new([0.04, 0.9, 0.06]), true);
        assert!(d.summary.starts_with("Uncertain diagnosis"));
        assert_eq!(
            d.details,
            "The system detected potential signs of Glaucoma (90.0%) and Cataracts (6.0%), \
             but cannot make a confident diagnosis."
        );
        assert!(d.recommendation.contains("comprehensive clinical examination"));
    }

    #[test]
    fn moderate_branch() {
        let d = compose(&ProbabilityVector::new([0.2, 0.2, 0.6]), false);
        assert_eq!(d.summary, "Moderate probability of Cataracts");
        assert!(d.details.contains("60.0%"));
        assert_eq!(
            d.recommendation,
            "Recommend clinical examination to confirm diagnosis."
        );
    }

    #[test]
    fn no_indicators_branch() {
        let d = compose(&ProbabilityVector::new([0.4, 0.35, 0.25]), false);
        assert_eq!(d.summary, "No clear disease indicators detected.");
        assert!(d.recommendation.contains("routine follow-up"));
    }

    #[test]
    fn tier_boundaries_are_strict() {
        assert_eq!(DiagnosisTier::classify(0.7, false), DiagnosisTier::Moderate);
        assert_eq!(DiagnosisTier::classify(0.5, false), DiagnosisTier::NoIndicators);
        assert_eq!(DiagnosisTier::classify(0.99, true), DiagnosisTier::Uncertain);
    }
}
