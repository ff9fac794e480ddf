//! Target conditions and fixed-order probability distributions over them.
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of target conditions.
pub const NUM_CLASSES: usize = 3;

/// Conditions the classifier distinguishes, in output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Disease {
    DiabeticRetinopathy,
    Glaucoma,
    Cataracts,
}

impl Disease {
    /// All classes in the classifier's output order.
    pub const ALL: [Disease; NUM_CLASSES] = [
        Disease::DiabeticRetinopathy,
        Disease::Glaucoma,
        Disease::Cataracts,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable name used in reports and as the JSON key.
    pub fn display_name(self) -> &'static str {
        match self {
            Disease::DiabeticRetinopathy => "Diabetic Retinopathy",
            Disease::Glaucoma => "Glaucoma",
            Disease::Cataracts => "Cataracts",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Disease {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

/// Probability per [`Disease`], indexed in [`Disease::ALL`] order.
///
/// Serializes as a JSON object keyed by display name, preserving class order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbabilityVector([f64; NUM_CLASSES]);

impl ProbabilityVector {
    pub fn new(values: [f64; NUM_CLASSES]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; NUM_CLASSES] {
        &self.0
    }

    pub fn get(&self, disease: Disease) -> f64 {
        self.0[disease.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Winning class; the first index wins ties.
    pub fn argmax(&self) -> Disease {
        let index = argmax(&self.0).unwrap_or(0);
        Disease::ALL[index]
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Classes with their probabilities, sorted descending. The sort is
    /// stable, so equal probabilities keep class order.
    pub fn ranked(&self) -> [(Disease, f64); NUM_CLASSES] {
        let mut ranked = Disease::ALL.map(|d| (d, self.get(d)));
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, f64)> + '_ {
        Disease::ALL.iter().map(move |&d| (d, self.get(d)))
    }
}

impl Serialize for ProbabilityVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_CLASSES))?;
        for (disease, p) in self.iter() {
            map.serialize_entry(disease.display_name(), &p)?;
        }
        map.end()
    }
}

/// Index of the largest value; the first occurrence wins ties. `None` for an
/// empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
