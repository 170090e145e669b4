//! Input data model and adapter.
//!
//! The upstream classification service emits a loosely-typed JSON payload
//! (`class_names`, `before`/`after` snapshots with `probs`, two image
//! years). [`AnalysisResult::from_raw`] normalizes that payload into a
//! validated record every calculator consumes read-only.
//!
//! Three-way outcome:
//!   - `Ok(Some(result))` — valid, ready for the calculators
//!   - `Ok(None)`         — no data yet (missing snapshot / empty classes);
//!                          a valid quiescent state, not a failure
//!   - `Err(_)`           — malformed payload, nothing is computed

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotSide, ValidationError};

/// Year assumed for the before image when the payload omits it.
pub const DEFAULT_BEFORE_YEAR: i32 = 2010;
/// Year assumed for the after image when the payload omits it.
pub const DEFAULT_AFTER_YEAR: i32 = 2020;

// Tolerance for float slop on [0, 1] range checks. Upstream softmax
// outputs occasionally land a hair outside the unit interval.
const RANGE_EPS: f64 = 1e-9;

/// One classification result for one image, as delivered upstream.
///
/// `probabilities` is ordered to match the analysis `class_names`; entries
/// are expected to sum to ≈1 but this is not enforced. `predicted_class`
/// and `confidence` are independent upstream signals — `confidence` is not
/// required to equal `max(probabilities)` and the engine never reconciles
/// the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSnapshot {
    pub predicted_class: String,
    /// Upstream model confidence in [0, 1].
    pub confidence: f64,
    /// One probability per land-cover class, each in [0, 1].
    #[serde(rename = "probs")]
    pub probabilities: Vec<f64>,
}

/// Raw snapshot as it appears on the wire; every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub predicted_class: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub probs: Option<Vec<f64>>,
}

/// Raw analysis payload as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub class_names: Vec<String>,
    #[serde(default)]
    pub before: Option<RawSnapshot>,
    #[serde(default)]
    pub after: Option<RawSnapshot>,
    #[serde(default)]
    pub before_year: Option<i32>,
    #[serde(default)]
    pub after_year: Option<i32>,
}

/// Validated analysis record: the engine's sole input.
///
/// Invariants established by [`AnalysisResult::from_raw`]:
/// both probability vectors have length `class_names.len()`, all
/// probabilities and confidences lie in [0, 1], and
/// `after_year >= before_year`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub class_names: Vec<String>,
    pub before: ClassificationSnapshot,
    pub after: ClassificationSnapshot,
    pub before_year: i32,
    pub after_year: i32,
}

impl AnalysisResult {
    /// Normalize and validate a raw payload.
    ///
    /// Returns `Ok(None)` when either snapshot is missing, a snapshot has
    /// no probability vector, or `class_names` is empty — the upstream
    /// service has simply not produced an analysis yet. Length mismatches
    /// and out-of-range values are hard errors: zero-padding them would
    /// silently mislabel classes.
    pub fn from_raw(raw: &RawAnalysis) -> Result<Option<Self>> {
        if raw.class_names.is_empty() {
            return Ok(None);
        }
        let (Some(before_raw), Some(after_raw)) = (&raw.before, &raw.after) else {
            return Ok(None);
        };
        let (Some(before_probs), Some(after_probs)) = (&before_raw.probs, &after_raw.probs)
        else {
            return Ok(None);
        };

        let n = raw.class_names.len();
        let before =
            validate_snapshot(before_raw, before_probs, n, SnapshotSide::Before)?;
        let after = validate_snapshot(after_raw, after_probs, n, SnapshotSide::After)?;

        let before_year = raw.before_year.unwrap_or(DEFAULT_BEFORE_YEAR);
        let after_year = raw.after_year.unwrap_or(DEFAULT_AFTER_YEAR);
        if after_year < before_year {
            return Err(ValidationError::YearOrder {
                before: before_year,
                after: after_year,
            });
        }

        Ok(Some(Self {
            class_names: raw.class_names.clone(),
            before,
            after,
            before_year,
            after_year,
        }))
    }

    /// Elapsed years between the two images. Zero when the years are equal;
    /// per-year consumers must guard that case.
    pub fn years_elapsed(&self) -> i32 {
        self.after_year - self.before_year
    }

    /// Number of land-cover classes.
    pub fn class_count(&self) -> usize {
        self.class_names.len()
    }

    /// Position of a class name, if present in this analysis.
    pub fn class_index(&self, class_name: &str) -> Option<usize> {
        self.class_names.iter().position(|n| n == class_name)
    }

    /// After-image probability of a named class; 0 when the class is
    /// absent from this analysis (absent class ⇒ no probability mass).
    pub fn after_prob_of(&self, class_name: &str) -> f64 {
        self.class_index(class_name)
            .map(|i| self.after.probabilities[i])
            .unwrap_or(0.0)
    }

    /// Before-image probability of a named class; 0 when absent.
    pub fn before_prob_of(&self, class_name: &str) -> f64 {
        self.class_index(class_name)
            .map(|i| self.before.probabilities[i])
            .unwrap_or(0.0)
    }
}

fn validate_snapshot(
    raw: &RawSnapshot,
    probs: &[f64],
    expected_len: usize,
    which: SnapshotSide,
) -> Result<ClassificationSnapshot> {
    if probs.len() != expected_len {
        return Err(ValidationError::ProbabilityLengthMismatch {
            which,
            expected: expected_len,
            actual: probs.len(),
        });
    }
    for (i, &p) in probs.iter().enumerate() {
        if !(-RANGE_EPS..=1.0 + RANGE_EPS).contains(&p) || p.is_nan() {
            return Err(ValidationError::ProbabilityOutOfRange {
                which,
                class_index: i,
                value: p,
            });
        }
    }
    let confidence = raw.confidence.unwrap_or(0.0);
    if !(-RANGE_EPS..=1.0 + RANGE_EPS).contains(&confidence) || confidence.is_nan() {
        return Err(ValidationError::ConfidenceOutOfRange {
            which,
            value: confidence,
        });
    }

    Ok(ClassificationSnapshot {
        predicted_class: raw.predicted_class.clone().unwrap_or_default(),
        confidence: confidence.clamp(0.0, 1.0),
        probabilities: probs.iter().map(|p| p.clamp(0.0, 1.0)).collect(),
    })
}

/// Total ground area the probability mass is distributed over.
///
/// An assumed approximation for converting probability shares into area —
/// not measured truth. Only the area-dependent calculators (carbon/oxygen,
/// change analysis) consume it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AreaBasis {
    pub assumed_area_km2: f64,
}

impl AreaBasis {
    /// Default assumed area, km².
    pub const DEFAULT_AREA_KM2: f64 = 100.0;

    pub fn new(assumed_area_km2: f64) -> Result<Self> {
        if !(assumed_area_km2 > 0.0 && assumed_area_km2.is_finite()) {
            return Err(ValidationError::InvalidArea {
                value: assumed_area_km2,
            });
        }
        Ok(Self { assumed_area_km2 })
    }

    /// Assumed area in hectares (1 km² = 100 ha).
    pub fn hectares(&self) -> f64 {
        self.assumed_area_km2 * 100.0
    }
}

impl Default for AreaBasis {
    fn default() -> Self {
        Self {
            assumed_area_km2: Self::DEFAULT_AREA_KM2,
        }
    }
}
