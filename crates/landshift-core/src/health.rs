//! Environmental health scorer.
//!
//! Four 0–100 indices derived solely from the *after* distribution — this
//! calculator measures current state, not change. Water and vegetation are
//! probability mass over their class sets; air quality is the inverse of
//! pollution-class mass; biodiversity is a coarse habitat-presence count
//! (25 points per natural class holding more than 5% probability).

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::taxonomy::{
    NATURAL_HABITAT_CLASSES, POLLUTION_CLASSES, VEGETATION_CLASSES, WATER_CLASSES,
};

/// Probability a natural class must hold to count toward biodiversity.
const HABITAT_PRESENCE_THRESHOLD: f64 = 0.05;

/// Ordinal display band for a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

/// The four indices plus their mean, all in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub water_quality: f64,
    pub vegetation_health: f64,
    pub air_quality: f64,
    pub biodiversity: f64,
    pub overall_health: f64,
    pub band: HealthBand,
}

/// Score the after-image land-cover composition.
///
/// Classes referenced by the index vocabulary but absent from the analysis
/// contribute 0 probability — never an error.
pub fn score(result: &AnalysisResult) -> HealthScore {
    let mass_over = |classes: &[&str]| -> f64 {
        classes.iter().map(|c| result.after_prob_of(c)).sum::<f64>() * 100.0
    };

    let water_quality = mass_over(&WATER_CLASSES).clamp(0.0, 100.0);
    let vegetation_health = mass_over(&VEGETATION_CLASSES).clamp(0.0, 100.0);

    let pollution_level = mass_over(&POLLUTION_CLASSES);
    let air_quality = (100.0 - pollution_level).clamp(0.0, 100.0);

    let habitat_count = NATURAL_HABITAT_CLASSES
        .iter()
        .filter(|c| result.after_prob_of(c) > HABITAT_PRESENCE_THRESHOLD)
        .count();
    let biodiversity = (habitat_count as f64 * 25.0).clamp(0.0, 100.0);

    let overall_health =
        (water_quality + vegetation_health + air_quality + biodiversity) / 4.0;

    HealthScore {
        water_quality,
        vegetation_health,
        air_quality,
        biodiversity,
        overall_health,
        band: HealthBand::from_score(overall_health),
    }
}
