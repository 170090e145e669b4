//! Model-confidence analytics over the two prediction vectors.
//!
//! Treats the reported snapshot `confidence` and the probability vector as
//! two independent upstream signals: certainty is the peak probability,
//! whether or not it matches the reported confidence, and the engine never
//! reconciles the two.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// Display band for the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl QualityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 55.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }
}

/// Per-class probability summary across the two snapshots, percent scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassConfidence {
    pub class_name: String,
    pub before_pct: f64,
    pub after_pct: f64,
    /// `after − before`, percentage points.
    pub change_pp: f64,
    /// Mean of before/after, percent. Table sort key (descending).
    pub avg_pct: f64,
}

/// Aggregate confidence metrics, percent scale except `entropy` (bits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAnalysis {
    /// Mean of the two reported snapshot confidences, percent.
    pub avg_confidence: f64,
    /// Mean of the two peak probabilities, percent.
    pub avg_certainty: f64,
    /// 100 × (1 − |before top-1 − after top-1|).
    pub consistency: f64,
    /// Mean Shannon entropy of the two probability vectors, bits.
    pub entropy: f64,
    /// Fixed-weight blend: 0.4·confidence + 0.4·certainty + 0.2·consistency.
    pub quality_score: f64,
    pub band: QualityBand,
    /// Per-class table, highest average probability first.
    pub per_class: Vec<ClassConfidence>,
}

/// Shannon entropy in bits: −Σ pᵢ·log₂(pᵢ), zero-probability terms
/// contributing 0 by convention.
pub fn shannon_entropy(probs: &[f64]) -> f64 {
    -probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.log2())
        .sum::<f64>()
}

fn peak(probs: &[f64]) -> f64 {
    probs.iter().cloned().fold(0.0, f64::max)
}

/// Compute the confidence analytics for a validated analysis.
pub fn analyze(result: &AnalysisResult) -> ConfidenceAnalysis {
    let avg_confidence = (result.before.confidence + result.after.confidence) / 2.0;

    let before_peak = peak(&result.before.probabilities);
    let after_peak = peak(&result.after.probabilities);
    let avg_certainty = (before_peak + after_peak) / 2.0;

    // Top-1 agreement between the two snapshots, on the unit scale.
    let consistency = 1.0 - (before_peak - after_peak).abs();

    let entropy = (shannon_entropy(&result.before.probabilities)
        + shannon_entropy(&result.after.probabilities))
        / 2.0;

    let quality_score =
        (avg_confidence * 0.4 + avg_certainty * 0.4 + consistency * 0.2) * 100.0;

    let mut per_class: Vec<ClassConfidence> = result
        .class_names
        .iter()
        .enumerate()
        .map(|(i, class_name)| {
            let before_pct = result.before.probabilities[i] * 100.0;
            let after_pct = result.after.probabilities[i] * 100.0;
            ClassConfidence {
                class_name: class_name.clone(),
                before_pct,
                after_pct,
                change_pp: after_pct - before_pct,
                avg_pct: (before_pct + after_pct) / 2.0,
            }
        })
        .collect();
    per_class.sort_by(|a, b| {
        b.avg_pct
            .partial_cmp(&a.avg_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ConfidenceAnalysis {
        avg_confidence: avg_confidence * 100.0,
        avg_certainty: avg_certainty * 100.0,
        consistency: consistency * 100.0,
        entropy,
        quality_score,
        band: QualityBand::from_score(quality_score),
        per_class,
    }
}
