//! Per-class change metrics and land-use transition inference.
//!
//! Works in percentage points throughout. Transition inference is a
//! heuristic: for every ordered class pair it takes the overlap between how
//! much the source class shrank and how much the target class grew as a
//! proxy for converted area. Pixel-level transitions are not observable
//! from aggregate probabilities, so these candidates are estimates, never a
//! measured transition matrix — serialized output carries a `method` marker
//! to keep downstream consumers honest about that.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, AreaBasis};

/// Deadband, in percentage points, inside which a class counts as stable.
const TREND_DEADBAND_PP: f64 = 1.0;
/// Transitions weaker than this (pp) are treated as noise.
const TRANSITION_FLOOR_PP: f64 = 0.5;
/// At most this many transition candidates are reported.
const TRANSITION_CAP: usize = 10;
/// Floor for the display weight so near-zero classes stay visible in
/// area-proportional charts. Presentation bias, not a physical quantity.
const MIN_DISPLAY_SIZE: f64 = 5.0;

/// Direction of a class's share change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    fn from_change_pp(change_pp: f64) -> Self {
        if change_pp > TREND_DEADBAND_PP {
            Self::Increasing
        } else if change_pp < -TREND_DEADBAND_PP {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

/// Display band for a transition's strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBand {
    High,
    Medium,
    Low,
}

impl ImpactBand {
    fn from_strength_pp(strength_pp: f64) -> Self {
        if strength_pp > 2.0 {
            Self::High
        } else if strength_pp > 1.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Change metrics for one land-cover class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassChange {
    pub class_name: String,
    /// Class share in the before image, percent.
    pub before_pct: f64,
    pub after_pct: f64,
    /// `after − before`, percentage points; signed.
    pub change_pp: f64,
    pub trend: Trend,
    /// Mean of before/after shares floored at 5 — chart sizing weight only.
    pub display_size: f64,
    /// Color-intensity weight: `min(2 × |change|, 100)`.
    pub intensity: f64,
    /// Mean estimated class area over the assumed basis, km².
    pub mean_area_km2: f64,
}

/// A heuristically inferred conversion from one class to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// Estimated converted share, percentage points (≥ 0).
    pub strength_pp: f64,
    pub impact: ImpactBand,
    /// Constant `"probability-overlap"`: these are estimates, not a
    /// measured land-cover transition matrix.
    #[serde(skip_deserializing, default = "estimation_method")]
    pub method: &'static str,
}

fn estimation_method() -> &'static str {
    "probability-overlap"
}

/// Output of the change analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAnalysis {
    pub per_class: Vec<ClassChange>,
    /// At most 10 candidates, strongest first.
    pub transitions: Vec<Transition>,
}

/// Compute per-class change metrics and transition candidates.
pub fn analyze(result: &AnalysisResult, basis: &AreaBasis) -> ChangeAnalysis {
    let per_class = result
        .class_names
        .iter()
        .enumerate()
        .map(|(i, class_name)| {
            let before_pct = result.before.probabilities[i] * 100.0;
            let after_pct = result.after.probabilities[i] * 100.0;
            let change_pp = after_pct - before_pct;
            let avg_pct = (before_pct + after_pct) / 2.0;
            ClassChange {
                class_name: class_name.clone(),
                before_pct,
                after_pct,
                change_pp,
                trend: Trend::from_change_pp(change_pp),
                display_size: avg_pct.max(MIN_DISPLAY_SIZE),
                intensity: (change_pp.abs() * 2.0).min(100.0),
                mean_area_km2: avg_pct / 100.0 * basis.assumed_area_km2,
            }
        })
        .collect();

    ChangeAnalysis {
        per_class,
        transitions: infer_transitions(result),
    }
}

/// Enumerate ordered class pairs and keep the credible conversions.
/// O(N²) over the class count, which is small and bounded (10 for EuroSAT).
fn infer_transitions(result: &AnalysisResult) -> Vec<Transition> {
    let n = result.class_count();
    let mut candidates = Vec::new();

    for from_idx in 0..n {
        let shrink_pp = (result.before.probabilities[from_idx]
            - result.after.probabilities[from_idx])
            .max(0.0)
            * 100.0;
        if shrink_pp <= TRANSITION_FLOOR_PP {
            continue;
        }
        for to_idx in 0..n {
            if from_idx == to_idx {
                continue;
            }
            let growth_pp = (result.after.probabilities[to_idx]
                - result.before.probabilities[to_idx])
                .max(0.0)
                * 100.0;
            let strength_pp = shrink_pp.min(growth_pp);
            if strength_pp > TRANSITION_FLOOR_PP {
                candidates.push(Transition {
                    from: result.class_names[from_idx].clone(),
                    to: result.class_names[to_idx].clone(),
                    strength_pp,
                    impact: ImpactBand::from_strength_pp(strength_pp),
                    method: estimation_method(),
                });
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.strength_pp
            .partial_cmp(&a.strength_pp)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(TRANSITION_CAP);
    candidates
}
