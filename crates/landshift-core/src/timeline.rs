//! Temporal trend metrics between the two snapshots.
//!
//! Only two observations exist, so everything here is linear
//! interpolation/extrapolation between them: an evenly spaced class-mix
//! timeline for charting and a per-class velocity summary (percentage
//! points per year).

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::change::Trend;

/// Upper bound on interpolated timeline points.
const MAX_TIMELINE_POINTS: usize = 10;
/// A class change below this many pp is not counted as significant.
const SIGNIFICANT_CHANGE_PP: f64 = 1.0;

/// Class mix at one interpolated year, percent per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixPoint {
    pub year: i32,
    /// One entry per class, ordered to match the analysis `class_names`.
    pub shares_pct: Vec<f64>,
}

/// Per-class change velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassVelocity {
    pub class_name: String,
    /// Total change over the period, percentage points.
    pub change_pp: f64,
    /// Change per elapsed year, pp/yr. Zero when the images share a year.
    pub velocity_pp_per_year: f64,
    pub trend: Trend,
}

/// Summary of change dynamics across all classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSummary {
    pub per_class: Vec<ClassVelocity>,
    /// Classes whose |change| exceeds 1 pp.
    pub significant_changes: usize,
    pub increasing_classes: usize,
    pub decreasing_classes: usize,
    /// Sum of absolute per-class velocities, pp/yr.
    pub total_velocity: f64,
}

/// Evenly spaced linear interpolation of the class mix between the two
/// years. At most 10 points; a zero-year span yields the two endpoint
/// mixes collapsed into one point.
pub fn class_timeline(result: &AnalysisResult) -> Vec<MixPoint> {
    let years = result.years_elapsed();
    let shares = |mix: &[f64], progress: f64, other: &[f64]| -> Vec<f64> {
        mix.iter()
            .zip(other.iter())
            .map(|(&b, &a)| (b + (a - b) * progress) * 100.0)
            .collect()
    };

    if years == 0 {
        return vec![MixPoint {
            year: result.before_year,
            shares_pct: shares(&result.before.probabilities, 1.0, &result.after.probabilities),
        }];
    }

    let num_points = (years as usize + 1).min(MAX_TIMELINE_POINTS);
    (0..num_points)
        .map(|i| {
            let progress = i as f64 / (num_points - 1) as f64;
            MixPoint {
                year: result.before_year
                    + (progress * f64::from(years)).round() as i32,
                shares_pct: shares(
                    &result.before.probabilities,
                    progress,
                    &result.after.probabilities,
                ),
            }
        })
        .collect()
}

/// Per-class change velocities and aggregate trend counts.
pub fn trend_summary(result: &AnalysisResult) -> TrendSummary {
    let years = result.years_elapsed();

    let per_class: Vec<ClassVelocity> = result
        .class_names
        .iter()
        .enumerate()
        .map(|(i, class_name)| {
            let change_pp =
                (result.after.probabilities[i] - result.before.probabilities[i]) * 100.0;
            let velocity_pp_per_year = if years > 0 {
                change_pp / f64::from(years)
            } else {
                0.0
            };
            let trend = if change_pp > SIGNIFICANT_CHANGE_PP {
                Trend::Increasing
            } else if change_pp < -SIGNIFICANT_CHANGE_PP {
                Trend::Decreasing
            } else {
                Trend::Stable
            };
            ClassVelocity {
                class_name: class_name.clone(),
                change_pp,
                velocity_pp_per_year,
                trend,
            }
        })
        .collect();

    let significant_changes = per_class
        .iter()
        .filter(|c| c.change_pp.abs() > SIGNIFICANT_CHANGE_PP)
        .count();
    let increasing_classes = per_class
        .iter()
        .filter(|c| c.trend == Trend::Increasing)
        .count();
    let decreasing_classes = per_class
        .iter()
        .filter(|c| c.trend == Trend::Decreasing)
        .count();
    let total_velocity = per_class
        .iter()
        .map(|c| c.velocity_pp_per_year.abs())
        .sum();

    TrendSummary {
        per_class,
        significant_changes,
        increasing_classes,
        decreasing_classes,
        total_velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ClassificationSnapshot;

    fn analysis(before: &[f64], after: &[f64], years: i32) -> AnalysisResult {
        let snapshot = |probs: &[f64]| ClassificationSnapshot {
            predicted_class: String::new(),
            confidence: 0.9,
            probabilities: probs.to_vec(),
        };
        AnalysisResult {
            class_names: (0..before.len()).map(|i| format!("C{i}")).collect(),
            before: snapshot(before),
            after: snapshot(after),
            before_year: 2010,
            after_year: 2010 + years,
        }
    }

    #[test]
    fn timeline_endpoints_are_exact() {
        let result = analysis(&[0.7, 0.3], &[0.2, 0.8], 10);
        let timeline = class_timeline(&result);

        assert_eq!(timeline.len(), 10); // capped at 10 points for an 11-year grid
        let first = &timeline[0];
        let last = timeline.last().unwrap();
        assert_eq!(first.year, 2010);
        assert_eq!(last.year, 2020);
        assert!((first.shares_pct[0] - 70.0).abs() < 1e-9);
        assert!((last.shares_pct[0] - 20.0).abs() < 1e-9);
        assert!((last.shares_pct[1] - 80.0).abs() < 1e-9);
    }

    #[test]
    fn short_span_uses_one_point_per_year() {
        let result = analysis(&[0.6, 0.4], &[0.4, 0.6], 4);
        let timeline = class_timeline(&result);
        assert_eq!(timeline.len(), 5);
        let years: Vec<i32> = timeline.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2010, 2011, 2012, 2013, 2014]);
    }

    #[test]
    fn zero_span_collapses_to_single_point() {
        let result = analysis(&[0.6, 0.4], &[0.5, 0.5], 0);
        let timeline = class_timeline(&result);
        assert_eq!(timeline.len(), 1);
        // The single point carries the after mix.
        assert!((timeline[0].shares_pct[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn velocity_is_change_per_year() {
        let result = analysis(&[0.7, 0.3], &[0.2, 0.8], 10);
        let summary = trend_summary(&result);

        assert!((summary.per_class[0].velocity_pp_per_year - -5.0).abs() < 1e-9);
        assert!((summary.per_class[1].velocity_pp_per_year - 5.0).abs() < 1e-9);
        assert!((summary.total_velocity - 10.0).abs() < 1e-9);
        assert_eq!(summary.increasing_classes, 1);
        assert_eq!(summary.decreasing_classes, 1);
        assert_eq!(summary.significant_changes, 2);
    }

    #[test]
    fn zero_span_velocity_is_zero_not_nan() {
        let result = analysis(&[0.7, 0.3], &[0.2, 0.8], 0);
        let summary = trend_summary(&result);
        assert_eq!(summary.per_class[0].velocity_pp_per_year, 0.0);
        assert!(summary.total_velocity.is_finite());
        // Changes still register even though a rate cannot be formed.
        assert_eq!(summary.significant_changes, 2);
    }

    #[test]
    fn small_changes_are_stable() {
        let result = analysis(&[0.5, 0.5], &[0.505, 0.495], 5);
        let summary = trend_summary(&result);
        assert_eq!(summary.significant_changes, 0);
        assert!(summary.per_class.iter().all(|c| c.trend == Trend::Stable));
    }
}
