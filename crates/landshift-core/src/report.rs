//! Report orchestrator: validates the payload once and runs every
//! calculator, returning their union as a single serializable document.
//! This is the natural contract for exposing the engine as one endpoint.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, AreaBasis, RawAnalysis};
use crate::carbon::{self, CarbonOxygenSummary, ChangeSemantics, TimelinePoint};
use crate::change::{self, ChangeAnalysis};
use crate::confidence::{self, ConfidenceAnalysis};
use crate::error::Result;
use crate::health::{self, HealthScore};
use crate::taxonomy::ImpactFactors;
use crate::timeline::{self, MixPoint, TrendSummary};

/// Caller configuration for a report run. `Default` gives the standard
/// 100 km² basis, default factor tables, and rate-delta change semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub area: AreaBasis,
    pub factors: ImpactFactors,
    pub semantics: ChangeSemantics,
}

/// Union of all calculator outputs for one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    pub analysis: AnalysisResult,
    pub carbon_oxygen: CarbonOxygenSummary,
    pub carbon_timeline: Vec<TimelinePoint>,
    pub health: HealthScore,
    pub changes: ChangeAnalysis,
    pub confidence: ConfidenceAnalysis,
    pub class_timeline: Vec<MixPoint>,
    pub trends: TrendSummary,
}

/// Run every calculator over a validated analysis.
pub fn build_report(result: &AnalysisResult, opts: &ReportOptions) -> ImpactReport {
    let carbon_oxygen =
        carbon::estimate(result, &opts.area, &opts.factors, opts.semantics);
    let carbon_timeline = carbon::carbon_timeline(result, &carbon_oxygen);

    ImpactReport {
        carbon_timeline,
        carbon_oxygen,
        health: health::score(result),
        changes: change::analyze(result, &opts.area),
        confidence: confidence::analyze(result),
        class_timeline: timeline::class_timeline(result),
        trends: timeline::trend_summary(result),
        analysis: result.clone(),
    }
}

/// Validate a raw wire payload and run every calculator.
///
/// `Ok(None)` is the no-data sentinel — the upstream service has not
/// produced an analysis yet and the caller should render an empty state.
pub fn run_report(raw: &RawAnalysis, opts: &ReportOptions) -> Result<Option<ImpactReport>> {
    Ok(AnalysisResult::from_raw(raw)?.map(|result| build_report(&result, opts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RawSnapshot;
    use crate::change::Trend;

    fn raw(class_names: &[&str], before: &[f64], after: &[f64]) -> RawAnalysis {
        let snapshot = |probs: &[f64]| {
            Some(RawSnapshot {
                predicted_class: Some("Forest".to_string()),
                confidence: Some(0.9),
                probs: Some(probs.to_vec()),
            })
        };
        RawAnalysis {
            class_names: class_names.iter().map(|s| s.to_string()).collect(),
            before: snapshot(before),
            after: snapshot(after),
            before_year: Some(2010),
            after_year: Some(2020),
        }
    }

    #[test]
    fn identical_snapshot_scenario() {
        let report = run_report(
            &raw(&["Forest", "Industrial"], &[0.6, 0.4], &[0.6, 0.4]),
            &ReportOptions::default(),
        )
        .unwrap()
        .expect("valid payload");

        assert_eq!(report.carbon_oxygen.total_carbon_change, 0.0);
        assert!(report.carbon_oxygen.narrative.is_empty());
        assert!((report.health.vegetation_health - 60.0).abs() < 1e-9);
        assert!((report.health.air_quality - 60.0).abs() < 1e-9);
        assert!(report.changes.transitions.is_empty());
        assert!(report
            .trends
            .per_class
            .iter()
            .all(|c| c.trend == Trend::Stable));
    }

    #[test]
    fn full_conversion_scenario() {
        let report = run_report(
            &raw(&["Forest", "Industrial"], &[1.0, 0.0], &[0.0, 1.0]),
            &ReportOptions::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(report.changes.transitions.len(), 1);
        let t = &report.changes.transitions[0];
        assert_eq!((t.from.as_str(), t.to.as_str()), ("Forest", "Industrial"));
        assert!((t.strength_pp - 100.0).abs() < 1e-9);
        assert_eq!(report.health.vegetation_health, 0.0);
        assert_eq!(report.health.air_quality, 0.0);
        assert!(report.carbon_oxygen.total_carbon_change < 0.0);
    }

    #[test]
    fn empty_payload_is_no_data_not_error() {
        let report = run_report(&RawAnalysis::default(), &ReportOptions::default()).unwrap();
        assert!(report.is_none());
    }

    /// Pure-function property: the same input serializes to the same
    /// report, byte for byte.
    #[test]
    fn report_is_deterministic() {
        let payload = raw(
            &["Forest", "Industrial", "River"],
            &[0.5, 0.2, 0.3],
            &[0.3, 0.45, 0.25],
        );
        let opts = ReportOptions::default();
        let a = run_report(&payload, &opts).unwrap().unwrap();
        let b = run_report(&payload, &opts).unwrap().unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    /// No field in the serialized report may be NaN or infinite, including
    /// for the degenerate zero-year span.
    #[test]
    fn report_contains_no_nan() {
        let mut payload = raw(&["Forest", "Industrial"], &[0.7, 0.3], &[0.2, 0.8]);
        payload.after_year = Some(2010);
        let report = run_report(&payload, &ReportOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(report.carbon_oxygen.annual_carbon_rate, None);
        assert!(report.carbon_oxygen.total_carbon_change.is_finite());
        assert!(report.confidence.entropy.is_finite());
        assert!(report.confidence.quality_score.is_finite());
        assert!(report.trends.total_velocity.is_finite());
        for c in &report.changes.per_class {
            assert!(c.change_pp.is_finite() && c.intensity.is_finite());
        }
        for p in &report.carbon_timeline {
            assert!(p.carbon_tons_per_year.is_finite());
        }
    }

    #[test]
    fn options_round_trip_through_json() {
        let opts: ReportOptions = serde_json::from_str(
            r#"{"area": {"assumed_area_km2": 250.0}, "semantics": "cumulative_over_period"}"#,
        )
        .unwrap();
        assert_eq!(opts.area.assumed_area_km2, 250.0);
        assert_eq!(opts.semantics, ChangeSemantics::CumulativeOverPeriod);
        // Omitted factors fall back to the defaults.
        assert_eq!(opts.factors.carbon.factor("Forest"), 10.5);
    }
}
