//! Carbon/oxygen capacity estimator.
//!
//! Converts the land-cover probability mix over an assumed ground area into
//! annualized CO₂ sequestration and O₂ production tonnage, per class and in
//! aggregate, and renders the significant shifts as plain-language
//! sentences for the report.
//!
//! Unit semantics: per-class values are annual rates (tons/yr), obtained as
//! probability × assumed km² × 100 ha/km² × factor. The reported "change"
//! is, by default, the *rate delta* between the two snapshots — not the
//! rate integrated over the elapsed period. [`ChangeSemantics`] selects
//! between the two readings.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, AreaBasis, RawAnalysis};
use crate::error::Result;
use crate::taxonomy::ImpactFactors;

/// Noise floor, in tons, below which a per-class shift is not narrated.
const NARRATIVE_THRESHOLD_TONS: f64 = 1.0;

/// How the reported change figures relate to the elapsed period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSemantics {
    /// Change = after annual rate − before annual rate (tons/yr). Matches
    /// the behavior of the system this engine was extracted from.
    #[default]
    AnnualRateDelta,
    /// Change = rate delta × elapsed years (tons over the whole period).
    /// Zero elapsed years yields zero cumulative change.
    CumulativeOverPeriod,
}

/// Annualized carbon/oxygen figures for one land-cover class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCarbonRecord {
    pub class_name: String,
    /// Estimated class area in the before image, km².
    pub area_before_km2: f64,
    pub area_after_km2: f64,
    /// Annual CO₂ capacity, tons/yr, before and after.
    pub carbon_before: f64,
    pub carbon_after: f64,
    /// Reported CO₂ change (units per [`ChangeSemantics`]).
    pub carbon_change: f64,
    /// Annual O₂ capacity, tons/yr, before and after.
    pub oxygen_before: f64,
    pub oxygen_after: f64,
    pub oxygen_change: f64,
}

/// One point of the interpolated carbon trajectory between the two years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub year: i32,
    /// Interpolated total annual CO₂ capacity, tons/yr.
    pub carbon_tons_per_year: f64,
}

/// Aggregate estimate across all classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonOxygenSummary {
    pub total_carbon_before: f64,
    pub total_carbon_after: f64,
    pub total_carbon_change: f64,
    pub total_oxygen_before: f64,
    pub total_oxygen_after: f64,
    pub total_oxygen_change: f64,
    /// Elapsed years between the two images (≥ 0).
    pub years: i32,
    /// Sum of positive per-class carbon changes (capacity gained).
    pub total_sequestration: f64,
    /// Magnitude of negative per-class carbon changes (capacity lost).
    pub total_emissions: f64,
    /// `total_sequestration − total_emissions`; equals the total change.
    pub net_impact: f64,
    /// Total carbon change per elapsed year. `None` when the images share
    /// a year — annualizing a zero-length period is undefined.
    pub annual_carbon_rate: Option<f64>,
    pub per_class: Vec<ClassCarbonRecord>,
    /// Plain-language statements for the significant shifts, strongest
    /// carbon change first.
    pub narrative: Vec<String>,
    pub semantics: ChangeSemantics,
}

/// Estimate carbon/oxygen capacity change for a validated analysis.
pub fn estimate(
    result: &AnalysisResult,
    basis: &AreaBasis,
    factors: &ImpactFactors,
    semantics: ChangeSemantics,
) -> CarbonOxygenSummary {
    let years = result.years_elapsed();
    let change_scale = match semantics {
        ChangeSemantics::AnnualRateDelta => 1.0,
        ChangeSemantics::CumulativeOverPeriod => f64::from(years),
    };

    let mut per_class = Vec::with_capacity(result.class_count());
    let mut total_carbon_before = 0.0;
    let mut total_carbon_after = 0.0;
    let mut total_oxygen_before = 0.0;
    let mut total_oxygen_after = 0.0;

    for (idx, class_name) in result.class_names.iter().enumerate() {
        let area_before_km2 = result.before.probabilities[idx] * basis.assumed_area_km2;
        let area_after_km2 = result.after.probabilities[idx] * basis.assumed_area_km2;

        // km² → ha, then signed tons/yr via the class coefficient.
        let carbon_factor = factors.carbon.factor(class_name);
        let oxygen_factor = factors.oxygen.factor(class_name);
        let carbon_before = area_before_km2 * 100.0 * carbon_factor;
        let carbon_after = area_after_km2 * 100.0 * carbon_factor;
        let oxygen_before = area_before_km2 * 100.0 * oxygen_factor;
        let oxygen_after = area_after_km2 * 100.0 * oxygen_factor;

        total_carbon_before += carbon_before;
        total_carbon_after += carbon_after;
        total_oxygen_before += oxygen_before;
        total_oxygen_after += oxygen_after;

        per_class.push(ClassCarbonRecord {
            class_name: class_name.clone(),
            area_before_km2,
            area_after_km2,
            carbon_before,
            carbon_after,
            carbon_change: (carbon_after - carbon_before) * change_scale,
            oxygen_before,
            oxygen_after,
            oxygen_change: (oxygen_after - oxygen_before) * change_scale,
        });
    }

    let total_carbon_change = (total_carbon_after - total_carbon_before) * change_scale;
    let total_oxygen_change = (total_oxygen_after - total_oxygen_before) * change_scale;

    let total_sequestration: f64 = per_class
        .iter()
        .map(|r| r.carbon_change.max(0.0))
        .sum();
    let total_emissions: f64 = per_class
        .iter()
        .map(|r| (-r.carbon_change).max(0.0))
        .sum();

    let annual_carbon_rate = if years > 0 {
        Some(total_carbon_change / f64::from(years))
    } else {
        None
    };

    let narrative = build_narrative(&per_class, years);

    CarbonOxygenSummary {
        total_carbon_before,
        total_carbon_after,
        total_carbon_change,
        total_oxygen_before,
        total_oxygen_after,
        total_oxygen_change,
        years,
        total_sequestration,
        total_emissions,
        net_impact: total_sequestration - total_emissions,
        annual_carbon_rate,
        per_class,
        narrative,
        semantics,
    }
}

/// Convenience entry over the raw wire payload.
///
/// `Ok(None)` is the no-data state (missing snapshots or class names);
/// malformed payloads fail validation before anything is computed.
pub fn estimate_raw(
    raw: &RawAnalysis,
    basis: &AreaBasis,
    factors: &ImpactFactors,
    semantics: ChangeSemantics,
) -> Result<Option<CarbonOxygenSummary>> {
    Ok(AnalysisResult::from_raw(raw)?
        .map(|result| estimate(&result, basis, factors, semantics)))
}

/// Linearly interpolated total-carbon trajectory between the two years,
/// one point per year. Degenerates to a single point when the images
/// share a year.
pub fn carbon_timeline(
    result: &AnalysisResult,
    summary: &CarbonOxygenSummary,
) -> Vec<TimelinePoint> {
    let years = result.years_elapsed();
    if years == 0 {
        return vec![TimelinePoint {
            year: result.before_year,
            carbon_tons_per_year: summary.total_carbon_after,
        }];
    }

    let span = summary.total_carbon_after - summary.total_carbon_before;
    (0..=years)
        .map(|i| {
            let progress = f64::from(i) / f64::from(years);
            TimelinePoint {
                year: result.before_year + i,
                carbon_tons_per_year: summary.total_carbon_before + span * progress,
            }
        })
        .collect()
}

fn build_narrative(per_class: &[ClassCarbonRecord], years: i32) -> Vec<String> {
    let years_text = if years == 1 {
        "1 year".to_string()
    } else {
        format!("{years} years")
    };

    let mut significant: Vec<&ClassCarbonRecord> = per_class
        .iter()
        .filter(|r| {
            r.carbon_change.abs() > NARRATIVE_THRESHOLD_TONS
                || r.oxygen_change.abs() > NARRATIVE_THRESHOLD_TONS
        })
        .collect();
    significant.sort_by(|a, b| {
        b.carbon_change
            .abs()
            .partial_cmp(&a.carbon_change.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut sentences = Vec::new();
    for record in significant {
        if record.carbon_change.abs() > NARRATIVE_THRESHOLD_TONS {
            let verb = if record.carbon_change < 0.0 { "lost" } else { "gained" };
            let tons = record.carbon_change.abs().round() as i64;
            sentences.push(format!(
                "Region {verb} approximately {tons} tons CO₂ capacity from {} over {years_text}.",
                record.class_name
            ));
        }
        if record.oxygen_change.abs() > NARRATIVE_THRESHOLD_TONS {
            let verb = if record.oxygen_change < 0.0 { "lost" } else { "gained" };
            let tons = record.oxygen_change.abs().round() as i64;
            sentences.push(format!(
                "Region {verb} approximately {tons} tons O₂ production capacity from {} over {years_text}.",
                record.class_name
            ));
        }
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::analysis::ClassificationSnapshot;

    fn snapshot(probs: &[f64]) -> ClassificationSnapshot {
        ClassificationSnapshot {
            predicted_class: String::new(),
            confidence: 0.9,
            probabilities: probs.to_vec(),
        }
    }

    fn forest_industrial(before: &[f64], after: &[f64]) -> AnalysisResult {
        AnalysisResult {
            class_names: vec!["Forest".to_string(), "Industrial".to_string()],
            before: snapshot(before),
            after: snapshot(after),
            before_year: 2010,
            after_year: 2020,
        }
    }

    fn defaults() -> (AreaBasis, ImpactFactors) {
        (AreaBasis::default(), ImpactFactors::default())
    }

    /// Identical snapshots ⇒ zero change everywhere and no narrative.
    #[test]
    fn identical_snapshots_yield_zero_change() {
        let result = forest_industrial(&[0.6, 0.4], &[0.6, 0.4]);
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);

        assert_eq!(summary.total_carbon_change, 0.0);
        assert_eq!(summary.total_oxygen_change, 0.0);
        assert!(summary.narrative.is_empty());
        assert_eq!(summary.net_impact, 0.0);
        assert_eq!(summary.annual_carbon_rate, Some(0.0));
    }

    /// Full Forest → Industrial conversion over 100 km²:
    ///   before: 100 km² forest = 10 000 ha × 10.5  = +105 000 t CO₂/yr
    ///   after:  100 km² industrial = 10 000 ha × −8.7 = −87 000 t CO₂/yr
    ///   change = −192 000 t CO₂/yr
    #[test]
    fn full_conversion_carbon_figures() {
        let result = forest_industrial(&[1.0, 0.0], &[0.0, 1.0]);
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);

        assert_relative_eq!(summary.total_carbon_before, 105_000.0);
        assert_relative_eq!(summary.total_carbon_after, -87_000.0);
        assert_relative_eq!(summary.total_carbon_change, -192_000.0);
        // O₂: 10 000 ha × 6.6 = 66 000 before; × −2.5 = −25 000 after.
        assert_relative_eq!(summary.total_oxygen_change, -91_000.0);
        assert_eq!(summary.annual_carbon_rate, Some(-19_200.0));
    }

    #[test]
    fn sequestration_emission_split_balances() {
        // Forest loss and industrial growth both push carbon down.
        let result = forest_industrial(&[0.8, 0.2], &[0.5, 0.5]);
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);

        // Forest: −0.3 × 10.5 × 10 000 = −31 500; Industrial: +0.3 × −8.7 × 10 000 = −26 100.
        assert!((summary.total_emissions - 57_600.0).abs() < 1e-6);
        assert_eq!(summary.total_sequestration, 0.0);
        assert!((summary.net_impact - summary.total_carbon_change).abs() < 1e-9);
    }

    #[test]
    fn cumulative_semantics_scales_by_years() {
        let result = forest_industrial(&[1.0, 0.0], &[0.0, 1.0]);
        let (basis, factors) = defaults();
        let rate = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);
        let cumulative =
            estimate(&result, &basis, &factors, ChangeSemantics::CumulativeOverPeriod);

        assert!(
            (cumulative.total_carbon_change - rate.total_carbon_change * 10.0).abs() < 1e-6
        );
        // Before/after figures stay annual rates under both readings.
        assert_eq!(cumulative.total_carbon_before, rate.total_carbon_before);
    }

    #[test]
    fn narrative_sorted_by_carbon_magnitude() {
        let result = AnalysisResult {
            class_names: vec![
                "Forest".to_string(),
                "Industrial".to_string(),
                "Pasture".to_string(),
            ],
            before: snapshot(&[0.5, 0.1, 0.4]),
            after: snapshot(&[0.2, 0.5, 0.3]),
            before_year: 2010,
            after_year: 2020,
        };
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);

        // Industrial |Δ| = 0.4 × 8.7 × 10 000 = 34 800 > Forest 31 500 > Pasture 2 500.
        assert!(summary.narrative[0].contains("Industrial"));
        assert!(summary.narrative[0].contains("lost"));
        assert!(summary.narrative[0].contains("tons CO₂"));
        let forest_pos = summary
            .narrative
            .iter()
            .position(|s| s.contains("Forest"))
            .unwrap();
        let pasture_pos = summary
            .narrative
            .iter()
            .position(|s| s.contains("Pasture"))
            .unwrap();
        assert!(forest_pos < pasture_pos);
        assert!(summary.narrative.iter().all(|s| s.contains("10 years")));
    }

    #[test]
    fn narrative_uses_singular_year() {
        let mut result = forest_industrial(&[1.0, 0.0], &[0.0, 1.0]);
        result.after_year = 2011;
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);
        assert!(summary.narrative.iter().all(|s| s.ends_with("over 1 year.")));
    }

    #[test]
    fn zero_elapsed_years_has_no_annual_rate() {
        let mut result = forest_industrial(&[1.0, 0.0], &[0.0, 1.0]);
        result.after_year = result.before_year;
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);
        assert_eq!(summary.annual_carbon_rate, None);
        assert!(summary.total_carbon_change.is_finite());
    }

    #[test]
    fn estimate_raw_missing_classes_is_no_data() {
        let raw = RawAnalysis::default();
        let (basis, factors) = defaults();
        let out = estimate_raw(&raw, &basis, &factors, ChangeSemantics::AnnualRateDelta)
            .expect("empty payload is not an error");
        assert!(out.is_none());
    }

    #[test]
    fn timeline_endpoints_match_totals() {
        let result = forest_industrial(&[1.0, 0.0], &[0.0, 1.0]);
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);
        let timeline = carbon_timeline(&result, &summary);

        assert_eq!(timeline.len(), 11);
        assert_eq!(timeline[0].year, 2010);
        assert_eq!(timeline[10].year, 2020);
        assert!((timeline[0].carbon_tons_per_year - summary.total_carbon_before).abs() < 1e-9);
        assert!(
            (timeline[10].carbon_tons_per_year - summary.total_carbon_after).abs() < 1e-9
        );
    }

    #[test]
    fn timeline_degenerates_at_zero_years() {
        let mut result = forest_industrial(&[0.6, 0.4], &[0.6, 0.4]);
        result.after_year = result.before_year;
        let (basis, factors) = defaults();
        let summary = estimate(&result, &basis, &factors, ChangeSemantics::AnnualRateDelta);
        let timeline = carbon_timeline(&result, &summary);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].year, result.before_year);
    }
}
