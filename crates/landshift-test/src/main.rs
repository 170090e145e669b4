/// Offline scenario battery for the impact engine.
///
/// Runs the engine against hand-computed reference scenarios (identical
/// snapshots, full Forest→Industrial conversion, empty payload, entropy
/// extremes) and prints a pass/fail line per check. Exit code 0 = all
/// passed, 1 = at least one failed. `--input` additionally scores a real
/// analysis JSON file and reports its headline numbers.

use anyhow::{Context, Result};
use clap::Parser;

use landshift_core::analysis::RawSnapshot;
use landshift_core::confidence::shannon_entropy;
use landshift_core::{run_report, RawAnalysis, ReportOptions};

#[derive(Parser, Debug)]
#[command(name = "landshift-test", about = "Offline impact-engine scenario battery runner")]
struct Args {
    /// Optional analysis JSON file to run a full report over.
    #[arg(short, long)]
    input: Option<String>,
}

/// Tracks check results and prints one formatted line per check.
struct Battery {
    passed: usize,
    failed: usize,
}

impl Battery {
    fn new() -> Self {
        Self { passed: 0, failed: 0 }
    }

    fn check(&mut self, label: &str, actual: f64, expected: f64, tolerance: f64) {
        let pass = (actual - expected).abs() <= tolerance;
        self.record(label, pass, &format!("{actual:.6} (expected {expected:.6})"));
    }

    fn check_bool(&mut self, label: &str, pass: bool, detail: &str) {
        self.record(label, pass, detail);
    }

    fn record(&mut self, label: &str, pass: bool, detail: &str) {
        let tag = if pass { "OK" } else { "FAIL" };
        println!("  [{tag}]  {label}: {detail}");
        if pass {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

fn payload(class_names: &[&str], before: &[f64], after: &[f64]) -> RawAnalysis {
    let snapshot = |probs: &[f64]| {
        Some(RawSnapshot {
            predicted_class: None,
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

fn run_battery(battery: &mut Battery) -> Result<()> {
    let opts = ReportOptions::default();

    println!("Scenario: identical snapshots (Forest 60% / Industrial 40%)");
    let report = run_report(
        &payload(&["Forest", "Industrial"], &[0.6, 0.4], &[0.6, 0.4]),
        &opts,
    )?
    .context("identical-snapshot payload should produce a report")?;
    battery.check("total carbon change", report.carbon_oxygen.total_carbon_change, 0.0, 1e-9);
    battery.check("total oxygen change", report.carbon_oxygen.total_oxygen_change, 0.0, 1e-9);
    battery.check_bool(
        "narrative empty",
        report.carbon_oxygen.narrative.is_empty(),
        &format!("{} sentences", report.carbon_oxygen.narrative.len()),
    );
    battery.check("vegetation health", report.health.vegetation_health, 60.0, 1e-9);
    battery.check("air quality", report.health.air_quality, 60.0, 1e-9);

    println!("Scenario: full Forest → Industrial conversion");
    let report = run_report(
        &payload(&["Forest", "Industrial"], &[1.0, 0.0], &[0.0, 1.0]),
        &opts,
    )?
    .context("conversion payload should produce a report")?;
    battery.check_bool(
        "single transition",
        report.changes.transitions.len() == 1,
        &format!("{} candidates", report.changes.transitions.len()),
    );
    if let Some(t) = report.changes.transitions.first() {
        battery.check_bool(
            "transition is Forest → Industrial",
            t.from == "Forest" && t.to == "Industrial",
            &format!("{} → {}", t.from, t.to),
        );
        battery.check("transition strength", t.strength_pp, 100.0, 1e-9);
    }
    battery.check("vegetation health after", report.health.vegetation_health, 0.0, 1e-9);
    battery.check("air quality after", report.health.air_quality, 0.0, 1e-9);

    println!("Scenario: empty payload");
    let empty = run_report(&RawAnalysis::default(), &opts)?;
    battery.check_bool(
        "no-data sentinel, not an error",
        empty.is_none(),
        if empty.is_none() { "None" } else { "Some(..)" },
    );

    println!("Property: entropy extremes");
    let n = 10usize;
    let uniform = vec![1.0 / n as f64; n];
    battery.check("uniform entropy = log2(10)", shannon_entropy(&uniform), (n as f64).log2(), 1e-12);
    let mut one_hot = vec![0.0; n];
    one_hot[3] = 1.0;
    battery.check("one-hot entropy = 0", shannon_entropy(&one_hot), 0.0, 1e-12);

    println!("Property: transition cap and ordering");
    let names: Vec<String> = (0..10).map(|i| format!("C{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let before = vec![0.15, 0.14, 0.13, 0.12, 0.11, 0.07, 0.07, 0.07, 0.07, 0.07];
    let after = vec![0.07, 0.07, 0.07, 0.07, 0.07, 0.15, 0.14, 0.13, 0.12, 0.11];
    let report = run_report(&payload(&name_refs, &before, &after), &opts)?
        .context("cap scenario should produce a report")?;
    battery.check_bool(
        "≤ 10 transitions",
        report.changes.transitions.len() <= 10,
        &format!("{} candidates", report.changes.transitions.len()),
    );
    let sorted = report
        .changes
        .transitions
        .windows(2)
        .all(|p| p[0].strength_pp >= p[1].strength_pp);
    battery.check_bool("sorted non-increasing", sorted, "strength ordering");

    Ok(())
}

fn score_file(path: &str) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading analysis file {path}"))?;
    let raw: RawAnalysis = serde_json::from_str(&text)
        .with_context(|| format!("parsing analysis JSON in {path}"))?;

    match run_report(&raw, &ReportOptions::default())? {
        Some(report) => {
            println!("Report for {path}:");
            println!(
                "  carbon change: {:.1} t CO₂ ({:?})",
                report.carbon_oxygen.total_carbon_change, report.carbon_oxygen.semantics
            );
            println!("  overall health: {:.1} ({:?})", report.health.overall_health, report.health.band);
            println!(
                "  quality score: {:.1} ({:?})",
                report.confidence.quality_score, report.confidence.band
            );
            println!("  transitions: {}", report.changes.transitions.len());
        }
        None => println!("{path}: no analysis data"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.input {
        score_file(path)?;
        return Ok(());
    }

    let mut battery = Battery::new();
    run_battery(&mut battery)?;
    println!("{} passed, {} failed", battery.passed, battery.failed);

    if battery.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
