/// CLI: run the full impact report over an analysis JSON file.
///
/// Reads the classification service payload from disk, prints the report
/// document as JSON on stdout. A payload with no analysis yet prints
/// `null` and exits 0 — absence of data is not a failure.

use anyhow::{Context, Result};
use clap::Parser;

use landshift_core::analysis::AreaBasis;
use landshift_core::{run_report, ChangeSemantics, RawAnalysis, ReportOptions};

#[derive(Parser, Debug)]
#[command(name = "report", about = "Compute a land-use change impact report from an analysis JSON file")]
struct Args {
    /// Path to the analysis JSON file (classification service payload).
    #[arg(short, long)]
    input: String,

    /// Assumed ground area in km² that the probability mass covers.
    #[arg(long, default_value_t = AreaBasis::DEFAULT_AREA_KM2)]
    area_km2: f64,

    /// Report cumulative change over the elapsed period instead of the
    /// annual rate delta.
    #[arg(long)]
    cumulative: bool,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input))?;
    let raw: RawAnalysis =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", args.input))?;

    let opts = ReportOptions {
        area: AreaBasis::new(args.area_km2)?,
        semantics: if args.cumulative {
            ChangeSemantics::CumulativeOverPeriod
        } else {
            ChangeSemantics::AnnualRateDelta
        },
        ..ReportOptions::default()
    };

    let report = run_report(&raw, &opts).context("validating analysis payload")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
