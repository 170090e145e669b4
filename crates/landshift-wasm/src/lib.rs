//! Browser boundary for the impact engine.
//!
//! The dashboard passes the classification service's analysis JSON straight
//! through; the report comes back as a plain JS object. The engine is
//! synchronous and allocation-only, so no async plumbing is needed.

use wasm_bindgen::prelude::*;

use landshift_core::{run_report, RawAnalysis, ReportOptions};

/// Run the full impact report over an analysis payload.
///
/// `analysis_json` is the raw service payload; `options_json` is an
/// optional `ReportOptions` document (empty string = defaults). Returns
/// the report as a JS object, or JS `null` when the payload carries no
/// analysis yet. Malformed payloads reject with an error string.
#[wasm_bindgen]
pub fn analyze(analysis_json: &str, options_json: &str) -> Result<JsValue, JsValue> {
    let raw: RawAnalysis = serde_json::from_str(analysis_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid analysis: {e}")))?;

    let opts: ReportOptions = if options_json.trim().is_empty() {
        ReportOptions::default()
    } else {
        serde_json::from_str(options_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))?
    };

    let report = run_report(&raw, &opts).map_err(|e| JsValue::from_str(&e.to_string()))?;

    match report {
        Some(report) => serde_wasm_bindgen::to_value(&report)
            .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}"))),
        None => Ok(JsValue::NULL),
    }
}
