//! landshift-core: land-use change impact estimation engine.
//!
//! Pure, synchronous, deterministic calculators over a pair of
//! time-stamped satellite land-cover classification snapshots:
//!
//!   - `analysis`   — input model and validating adapter
//!   - `carbon`     — CO₂/O₂ capacity change over an assumed area
//!   - `health`     — water/vegetation/air/biodiversity indices
//!   - `change`     — per-class deltas and transition inference
//!   - `confidence` — model confidence/certainty/entropy analytics
//!   - `timeline`   — interpolated class-mix and velocity trends
//!   - `report`     — one-call union of all calculators
//!
//! Every calculator is a pure function of its inputs: no I/O, no hidden
//! state, safe to call concurrently, identical output for identical input.

pub mod analysis;
pub mod carbon;
pub mod change;
pub mod confidence;
pub mod error;
pub mod health;
pub mod report;
pub mod taxonomy;
pub mod timeline;

pub use analysis::{AnalysisResult, AreaBasis, ClassificationSnapshot, RawAnalysis};
pub use carbon::{CarbonOxygenSummary, ChangeSemantics};
pub use change::{ChangeAnalysis, Transition, Trend};
pub use confidence::ConfidenceAnalysis;
pub use error::{Result, ValidationError};
pub use health::{HealthBand, HealthScore};
pub use report::{run_report, ImpactReport, ReportOptions};
pub use taxonomy::ImpactFactors;
