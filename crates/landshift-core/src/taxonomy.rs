//! EuroSAT land-cover vocabulary and per-class impact coefficients.
//!
//! The class-name sets used by the health scorer and the default
//! carbon/oxygen factor tables are fixed domain vocabulary tied to the
//! EuroSAT taxonomy. Classes absent from an analysis simply contribute
//! nothing; the engine never requires the full taxonomy to be present.

use serde::{Deserialize, Serialize};

/// The ten EuroSAT land-cover classes, in canonical order.
pub const EUROSAT_CLASSES: [&str; 10] = [
    "AnnualCrop",
    "Forest",
    "HerbaceousVegetation",
    "Highway",
    "Industrial",
    "Pasture",
    "PermanentCrop",
    "Residential",
    "River",
    "SeaLake",
];

/// Classes contributing to the water-quality index.
pub const WATER_CLASSES: [&str; 2] = ["River", "SeaLake"];

/// Classes contributing to the vegetation-health index.
pub const VEGETATION_CLASSES: [&str; 4] =
    ["Forest", "HerbaceousVegetation", "Pasture", "PermanentCrop"];

/// Classes whose presence degrades the air-quality index.
pub const POLLUTION_CLASSES: [&str; 2] = ["Industrial", "Highway"];

/// Natural-habitat classes counted by the biodiversity index.
pub const NATURAL_HABITAT_CLASSES: [&str; 4] =
    ["Forest", "HerbaceousVegetation", "River", "SeaLake"];

/// Per-class signed coefficient table, tons per hectare per year.
/// Positive = sequestration/production, negative = net emission/consumption.
///
/// These are configured approximations, not measured law; callers may
/// override any entry or supply a table for a different taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorTable {
    entries: Vec<(String, f64)>,
}

impl FactorTable {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Coefficient for a class name. Unknown classes get 0 — they neither
    /// sequester nor emit in this model.
    pub fn factor(&self, class_name: &str) -> f64 {
        self.entries
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Replace or insert a single class coefficient.
    pub fn set(&mut self, class_name: &str, factor: f64) {
        match self.entries.iter_mut().find(|(name, _)| name == class_name) {
            Some(entry) => entry.1 = factor,
            None => self.entries.push((class_name.to_string(), factor)),
        }
    }
}

/// Default CO₂ sequestration factors, tons CO₂ · ha⁻¹ · yr⁻¹.
pub fn default_carbon_factors() -> FactorTable {
    FactorTable::new(
        [
            ("Forest", 10.5),
            ("PermanentCrop", 3.2),
            ("AnnualCrop", 1.8),
            ("Pasture", 2.5),
            ("HerbaceousVegetation", 4.1),
            ("River", 0.0),
            ("SeaLake", 0.5),
            ("Highway", -2.1),
            ("Industrial", -8.7),
            ("Residential", -3.4),
        ]
        .into_iter()
        .map(|(n, f)| (n.to_string(), f))
        .collect(),
    )
}

/// Default O₂ production factors, tons O₂ · ha⁻¹ · yr⁻¹.
pub fn default_oxygen_factors() -> FactorTable {
    FactorTable::new(
        [
            ("Forest", 6.6),
            ("PermanentCrop", 1.5),
            ("AnnualCrop", 0.9),
            ("Pasture", 1.2),
            ("HerbaceousVegetation", 1.8),
            ("River", 0.0),
            ("SeaLake", 0.1),
            ("Highway", -0.5),
            ("Industrial", -2.5),
            ("Residential", -1.0),
        ]
        .into_iter()
        .map(|(n, f)| (n.to_string(), f))
        .collect(),
    )
}

/// Carbon and oxygen factor tables bundled for the estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactFactors {
    pub carbon: FactorTable,
    pub oxygen: FactorTable,
}

impl Default for ImpactFactors {
    fn default() -> Self {
        Self {
            carbon: default_carbon_factors(),
            oxygen: default_oxygen_factors(),
        }
    }
}
