use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Crop;

/// Risk indices for a single period.
///
/// `frost_stress` is `None` when the crop has no frost thresholds, which is
/// distinct from `Some(0.0)` (no frost stress).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressIndexResult {
    pub crop: Crop,
    pub daytime_heat_stress: f64,
    pub nighttime_heat_stress: f64,
    pub frost_stress: Option<f64>,
    pub drought_index: f64,
}

impl StressIndexResult {
    /// Flatten into an index-name mapping, `None` meaning not applicable.
    pub fn to_map(&self) -> BTreeMap<&'static str, Option<f64>> {
        BTreeMap::from([
            ("daytime_heat_stress", Some(self.daytime_heat_stress)),
            ("nighttime_heat_stress", Some(self.nighttime_heat_stress)),
            ("frost_stress", self.frost_stress),
            ("drought_index", Some(self.drought_index)),
        ])
    }
}

/// Soil chemistry supplied by the caller; not part of the weather feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilConditions {
    pub ph: f64,
    /// Available nitrogen, g/kg.
    pub nitrogen: f64,
}

/// Field management inputs for nutrient-use efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientInputs {
    pub crop_yield: f64,
    pub nitrogen_applied: f64,
    pub phosphorus_applied: f64,
    pub soil_ph: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientEfficiency {
    pub nitrogen_use_efficiency: f64,
    pub phosphorus_use_efficiency: f64,
}

/// Everything computed for one aggregated period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    #[serde(flatten)]
    pub stress: StressIndexResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<NutrientEfficiency>,
}
