//! Per-day stress scores on the 0..=9 scale, plus the drought index.
//!
//! Heat and frost scores are linear ramps between crop thresholds. The
//! drought index takes no crop parameter.

use crate::error::{Result, RiskError};
use crate::models::Crop;
use crate::utils::constants::{MAX_STRESS, NO_STRESS};

/// Daytime heat stress from the daily maximum temperature (°C).
pub fn daytime_heat_stress(tmax: f64, crop: Crop) -> f64 {
    let profile = crop.profile();
    let (optimum, limit) = (profile.tmax_optimum, profile.tmax_limit);

    if tmax <= optimum {
        NO_STRESS
    } else if tmax >= limit {
        MAX_STRESS
    } else {
        MAX_STRESS * (tmax - optimum) / (limit - optimum)
    }
}

/// Nighttime heat stress from the daily minimum temperature (°C).
///
/// Unlike the daytime score the lower comparison is strict: a minimum equal
/// to the optimum is still zero, and the ramp starts just above it.
pub fn nighttime_heat_stress(tmin: f64, crop: Crop) -> f64 {
    let profile = crop.profile();
    let (optimum, limit) = (profile.tmin_optimum, profile.tmin_limit);

    if tmin < optimum {
        NO_STRESS
    } else if tmin >= limit {
        MAX_STRESS
    } else {
        (MAX_STRESS * (tmin - optimum) / (limit - optimum)).min(MAX_STRESS)
    }
}

/// Frost stress from the daily minimum temperature (°C).
///
/// Returns `None` for crops without frost thresholds.
pub fn frost_stress(tmin: f64, crop: Crop) -> Option<f64> {
    let frost = crop.profile().frost?;
    let (no_frost, hard_frost) = (frost.no_frost, frost.frost);

    let score = if tmin >= no_frost {
        NO_STRESS
    } else if tmin <= hard_frost {
        MAX_STRESS
    } else {
        MAX_STRESS * ((tmin - no_frost).abs() / (hard_frost - no_frost).abs())
    };
    Some(score)
}

/// `(precipitation - evaporation + soil_moisture) / temperature`.
///
/// Values above 1 indicate no drought risk; lower values mean more pressure.
/// Only an exact zero temperature is rejected.
pub fn drought_index(
    precipitation: f64,
    evaporation: f64,
    soil_moisture: f64,
    temperature: f64,
) -> Result<f64> {
    if temperature == 0.0 {
        return Err(RiskError::division_by_zero("drought index (temperature is zero)"));
    }

    Ok((precipitation - evaporation + soil_moisture) / temperature)
}
