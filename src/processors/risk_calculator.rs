//! Yield risk and nutrient-use efficiency against crop-optimal conditions.

use crate::error::{Result, RiskError};
use crate::models::{Crop, OptimalRange};
use crate::utils::constants::YIELD_RISK_WEIGHTS;

/// Heat accumulation for one day: `max(0, (tmax + tmin) / 2 - tbase)`.
pub fn growing_degree_days(tmax: f64, tmin: f64, tbase: f64) -> f64 {
    let avg_temp = (tmax + tmin) / 2.0;
    (avg_temp - tbase).max(0.0)
}

/// Weighted squared distance from the crop's optimal midpoints.
///
/// Deviations are in natural units and are not normalised, so the variable
/// with the largest absolute deviation (usually GDD or precipitation)
/// dominates. Scores are not comparable across crops.
pub fn yield_risk(gdd: f64, precipitation: f64, ph: f64, nitrogen: f64, crop: Crop) -> f64 {
    let profile = crop.profile();
    let [w_gdd, w_precip, w_ph, w_nitrogen] = YIELD_RISK_WEIGHTS;

    w_gdd * (gdd - profile.gdd_opt.midpoint()).powi(2)
        + w_precip * (precipitation - profile.precipitation_opt.midpoint()).powi(2)
        + w_ph * (ph - profile.ph_opt.midpoint()).powi(2)
        + w_nitrogen * (nitrogen - profile.nitrogen_opt.midpoint()).powi(2)
}

fn suitability_factor(actual: f64, optimal: &OptimalRange) -> f64 {
    let midpoint = optimal.midpoint();
    if midpoint == 0.0 {
        return 1.0;
    }
    actual / midpoint
}

/// Actual rainfall relative to the crop's optimal midpoint.
pub fn calculate_rainfall_factor(actual_rainfall: f64, crop: Crop) -> f64 {
    suitability_factor(actual_rainfall, &crop.profile().precipitation_opt)
}

/// Actual soil moisture relative to the crop's optimal midpoint.
pub fn calculate_soil_moisture_factor(actual_soil_moisture: f64, crop: Crop) -> f64 {
    suitability_factor(actual_soil_moisture, &crop.profile().soil_moisture_opt)
}

/// Yield per unit of applied nitrogen, scaled by rainfall and soil moisture
/// suitability.
pub fn nitrogen_use_efficiency(
    crop_yield: f64,
    nitrogen_applied: f64,
    actual_rainfall: f64,
    actual_soil_moisture: f64,
    crop: Crop,
) -> Result<f64> {
    if nitrogen_applied == 0.0 {
        return Err(RiskError::division_by_zero(
            "nitrogen use efficiency (nitrogen applied is zero)",
        ));
    }

    let rainfall_factor = calculate_rainfall_factor(actual_rainfall, crop);
    let soil_moisture_factor = calculate_soil_moisture_factor(actual_soil_moisture, crop);

    Ok((crop_yield / nitrogen_applied) * rainfall_factor * soil_moisture_factor)
}

/// Yield per unit of applied phosphorus, scaled by the mean of the pH,
/// rainfall and soil moisture factors.
pub fn phosphorus_use_efficiency(
    crop_yield: f64,
    phosphorus_applied: f64,
    actual_ph: f64,
    actual_rainfall: f64,
    actual_soil_moisture: f64,
    crop: Crop,
) -> Result<f64> {
    if phosphorus_applied == 0.0 {
        return Err(RiskError::division_by_zero(
            "phosphorus use efficiency (phosphorus applied is zero)",
        ));
    }

    let ph_factor = if actual_ph > 0.0 {
        crop.profile().ph_opt.midpoint() / actual_ph
    } else {
        1.0
    };
    let rainfall_factor = calculate_rainfall_factor(actual_rainfall, crop);
    let soil_moisture_factor = calculate_soil_moisture_factor(actual_soil_moisture, crop);

    let soil_factor = (ph_factor + rainfall_factor + soil_moisture_factor) / 3.0;

    Ok((crop_yield / phosphorus_applied) * soil_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_growing_degree_days() {
        assert_eq!(growing_degree_days(30.0, 20.0, 10.0), 15.0);
        assert_eq!(growing_degree_days(8.0, 2.0, 10.0), 0.0);
        assert_eq!(growing_degree_days(12.0, 8.0, 10.0), 0.0);
    }

    #[test]
    fn test_yield_risk_zero_at_optimum() {
        for crop in Crop::ALL {
            let p = crop.profile();
            let risk = yield_risk(
                p.gdd_opt.midpoint(),
                p.precipitation_opt.midpoint(),
                p.ph_opt.midpoint(),
                p.nitrogen_opt.midpoint(),
                crop,
            );
            assert!(risk.abs() < EPS, "{} risk {}", crop, risk);
        }
    }

    #[test]
    fn test_yield_risk_weights() {
        // soybean midpoints: gdd 2700, precip 575, ph 6.4, nitrogen 0.013
        let gdd_only = yield_risk(2710.0, 575.0, 6.4, 0.013, Crop::Soybean);
        assert!((gdd_only - 0.3 * 100.0).abs() < 1e-6);

        let ph_only = yield_risk(2700.0, 575.0, 7.4, 0.013, Crop::Soybean);
        assert!((ph_only - 0.2).abs() < 1e-6);

        let precip_only = yield_risk(2700.0, 475.0, 6.4, 0.013, Crop::Soybean);
        assert!((precip_only - 0.3 * 10_000.0).abs() < 1e-6);
        assert!(yield_risk(2000.0, 100.0, 4.0, 1.0, Crop::Corn) > 0.0);
    }

    #[test]
    fn test_factors() {
        assert!((calculate_rainfall_factor(575.0, Crop::Soybean) - 1.0).abs() < EPS);
        assert!((calculate_rainfall_factor(1250.0, Crop::Wheat) - 1.0).abs() < EPS);
        assert!((calculate_soil_moisture_factor(40.0, Crop::Rice) - 0.5).abs() < EPS);
        assert!((calculate_soil_moisture_factor(90.0, Crop::Corn) - 1.5).abs() < EPS);
    }

    #[test]
    fn test_zero_midpoint_factor_is_one() {
        let degenerate = OptimalRange::new(0.0, 0.0);
        assert_eq!(suitability_factor(123.0, &degenerate), 1.0);
    }

    #[test]
    fn test_nitrogen_use_efficiency() {
        let nue = nitrogen_use_efficiency(1000.0, 50.0, 575.0, 60.0, Crop::Soybean).unwrap();
        assert!((nue - 20.0).abs() < EPS);

        let dry = nitrogen_use_efficiency(1000.0, 50.0, 287.5, 30.0, Crop::Soybean).unwrap();
        assert!((dry - 5.0).abs() < EPS);
    }

    #[test]
    fn test_nitrogen_use_efficiency_zero_applied() {
        assert!(matches!(
            nitrogen_use_efficiency(1000.0, 0.0, 575.0, 60.0, Crop::Soybean),
            Err(RiskError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_phosphorus_use_efficiency() {
        // All three factors equal 1 at the soybean optimum.
        let pue = phosphorus_use_efficiency(3000.0, 30.0, 6.4, 575.0, 60.0, Crop::Soybean).unwrap();
        assert!((pue - 100.0).abs() < 1e-9);

        // Non-positive pH falls back to a neutral factor of 1.
        let fallback =
            phosphorus_use_efficiency(3000.0, 30.0, 0.0, 575.0, 60.0, Crop::Soybean).unwrap();
        assert!((fallback - 100.0).abs() < 1e-9);

        assert!(matches!(
            phosphorus_use_efficiency(3000.0, 0.0, 6.4, 575.0, 60.0, Crop::Soybean),
            Err(RiskError::DivisionByZero { .. })
        ));
    }
}
