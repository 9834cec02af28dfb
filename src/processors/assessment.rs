use crate::error::Result;
use crate::models::{
    AggregatedFeatureSet, Crop, MeasurementVariable, NutrientEfficiency, NutrientInputs,
    PeriodReport, StressIndexResult,
};
use crate::processors::risk_calculator::{nitrogen_use_efficiency, phosphorus_use_efficiency};
use crate::processors::stress_calculator::{
    daytime_heat_stress, drought_index, frost_stress, nighttime_heat_stress,
};
use tracing::debug;

/// Scores an aggregated forecast window for one crop.
///
/// Required features: daily max/min/avg air temperature, precipitation sum,
/// evapotranspiration sum and 0-10 cm soil moisture.
pub struct PeriodAssessor {
    crop: Crop,
}

impl PeriodAssessor {
    pub fn new(crop: Crop) -> Self {
        Self { crop }
    }

    pub fn assess(&self, features: &AggregatedFeatureSet) -> Result<StressIndexResult> {
        let tmax = features.variable(MeasurementVariable::TempAirDailyMax)?;
        let tmin = features.variable(MeasurementVariable::TempAirDailyMin)?;
        let tmean = features.variable(MeasurementVariable::TempAirDailyAvg)?;
        let precipitation = features.variable(MeasurementVariable::PrecipDailySum)?;
        let evapotranspiration = features.variable(MeasurementVariable::EvapotranspirationDailySum)?;
        let soil_moisture = features.variable(MeasurementVariable::SoilMoistureDailyAvg)?;

        let result = StressIndexResult {
            crop: self.crop,
            daytime_heat_stress: daytime_heat_stress(tmax, self.crop),
            nighttime_heat_stress: nighttime_heat_stress(tmin, self.crop),
            frost_stress: frost_stress(tmin, self.crop),
            drought_index: drought_index(precipitation, evapotranspiration, soil_moisture, tmean)?,
        };

        debug!(crop = %self.crop, scores = ?result.to_map(), "assessed period");
        Ok(result)
    }

    /// NUE and PUE using the window's mean precipitation and soil moisture.
    pub fn nutrient_efficiency(
        &self,
        features: &AggregatedFeatureSet,
        inputs: &NutrientInputs,
    ) -> Result<NutrientEfficiency> {
        let rainfall = features.variable(MeasurementVariable::PrecipDailySum)?;
        let soil_moisture = features.variable(MeasurementVariable::SoilMoistureDailyAvg)?;

        Ok(NutrientEfficiency {
            nitrogen_use_efficiency: nitrogen_use_efficiency(
                inputs.crop_yield,
                inputs.nitrogen_applied,
                rainfall,
                soil_moisture,
                self.crop,
            )?,
            phosphorus_use_efficiency: phosphorus_use_efficiency(
                inputs.crop_yield,
                inputs.phosphorus_applied,
                inputs.soil_ph,
                rainfall,
                soil_moisture,
                self.crop,
            )?,
        })
    }

    pub fn report(
        &self,
        features: &AggregatedFeatureSet,
        inputs: Option<&NutrientInputs>,
    ) -> Result<PeriodReport> {
        let stress = self.assess(features)?;
        let nutrients = inputs
            .map(|i| self.nutrient_efficiency(features, i))
            .transpose()?;
        Ok(PeriodReport { stress, nutrients })
    }
}
