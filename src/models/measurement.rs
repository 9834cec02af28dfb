use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, RiskError};

/// Daily measurement labels requested from the forecast provider.
///
/// The label strings are the provider's vocabulary and are kept verbatim,
/// since aggregated features are keyed by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeasurementVariable {
    // Growth & stress monitoring
    TempAirDailyAvg,
    TempAirDailyMax,
    TempAirDailyMin,
    SoilTemperatureDailyAvg,
    SoilTemperatureDailyMax,
    SoilTemperatureDailyMin,
    // Irrigation & water management
    SoilMoistureDailyAvg,
    SoilMoistureDailyMax,
    SoilMoistureDailyMin,
    PrecipDailySum,
    PrecipProbabilityDaily,
    ShowerProbabilityDailyMax,
    ReferenceEvapotranspirationDailySum,
    EvapotranspirationDailySum,
    // Disease & pest risk
    HumidityRelDailyAvg,
    HumidityRelDailyMax,
    HumidityRelDailyMin,
    // Spraying conditions
    WindSpeedDailyAvg,
    WindSpeedDailyMax,
    WindSpeedDailyMin,
    WindGustDailyMax,
    WindDirectionDailyAvg,
    // Photosynthesis
    GlobalRadiationDailySum,
    SunshineDurationDailySum,
    // Severe weather
    ThunderstormProbabilityDailyMax,
    SnowFractionDaily,
}

impl MeasurementVariable {
    pub const ALL: [MeasurementVariable; 26] = [
        MeasurementVariable::TempAirDailyAvg,
        MeasurementVariable::TempAirDailyMax,
        MeasurementVariable::TempAirDailyMin,
        MeasurementVariable::SoilTemperatureDailyAvg,
        MeasurementVariable::SoilTemperatureDailyMax,
        MeasurementVariable::SoilTemperatureDailyMin,
        MeasurementVariable::SoilMoistureDailyAvg,
        MeasurementVariable::SoilMoistureDailyMax,
        MeasurementVariable::SoilMoistureDailyMin,
        MeasurementVariable::PrecipDailySum,
        MeasurementVariable::PrecipProbabilityDaily,
        MeasurementVariable::ShowerProbabilityDailyMax,
        MeasurementVariable::ReferenceEvapotranspirationDailySum,
        MeasurementVariable::EvapotranspirationDailySum,
        MeasurementVariable::HumidityRelDailyAvg,
        MeasurementVariable::HumidityRelDailyMax,
        MeasurementVariable::HumidityRelDailyMin,
        MeasurementVariable::WindSpeedDailyAvg,
        MeasurementVariable::WindSpeedDailyMax,
        MeasurementVariable::WindSpeedDailyMin,
        MeasurementVariable::WindGustDailyMax,
        MeasurementVariable::WindDirectionDailyAvg,
        MeasurementVariable::GlobalRadiationDailySum,
        MeasurementVariable::SunshineDurationDailySum,
        MeasurementVariable::ThunderstormProbabilityDailyMax,
        MeasurementVariable::SnowFractionDaily,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementVariable::TempAirDailyAvg => "TempAir_DailyAvg (C)",
            MeasurementVariable::TempAirDailyMax => "TempAir_DailyMax (C)",
            MeasurementVariable::TempAirDailyMin => "TempAir_DailyMin (C)",
            MeasurementVariable::SoilTemperatureDailyAvg => "Soiltemperature_0to10cm_DailyAvg (C)",
            MeasurementVariable::SoilTemperatureDailyMax => "Soiltemperature_0to10cm_DailyMax (C)",
            MeasurementVariable::SoilTemperatureDailyMin => "Soiltemperature_0to10cm_DailyMin (C)",
            MeasurementVariable::SoilMoistureDailyAvg => "Soilmoisture_0to10cm_DailyAvg (vol%)",
            MeasurementVariable::SoilMoistureDailyMax => "Soilmoisture_0to10cm_DailyMax (vol%)",
            MeasurementVariable::SoilMoistureDailyMin => "Soilmoisture_0to10cm_DailyMin (vol%)",
            MeasurementVariable::PrecipDailySum => "Precip_DailySum (mm)",
            MeasurementVariable::PrecipProbabilityDaily => "PrecipProbability_Daily (pct)",
            MeasurementVariable::ShowerProbabilityDailyMax => "ShowerProbability_DailyMax (pct)",
            MeasurementVariable::ReferenceEvapotranspirationDailySum => {
                "Referenceevapotranspiration_DailySum (mm)"
            }
            MeasurementVariable::EvapotranspirationDailySum => "Evapotranspiration_DailySum (mm)",
            MeasurementVariable::HumidityRelDailyAvg => "HumidityRel_DailyAvg (pct)",
            MeasurementVariable::HumidityRelDailyMax => "HumidityRel_DailyMax (pct)",
            MeasurementVariable::HumidityRelDailyMin => "HumidityRel_DailyMin (pct)",
            MeasurementVariable::WindSpeedDailyAvg => "WindSpeed_DailyAvg (m/s)",
            MeasurementVariable::WindSpeedDailyMax => "WindSpeed_DailyMax (m/s)",
            MeasurementVariable::WindSpeedDailyMin => "WindSpeed_DailyMin (m/s)",
            MeasurementVariable::WindGustDailyMax => "WindGust_DailyMax (m/s)",
            MeasurementVariable::WindDirectionDailyAvg => "WindDirection_DailyAvg (Deg)",
            MeasurementVariable::GlobalRadiationDailySum => "GlobalRadiation_DailySum (Wh/m²)",
            MeasurementVariable::SunshineDurationDailySum => "SunshineDuration_DailySum (min)",
            MeasurementVariable::ThunderstormProbabilityDailyMax => {
                "ThunderstormProbability_DailyMax (pct)"
            }
            MeasurementVariable::SnowFractionDaily => "SnowFraction_Daily (pct)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }
}

impl fmt::Display for MeasurementVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One observation of one named variable at one time point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub label: String,
    pub value: f64,
}

impl MeasurementSample {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn variable(&self) -> Option<MeasurementVariable> {
        MeasurementVariable::from_label(&self.label)
    }
}

/// A forecast entry as delivered by the provider, before numeric validation.
///
/// `dailyValue` arrives either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    #[serde(rename = "measureLabel")]
    pub measure_label: String,
    #[serde(rename = "dailyValue")]
    pub daily_value: serde_json::Value,
}

impl RawMeasurement {
    pub fn new(measure_label: impl Into<String>, daily_value: serde_json::Value) -> Self {
        Self {
            measure_label: measure_label.into(),
            daily_value,
        }
    }

    pub fn to_sample(&self) -> Result<MeasurementSample> {
        let value = match &self.daily_value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match value {
            Some(v) if v.is_finite() => Ok(MeasurementSample::new(self.measure_label.clone(), v)),
            _ => Err(RiskError::MalformedSample {
                label: self.measure_label.clone(),
                value: self.daily_value.to_string(),
            }),
        }
    }
}

/// Mean value per measurement label.
///
/// Every key has at least one contributing sample. Keys are the labels exactly
/// as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedFeatureSet {
    means: BTreeMap<String, f64>,
}

impl AggregatedFeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Result<f64> {
        self.means
            .get(label)
            .copied()
            .ok_or_else(|| RiskError::MissingFeature(label.to_string()))
    }

    pub fn variable(&self, variable: MeasurementVariable) -> Result<f64> {
        self.get(variable.label())
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.means.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Labels that are not part of the provider vocabulary.
    pub fn unknown_labels(&self) -> Vec<&str> {
        self.means
            .keys()
            .filter(|k| MeasurementVariable::from_label(k).is_none())
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<(String, f64)> for AggregatedFeatureSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            means: iter.into_iter().collect(),
        }
    }
}
