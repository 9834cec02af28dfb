use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RiskError};

/// Optimal growing range for one variable, in the variable's natural units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Frost thresholds in °C. `no_frost` is always above `frost`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrostThresholds {
    pub no_frost: f64,
    pub frost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProfile {
    pub tmax_optimum: f64,
    pub tmax_limit: f64,
    pub tmin_optimum: f64,
    pub tmin_limit: f64,
    /// `None` where frost stress does not apply (rice, wheat).
    pub frost: Option<FrostThresholds>,
    pub gdd_opt: OptimalRange,
    pub precipitation_opt: OptimalRange,
    pub ph_opt: OptimalRange,
    pub nitrogen_opt: OptimalRange,
    pub soil_moisture_opt: OptimalRange,
}

const STANDARD_FROST: FrostThresholds = FrostThresholds {
    no_frost: 4.0,
    frost: -3.0,
};

static SOYBEAN: CropProfile = CropProfile {
    tmax_optimum: 32.0,
    tmax_limit: 45.0,
    tmin_optimum: 22.0,
    tmin_limit: 28.0,
    frost: Some(STANDARD_FROST),
    gdd_opt: OptimalRange::new(2400.0, 3000.0),
    precipitation_opt: OptimalRange::new(450.0, 700.0),
    ph_opt: OptimalRange::new(6.0, 6.8),
    nitrogen_opt: OptimalRange::new(0.0, 0.026),
    soil_moisture_opt: OptimalRange::new(50.0, 70.0),
};

static CORN: CropProfile = CropProfile {
    tmax_optimum: 33.0,
    tmax_limit: 44.0,
    tmin_optimum: 22.0,
    tmin_limit: 28.0,
    frost: Some(STANDARD_FROST),
    gdd_opt: OptimalRange::new(2700.0, 3100.0),
    precipitation_opt: OptimalRange::new(500.0, 800.0),
    ph_opt: OptimalRange::new(6.0, 6.8),
    nitrogen_opt: OptimalRange::new(0.077, 0.154),
    soil_moisture_opt: OptimalRange::new(50.0, 70.0),
};

static COTTON: CropProfile = CropProfile {
    tmax_optimum: 32.0,
    tmax_limit: 38.0,
    tmin_optimum: 20.0,
    tmin_limit: 25.0,
    frost: Some(STANDARD_FROST),
    gdd_opt: OptimalRange::new(2200.0, 2600.0),
    precipitation_opt: OptimalRange::new(700.0, 1300.0),
    ph_opt: OptimalRange::new(6.0, 6.5),
    nitrogen_opt: OptimalRange::new(0.051, 0.092),
    soil_moisture_opt: OptimalRange::new(50.0, 70.0),
};

static RICE: CropProfile = CropProfile {
    tmax_optimum: 32.0,
    tmax_limit: 38.0,
    tmin_optimum: 22.0,
    tmin_limit: 28.0,
    frost: None,
    gdd_opt: OptimalRange::new(2000.0, 2500.0),
    precipitation_opt: OptimalRange::new(1000.0, 1500.0),
    ph_opt: OptimalRange::new(5.5, 6.5),
    nitrogen_opt: OptimalRange::new(0.051, 0.103),
    soil_moisture_opt: OptimalRange::new(80.0, 80.0),
};

static WHEAT: CropProfile = CropProfile {
    tmax_optimum: 25.0,
    tmax_limit: 32.0,
    tmin_optimum: 15.0,
    tmin_limit: 20.0,
    frost: None,
    gdd_opt: OptimalRange::new(2000.0, 2500.0),
    precipitation_opt: OptimalRange::new(1000.0, 1500.0),
    ph_opt: OptimalRange::new(5.5, 6.5),
    nitrogen_opt: OptimalRange::new(0.051, 0.103),
    soil_moisture_opt: OptimalRange::new(80.0, 80.0),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Crop {
    Soybean,
    Corn,
    Cotton,
    Rice,
    Wheat,
}

impl Crop {
    pub const ALL: [Crop; 5] = [
        Crop::Soybean,
        Crop::Corn,
        Crop::Cotton,
        Crop::Rice,
        Crop::Wheat,
    ];

    /// Resolve a crop name, ignoring case.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "soybean" => Ok(Crop::Soybean),
            "corn" => Ok(Crop::Corn),
            "cotton" => Ok(Crop::Cotton),
            "rice" => Ok(Crop::Rice),
            "wheat" => Ok(Crop::Wheat),
            _ => Err(RiskError::UnsupportedCrop {
                crop: name.to_string(),
                supported: supported_crops(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Soybean => "soybean",
            Crop::Corn => "corn",
            Crop::Cotton => "cotton",
            Crop::Rice => "rice",
            Crop::Wheat => "wheat",
        }
    }

    pub fn profile(&self) -> &'static CropProfile {
        match self {
            Crop::Soybean => &SOYBEAN,
            Crop::Corn => &CORN,
            Crop::Cotton => &COTTON,
            Crop::Rice => &RICE,
            Crop::Wheat => &WHEAT,
        }
    }

    pub fn has_frost_thresholds(&self) -> bool {
        self.profile().frost.is_some()
    }
}

impl FromStr for Crop {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        Crop::parse(s)
    }
}

impl TryFrom<String> for Crop {
    type Error = RiskError;

    fn try_from(value: String) -> Result<Self> {
        Crop::parse(&value)
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn supported_crops() -> Vec<&'static str> {
    Crop::ALL.iter().map(Crop::name).collect()
}

/// Look up the parameter profile for a crop name (case-insensitive).
pub fn lookup(crop: &str) -> Result<&'static CropProfile> {
    Crop::parse(crop).map(|c| c.profile())
}
