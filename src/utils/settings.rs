use crate::error::{Result, RiskError};
use crate::models::{AveragePolicy, Crop};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_BASE_TEMPERATURE, DEFAULT_CONFIG_FILE, DEFAULT_CROP, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Runtime defaults for the command-line tool.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file,
/// `AGRI_RISK_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub default_crop: String,

    #[validate(range(min = -20.0, max = 40.0))]
    pub base_temperature: f64,

    pub average_policy: AveragePolicy,

    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,

    pub compression: String,
}

impl Settings {
    /// Load settings. An explicitly given file must exist; the default file
    /// is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
        };

        let settings: Settings = Config::builder()
            .set_default("default_crop", DEFAULT_CROP)?
            .set_default("base_temperature", DEFAULT_BASE_TEMPERATURE)?
            .set_default("average_policy", "exclude-not-applicable")?
            .set_default("max_workers", num_cpus::get() as i64)?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .add_source(File::from(file.as_path()).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.check()?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Range checks plus the crop and codec names.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.crop()?;

        let codecs = [
            COMPRESSION_SNAPPY,
            COMPRESSION_GZIP,
            COMPRESSION_LZ4,
            COMPRESSION_ZSTD,
            COMPRESSION_NONE,
        ];
        if !codecs.contains(&self.compression.to_lowercase().as_str()) {
            return Err(RiskError::Config(format!(
                "Unsupported compression: {}",
                self.compression
            )));
        }

        Ok(())
    }

    pub fn crop(&self) -> Result<Crop> {
        Crop::parse(&self.default_crop)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_crop: DEFAULT_CROP.to_string(),
            base_temperature: DEFAULT_BASE_TEMPERATURE,
            average_policy: AveragePolicy::default(),
            max_workers: num_cpus::get(),
            compression: COMPRESSION_SNAPPY.to_string(),
        }
    }
}
