/// Stress scale bounds
pub const NO_STRESS: f64 = 0.0;
pub const MAX_STRESS: f64 = 9.0;

/// Yield risk weights: GDD, precipitation, soil pH, nitrogen
pub const YIELD_RISK_WEIGHTS: [f64; 4] = [0.3, 0.3, 0.2, 0.2];

/// Growing degree day base temperature (°C)
pub const DEFAULT_BASE_TEMPERATURE: f64 = 10.0;

/// Date formats used by the historical archive
pub const ARCHIVE_DATE_FORMAT: &str = "%Y%m%dT%H%M";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "agri-risk.toml";
pub const ENV_PREFIX: &str = "AGRI_RISK";
pub const DEFAULT_CROP: &str = "soybean";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
