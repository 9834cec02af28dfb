use thiserror::Error;

pub type Result<T> = std::result::Result<T, RiskError>;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Crop '{crop}' not supported. Choose from: {}", .supported.join(", "))]
    UnsupportedCrop {
        crop: String,
        supported: Vec<&'static str>,
    },

    #[error("Malformed sample for '{label}': {value} is not a finite number")]
    MalformedSample { label: String, value: String },

    #[error("Missing required feature: {0}")]
    MissingFeature(String),

    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: String },

    #[error("Series '{field}' has {actual} values, expected {expected}")]
    MisalignedSeries {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Metric {metric} is not applicable to {crop}")]
    NotApplicable { metric: String, crop: String },

    #[error("Cannot average empty series: {0}")]
    EmptySeries(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl RiskError {
    pub fn division_by_zero(operation: impl Into<String>) -> Self {
        RiskError::DivisionByZero {
            operation: operation.into(),
        }
    }
}
