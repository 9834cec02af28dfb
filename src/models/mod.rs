pub mod crop;
pub mod historical;
pub mod measurement;
pub mod stress;

pub use crop::{lookup, supported_crops, Crop, CropProfile, FrostThresholds, OptimalRange};
pub use historical::{
    AveragePolicy, HistoricalDay, HistoricalMetricSeries, HistoricalMetrics, HistoricalSeries,
    Metric, MetricPoint, SeasonSummary,
};
pub use measurement::{AggregatedFeatureSet, MeasurementSample, MeasurementVariable, RawMeasurement};
pub use stress::{NutrientEfficiency, NutrientInputs, PeriodReport, SoilConditions, StressIndexResult};
