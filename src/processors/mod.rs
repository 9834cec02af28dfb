pub mod aggregator;
pub mod assessment;
pub mod parallel_processor;
pub mod risk_calculator;
pub mod stress_calculator;
pub mod trend_processor;

pub use aggregator::TimeSeriesAggregator;
pub use assessment::PeriodAssessor;
pub use parallel_processor::{CropComparison, ParallelProcessor};
pub use trend_processor::HistoricalTrendProcessor;
