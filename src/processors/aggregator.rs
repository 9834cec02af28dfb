use crate::error::{Result, RiskError};
use crate::models::{AggregatedFeatureSet, MeasurementSample, RawMeasurement};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
struct RunningTotal {
    sum: f64,
    count: usize,
}

/// Reduces labeled samples to one arithmetic mean per label.
///
/// Samples sharing a label are averaged regardless of which day they belong
/// to. Sums are accumulated in input order so results are reproducible.
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, samples: &[MeasurementSample]) -> Result<AggregatedFeatureSet> {
        let mut totals: HashMap<&str, RunningTotal> = HashMap::new();

        for sample in samples {
            if !sample.value.is_finite() {
                return Err(RiskError::MalformedSample {
                    label: sample.label.clone(),
                    value: sample.value.to_string(),
                });
            }

            let total = totals.entry(sample.label.as_str()).or_default();
            total.sum += sample.value;
            total.count += 1;
        }

        debug!(
            samples = samples.len(),
            labels = totals.len(),
            "aggregated measurement samples"
        );

        Ok(totals
            .into_iter()
            .map(|(label, total)| (label.to_string(), total.sum / total.count as f64))
            .collect())
    }

    /// Validate provider entries, then aggregate them.
    ///
    /// The first non-numeric entry aborts the whole call.
    pub fn aggregate_raw(&self, entries: &[RawMeasurement]) -> Result<AggregatedFeatureSet> {
        let samples = entries
            .iter()
            .map(RawMeasurement::to_sample)
            .collect::<Result<Vec<_>>>()?;
        self.aggregate(&samples)
    }
}

impl Default for TimeSeriesAggregator {
    fn default() -> Self {
        Self::new()
    }
}
