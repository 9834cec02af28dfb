use crate::error::{Result, RiskError};
use crate::models::{AveragePolicy, Crop, HistoricalMetrics, HistoricalSeries, Metric};
use crate::processors::HistoricalTrendProcessor;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// Trend results for one crop in a multi-crop comparison.
#[derive(Debug, Clone, Serialize)]
pub struct CropComparison {
    pub crop: Crop,
    pub averages: BTreeMap<Metric, Option<f64>>,
    #[serde(skip)]
    pub metrics: HistoricalMetrics,
}

/// Evaluates one historical series against several crops at once.
pub struct ParallelProcessor {
    max_workers: usize,
    average_policy: AveragePolicy,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            average_policy: AveragePolicy::default(),
        }
    }

    pub fn with_average_policy(mut self, policy: AveragePolicy) -> Self {
        self.average_policy = policy;
        self
    }

    /// Results are returned in the order of `crops`.
    pub fn process_crops(
        &self,
        series: &HistoricalSeries,
        crops: &[Crop],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<CropComparison>> {
        series.validate()?;

        let processed_count = Arc::new(AtomicUsize::new(0));

        if let Some(p) = progress {
            p.set_message(&format!("Scoring {} crops...", crops.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| RiskError::Config(e.to_string()))?;

        let results: Result<Vec<CropComparison>> = pool.install(|| {
            crops
                .par_iter()
                .map(|&crop| {
                    let result = self.process_single_crop(series, crop);

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    result
                })
                .collect()
        });

        let results = results?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Scored {} crops", results.len()));
        }
        info!(crops = results.len(), days = series.len(), "multi-crop comparison complete");

        Ok(results)
    }

    fn process_single_crop(&self, series: &HistoricalSeries, crop: Crop) -> Result<CropComparison> {
        let processor =
            HistoricalTrendProcessor::new(crop).with_average_policy(self.average_policy);
        let metrics = processor.process(series)?;
        let averages = processor.averages(&metrics)?;

        Ok(CropComparison {
            crop,
            averages,
            metrics,
        })
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
