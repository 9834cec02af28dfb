use crate::error::{Result, RiskError};
use crate::models::{
    AveragePolicy, Crop, HistoricalMetricSeries, HistoricalMetrics, HistoricalSeries, Metric,
    SeasonSummary, SoilConditions,
};
use crate::processors::risk_calculator::{growing_degree_days, yield_risk};
use crate::processors::stress_calculator::{
    daytime_heat_stress, drought_index, frost_stress, nighttime_heat_stress,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Applies the single-day formulas across an aligned historical series.
pub struct HistoricalTrendProcessor {
    crop: Crop,
    average_policy: AveragePolicy,
}

impl HistoricalTrendProcessor {
    pub fn new(crop: Crop) -> Self {
        Self {
            crop,
            average_policy: AveragePolicy::default(),
        }
    }

    pub fn with_average_policy(mut self, policy: AveragePolicy) -> Self {
        self.average_policy = policy;
        self
    }

    /// Evaluate every metric for every day. Output series share the input's
    /// date axis and length.
    pub fn process(&self, series: &HistoricalSeries) -> Result<HistoricalMetrics> {
        let days = series.validate()?;
        if days == 0 {
            warn!(crop = %self.crop, "historical series is empty");
        }

        let mut daytime = HistoricalMetricSeries::with_capacity(Metric::DaytimeHeatStress, days);
        let mut nighttime =
            HistoricalMetricSeries::with_capacity(Metric::NighttimeHeatStress, days);
        let mut frost = HistoricalMetricSeries::with_capacity(Metric::FrostStress, days);
        let mut drought = HistoricalMetricSeries::with_capacity(Metric::DroughtIndex, days);

        for day in series.days() {
            daytime.push(day.date, Some(daytime_heat_stress(day.tmax, self.crop)));
            nighttime.push(day.date, Some(nighttime_heat_stress(day.tmin, self.crop)));
            frost.push(day.date, frost_stress(day.tmin, self.crop));

            let di = drought_index(
                day.precipitation,
                day.evapotranspiration,
                day.soil_moisture,
                day.tmean,
            )
            .map_err(|e| match e {
                RiskError::DivisionByZero { .. } => RiskError::division_by_zero(format!(
                    "drought index on {} (mean temperature is zero)",
                    day.date
                )),
                other => other,
            })?;
            drought.push(day.date, Some(di));
        }

        debug!(crop = %self.crop, days, "processed historical series");

        let by_metric = [daytime, nighttime, frost, drought]
            .into_iter()
            .map(|s| (s.metric, s))
            .collect();

        Ok(HistoricalMetrics {
            crop: self.crop,
            series: by_metric,
        })
    }

    /// Arithmetic mean of one metric series.
    ///
    /// With `ExcludeNotApplicable`, a series whose entries are all not
    /// applicable averages to `None`. With `Strict`, any such entry is an
    /// error. An empty series is always an error.
    pub fn average(&self, series: &HistoricalMetricSeries) -> Result<Option<f64>> {
        if series.is_empty() {
            return Err(RiskError::EmptySeries(series.metric.to_string()));
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for point in &series.points {
            match point.value {
                Some(value) => {
                    sum += value;
                    count += 1;
                }
                None if self.average_policy == AveragePolicy::Strict => {
                    return Err(RiskError::NotApplicable {
                        metric: series.metric.to_string(),
                        crop: self.crop.to_string(),
                    });
                }
                None => {}
            }
        }

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(sum / count as f64))
    }

    pub fn averages(&self, metrics: &HistoricalMetrics) -> Result<BTreeMap<Metric, Option<f64>>> {
        metrics
            .series
            .values()
            .map(|s| Ok((s.metric, self.average(s)?)))
            .collect()
    }

    /// Accumulated GDD, total rainfall and mean soil moisture for the window,
    /// with yield risk when soil chemistry is known.
    pub fn summarize_season(
        &self,
        series: &HistoricalSeries,
        base_temperature: f64,
        soil: Option<&SoilConditions>,
    ) -> Result<SeasonSummary> {
        let days = series.validate()?;

        let gdd: f64 = series
            .days()
            .map(|d| growing_degree_days(d.tmax, d.tmin, base_temperature))
            .sum();
        let total_precipitation: f64 = series.precipitation.iter().sum();
        let mean_soil_moisture = if days > 0 {
            Some(series.soil_moisture.iter().sum::<f64>() / days as f64)
        } else {
            None
        };

        let risk = soil.map(|s| yield_risk(gdd, total_precipitation, s.ph, s.nitrogen, self.crop));

        Ok(SeasonSummary {
            crop: self.crop,
            days,
            base_temperature,
            growing_degree_days: gdd,
            total_precipitation,
            mean_soil_moisture,
            yield_risk: risk,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoricalDay;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn three_days() -> HistoricalSeries {
        HistoricalSeries {
            dates: vec![at(1), at(2), at(3)],
            tmax: vec![30.0, 35.0, 50.0],
            tmin: vec![20.0, 0.5, -5.0],
            tmean: vec![25.0, 18.0, 20.0],
            precipitation: vec![0.0, 10.0, 2.0],
            evapotranspiration: vec![5.0, 4.0, 6.0],
            soil_moisture: vec![30.0, 30.0, 28.0],
        }
    }

    #[test]
    fn test_soybean_daytime_series() {
        let metrics = HistoricalTrendProcessor::new(Crop::Soybean)
            .process(&three_days())
            .unwrap();

        let daytime = metrics.get(Metric::DaytimeHeatStress).unwrap().values();
        assert_eq!(daytime.len(), 3);
        assert_eq!(daytime[0], Some(0.0));
        assert!((daytime[1].unwrap() - 2.077).abs() < 1e-3);
        assert_eq!(daytime[2], Some(9.0));
        assert_eq!(metrics.dates(), vec![at(1), at(2), at(3)]);
    }

    #[test]
    fn test_all_metrics_share_dates() {
        let metrics = HistoricalTrendProcessor::new(Crop::Corn)
            .process(&three_days())
            .unwrap();

        assert_eq!(metrics.series.len(), 4);
        for series in metrics.series.values() {
            let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
            assert_eq!(dates, vec![at(1), at(2), at(3)]);
        }

        let drought = metrics.get(Metric::DroughtIndex).unwrap().values();
        assert!((drought[0].unwrap() - 1.0).abs() < 1e-9);
        let frost = metrics.get(Metric::FrostStress).unwrap().values();
        assert_eq!(frost[0], Some(0.0));
        assert!((frost[1].unwrap() - 4.5).abs() < 1e-9);
        assert_eq!(frost[2], Some(9.0));
    }

    #[test]
    fn test_misaligned_series_rejected() {
        let mut series = three_days();
        series.evapotranspiration.pop();
        assert!(matches!(
            HistoricalTrendProcessor::new(Crop::Soybean).process(&series),
            Err(RiskError::MisalignedSeries {
                field: "evapotranspiration",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_mean_temperature_names_day() {
        let mut series = three_days();
        series.tmean[1] = 0.0;
        match HistoricalTrendProcessor::new(Crop::Soybean).process(&series) {
            Err(RiskError::DivisionByZero { operation }) => {
                assert!(operation.contains("2023-01-02"), "{}", operation)
            }
            other => panic!("expected DivisionByZero, got {:?}", other),
        }
    }

    #[test]
    fn test_average_excludes_not_applicable() {
        let processor = HistoricalTrendProcessor::new(Crop::Rice);
        let metrics = processor.process(&three_days()).unwrap();
        let averages = processor.averages(&metrics).unwrap();

        assert_eq!(averages[&Metric::FrostStress], None);
        let daytime = averages[&Metric::DaytimeHeatStress].unwrap();
        // rice: 30 -> 0, 35 -> 4.5, 50 -> 9
        assert!((daytime - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_strict_average_fails_on_not_applicable() {
        let processor =
            HistoricalTrendProcessor::new(Crop::Wheat).with_average_policy(AveragePolicy::Strict);
        let metrics = processor.process(&three_days()).unwrap();

        assert!(matches!(
            processor.averages(&metrics),
            Err(RiskError::NotApplicable { .. })
        ));
        assert!(processor
            .average(metrics.get(Metric::DaytimeHeatStress).unwrap())
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_empty_series() {
        let processor = HistoricalTrendProcessor::new(Crop::Soybean);
        let metrics = processor.process(&HistoricalSeries::default()).unwrap();
        assert_eq!(metrics.day_count(), 0);
        assert!(matches!(
            processor.average(metrics.get(Metric::DroughtIndex).unwrap()),
            Err(RiskError::EmptySeries(_))
        ));
    }

    #[test]
    fn test_season_summary() {
        let series = HistoricalSeries::from_days(&[
            HistoricalDay {
                date: at(1),
                tmax: 30.0,
                tmin: 20.0,
                tmean: 25.0,
                precipitation: 300.0,
                evapotranspiration: 0.0,
                soil_moisture: 40.0,
            },
            HistoricalDay {
                date: at(2),
                tmax: 8.0,
                tmin: 2.0,
                tmean: 5.0,
                precipitation: 275.0,
                evapotranspiration: 0.0,
                soil_moisture: 60.0,
            },
        ]);
        let soil = SoilConditions {
            ph: 6.4,
            nitrogen: 0.013,
        };

        let summary = HistoricalTrendProcessor::new(Crop::Soybean)
            .summarize_season(&series, 10.0, Some(&soil))
            .unwrap();

        assert_eq!(summary.days, 2);
        assert_eq!(summary.growing_degree_days, 15.0);
        assert_eq!(summary.total_precipitation, 575.0);
        assert_eq!(summary.mean_soil_moisture, Some(50.0));
        let expected = 0.3 * (15.0f64 - 2700.0).powi(2);
        assert!((summary.yield_risk.unwrap() - expected).abs() < 1e-6);

        let no_soil = HistoricalTrendProcessor::new(Crop::Soybean)
            .summarize_season(&series, 10.0, None)
            .unwrap();
        assert_eq!(no_soil.yield_risk, None);
    }
}
