use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, RiskError};
use crate::models::Crop;

/// Time-aligned daily series from the historical archive.
///
/// All vectors are indexed by day; `validate` must pass before the
/// series is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub dates: Vec<NaiveDateTime>,
    pub tmax: Vec<f64>,
    pub tmin: Vec<f64>,
    pub tmean: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub evapotranspiration: Vec<f64>,
    pub soil_moisture: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub date: NaiveDateTime,
    pub tmax: f64,
    pub tmin: f64,
    pub tmean: f64,
    pub precipitation: f64,
    pub evapotranspiration: f64,
    pub soil_moisture: f64,
}

impl HistoricalSeries {
    pub fn from_days(days: &[HistoricalDay]) -> Self {
        Self {
            dates: days.iter().map(|d| d.date).collect(),
            tmax: days.iter().map(|d| d.tmax).collect(),
            tmin: days.iter().map(|d| d.tmin).collect(),
            tmean: days.iter().map(|d| d.tmean).collect(),
            precipitation: days.iter().map(|d| d.precipitation).collect(),
            evapotranspiration: days.iter().map(|d| d.evapotranspiration).collect(),
            soil_moisture: days.iter().map(|d| d.soil_moisture).collect(),
        }
    }

    /// Check every variable against the date axis and return the day count.
    pub fn validate_alignment(&self) -> Result<usize> {
        let expected = self.dates.len();
        let fields: [(&'static str, usize); 6] = [
            ("tmax", self.tmax.len()),
            ("tmin", self.tmin.len()),
            ("tmean", self.tmean.len()),
            ("precipitation", self.precipitation.len()),
            ("evapotranspiration", self.evapotranspiration.len()),
            ("soil_moisture", self.soil_moisture.len()),
        ];

        for (field, actual) in fields {
            if actual != expected {
                return Err(RiskError::MisalignedSeries {
                    field,
                    expected,
                    actual,
                });
            }
        }

        Ok(expected)
    }

    /// Reject NaN and infinite readings, naming the variable and the day.
    pub fn validate_values(&self) -> Result<()> {
        let fields: [(&'static str, &[f64]); 6] = [
            ("tmax", &self.tmax),
            ("tmin", &self.tmin),
            ("tmean", &self.tmean),
            ("precipitation", &self.precipitation),
            ("evapotranspiration", &self.evapotranspiration),
            ("soil_moisture", &self.soil_moisture),
        ];

        for (field, values) in fields {
            let bad = values
                .iter()
                .zip(&self.dates)
                .find(|(value, _)| !value.is_finite());
            if let Some((value, date)) = bad {
                return Err(RiskError::MalformedSample {
                    label: format!("{} on {}", field, date),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Alignment plus finiteness; returns the day count.
    pub fn validate(&self) -> Result<usize> {
        let days = self.validate_alignment()?;
        self.validate_values()?;
        Ok(days)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Day at `index`. Callers must have validated alignment.
    pub fn day(&self, index: usize) -> Option<HistoricalDay> {
        Some(HistoricalDay {
            date: *self.dates.get(index)?,
            tmax: *self.tmax.get(index)?,
            tmin: *self.tmin.get(index)?,
            tmean: *self.tmean.get(index)?,
            precipitation: *self.precipitation.get(index)?,
            evapotranspiration: *self.evapotranspiration.get(index)?,
            soil_moisture: *self.soil_moisture.get(index)?,
        })
    }

    pub fn days(&self) -> impl Iterator<Item = HistoricalDay> + '_ {
        (0..self.len()).map_while(|i| self.day(i))
    }

    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = *self.dates.iter().min()?;
        let last = *self.dates.iter().max()?;
        Some((first, last))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DaytimeHeatStress,
    NighttimeHeatStress,
    FrostStress,
    DroughtIndex,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::DaytimeHeatStress,
        Metric::NighttimeHeatStress,
        Metric::FrostStress,
        Metric::DroughtIndex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::DaytimeHeatStress => "daytime_heat_stress",
            Metric::NighttimeHeatStress => "nighttime_heat_stress",
            Metric::FrostStress => "frost_stress",
            Metric::DroughtIndex => "drought_index",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: NaiveDateTime,
    /// `None` when the metric is not applicable to the crop.
    pub value: Option<f64>,
}

/// One metric evaluated for every day of a series, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMetricSeries {
    pub metric: Metric,
    pub points: Vec<MetricPoint>,
}

impl HistoricalMetricSeries {
    pub fn with_capacity(metric: Metric, capacity: usize) -> Self {
        Self {
            metric,
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, date: NaiveDateTime, value: Option<f64>) {
        self.points.push(MetricPoint { date, value });
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// How not-applicable entries are treated when a metric series is averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AveragePolicy {
    /// Leave not-applicable entries out of both sum and count.
    #[default]
    ExcludeNotApplicable,
    /// Any not-applicable entry fails the average.
    Strict,
}

/// Per-metric series for one crop over one historical window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMetrics {
    pub crop: Crop,
    pub series: BTreeMap<Metric, HistoricalMetricSeries>,
}

impl HistoricalMetrics {
    pub fn get(&self, metric: Metric) -> Option<&HistoricalMetricSeries> {
        self.series.get(&metric)
    }

    pub fn day_count(&self) -> usize {
        self.series.values().map(|s| s.len()).max().unwrap_or(0)
    }

    pub fn dates(&self) -> Vec<NaiveDateTime> {
        self.series
            .values()
            .next()
            .map(|s| s.points.iter().map(|p| p.date).collect())
            .unwrap_or_default()
    }
}

/// Whole-season aggregates over a historical window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub crop: Crop,
    pub days: usize,
    pub base_temperature: f64,
    pub growing_degree_days: f64,
    pub total_precipitation: f64,
    pub mean_soil_moisture: Option<f64>,
    pub yield_risk: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 7, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_alignment_reports_first_mismatched_field() {
        let mut series = HistoricalSeries {
            dates: vec![at(1), at(2)],
            tmax: vec![30.0, 31.0],
            tmin: vec![20.0, 21.0],
            tmean: vec![25.0],
            precipitation: vec![0.0, 1.0],
            evapotranspiration: vec![4.0, 4.0],
            soil_moisture: vec![30.0, 29.0],
        };

        match series.validate_alignment() {
            Err(RiskError::MisalignedSeries {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "tmean");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected MisalignedSeries, got {:?}", other),
        }

        series.tmean.push(26.0);
        assert_eq!(series.validate_alignment().unwrap(), 2);
        assert_eq!(series.days().count(), 2);
        assert_eq!(series.day(1).unwrap().tmean, 26.0);
        assert_eq!(series.date_range(), Some((at(1), at(2))));
    }

    #[test]
    fn test_from_days_keeps_order() {
        let days = vec![
            HistoricalDay {
                date: at(3),
                tmax: 1.0,
                tmin: 0.0,
                tmean: 0.5,
                precipitation: 0.0,
                evapotranspiration: 0.0,
                soil_moisture: 0.0,
            },
            HistoricalDay {
                date: at(1),
                tmax: 2.0,
                tmin: 0.0,
                tmean: 1.0,
                precipitation: 0.0,
                evapotranspiration: 0.0,
                soil_moisture: 0.0,
            },
        ];
        let series = HistoricalSeries::from_days(&days);
        assert_eq!(series.dates, vec![at(3), at(1)]);
        assert_eq!(series.tmax, vec![1.0, 2.0]);
    }

    #[test]
    fn test_non_finite_reading_names_field_and_day() {
        let mut series = HistoricalSeries::from_days(&[
            HistoricalDay {
                date: at(1),
                tmax: 30.0,
                tmin: 20.0,
                tmean: 25.0,
                precipitation: 0.0,
                evapotranspiration: 4.0,
                soil_moisture: 30.0,
            },
            HistoricalDay {
                date: at(2),
                tmax: f64::NAN,
                tmin: 21.0,
                tmean: 26.0,
                precipitation: 1.0,
                evapotranspiration: 4.0,
                soil_moisture: f64::INFINITY,
            },
        ]);

        assert_eq!(series.validate_alignment().unwrap(), 2);
        match series.validate() {
            Err(RiskError::MalformedSample { label, value }) => {
                assert!(label.starts_with("tmax on 2023-07-02"), "{}", label);
                assert_eq!(value, "NaN");
            }
            other => panic!("expected MalformedSample, got {:?}", other),
        }

        series.tmax[1] = 31.0;
        match series.validate() {
            Err(RiskError::MalformedSample { label, value }) => {
                assert!(label.starts_with("soil_moisture"), "{}", label);
                assert_eq!(value, "inf");
            }
            other => panic!("expected MalformedSample, got {:?}", other),
        }

        series.soil_moisture[1] = 29.0;
        assert_eq!(series.validate().unwrap(), 2);
    }

    #[test]
    fn test_metric_names_match_serde() {
        for metric in Metric::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric.name()));
        }
    }

    #[test]
    fn test_average_policy_default_and_names() {
        assert_eq!(AveragePolicy::default(), AveragePolicy::ExcludeNotApplicable);
        let policy: AveragePolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(policy, AveragePolicy::Strict);
    }
}
