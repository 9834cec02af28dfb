use crate::error::Result;
use crate::models::{HistoricalDay, HistoricalSeries};
use crate::readers::sample_reader::is_json;
use crate::utils::constants::{ARCHIVE_DATE_FORMAT, ISO_DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Parallel arrays as extracted from an archive query.
#[derive(Debug, Deserialize)]
struct ArchiveColumns {
    dates: Vec<String>,
    tmax: Vec<f64>,
    tmin: Vec<f64>,
    tmean: Vec<f64>,
    precipitation: Vec<f64>,
    evapotranspiration: Vec<f64>,
    soil_moisture: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ArchiveRow {
    date: String,
    tmax: f64,
    tmin: f64,
    tmean: f64,
    precipitation: f64,
    evapotranspiration: f64,
    soil_moisture: f64,
}

/// Parse an archive timestamp (`20230101T0000`) or a plain ISO date.
pub fn parse_archive_date(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, ARCHIVE_DATE_FORMAT) {
        return Ok(dt);
    }

    let date = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Reads aligned historical daily series.
///
/// JSON input holds one array per variable plus `dates`; lengths are not
/// checked here. CSV input has one row per day with a header of
/// `date,tmax,tmin,tmean,precipitation,evapotranspiration,soil_moisture`.
pub struct SeriesReader;

impl SeriesReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_path(&self, path: &Path) -> Result<HistoricalSeries> {
        let file = BufReader::new(File::open(path)?);
        let series = if is_json(path) {
            self.read_json(file)?
        } else {
            self.read_csv(file)?
        };

        debug!(path = %path.display(), days = series.len(), "read historical series");
        Ok(series)
    }

    pub fn read_json<R: Read>(&self, reader: R) -> Result<HistoricalSeries> {
        let columns: ArchiveColumns = serde_json::from_reader(reader)?;
        let dates = columns
            .dates
            .iter()
            .map(|d| parse_archive_date(d))
            .collect::<Result<Vec<_>>>()?;

        Ok(HistoricalSeries {
            dates,
            tmax: columns.tmax,
            tmin: columns.tmin,
            tmean: columns.tmean,
            precipitation: columns.precipitation,
            evapotranspiration: columns.evapotranspiration,
            soil_moisture: columns.soil_moisture,
        })
    }

    pub fn read_csv<R: Read>(&self, reader: R) -> Result<HistoricalSeries> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut days = Vec::new();
        for row in csv_reader.deserialize::<ArchiveRow>() {
            let row = row?;
            days.push(HistoricalDay {
                date: parse_archive_date(&row.date)?,
                tmax: row.tmax,
                tmin: row.tmin,
                tmean: row.tmean,
                precipitation: row.precipitation,
                evapotranspiration: row.evapotranspiration,
                soil_moisture: row.soil_moisture,
            });
        }

        Ok(HistoricalSeries::from_days(&days))
    }
}

impl Default for SeriesReader {
    fn default() -> Self {
        Self::new()
    }
}
