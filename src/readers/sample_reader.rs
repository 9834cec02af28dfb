use crate::error::Result;
use crate::models::RawMeasurement;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvSample {
    label: String,
    value: String,
}

/// Reads forecast measurement entries from JSON or CSV.
///
/// JSON input is the provider's array of `{"measureLabel", "dailyValue"}`
/// objects. CSV input has a `label,value` header. Values are left unparsed;
/// numeric validation happens during aggregation.
pub struct SampleReader;

impl SampleReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<RawMeasurement>> {
        let file = BufReader::new(File::open(path)?);
        let entries = if is_json(path) {
            self.read_json(file)?
        } else {
            self.read_csv(file)?
        };

        debug!(path = %path.display(), entries = entries.len(), "read forecast samples");
        Ok(entries)
    }

    pub fn read_json<R: Read>(&self, reader: R) -> Result<Vec<RawMeasurement>> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn read_csv<R: Read>(&self, reader: R) -> Result<Vec<RawMeasurement>> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut entries = Vec::new();
        for record in csv_reader.deserialize::<CsvSample>() {
            let record = record?;
            entries.push(RawMeasurement::new(
                record.label,
                serde_json::Value::String(record.value),
            ));
        }
        Ok(entries)
    }
}

impl Default for SampleReader {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
