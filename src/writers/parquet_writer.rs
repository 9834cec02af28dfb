use crate::error::{Result, RiskError};
use crate::models::{HistoricalMetrics, Metric};
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Writes per-day metric series as one row per (crop, day).
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(RiskError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write one or more crops' metric series to a Parquet file.
    pub fn write_metrics(&self, metrics: &[&HistoricalMetrics], path: &Path) -> Result<()> {
        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        let mut rows = 0;
        for crop_metrics in metrics {
            if crop_metrics.day_count() == 0 {
                continue;
            }
            let batch = self.metrics_to_batch(crop_metrics, schema.clone())?;
            rows += batch.num_rows();
            writer.write(&batch)?;
        }

        writer.close()?;
        info!(path = %path.display(), rows, "wrote metric series");
        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("crop", DataType::Utf8, false),
            Field::new("date", DataType::Timestamp(TimeUnit::Second, None), false),
            Field::new(Metric::DaytimeHeatStress.name(), DataType::Float64, false),
            Field::new(Metric::NighttimeHeatStress.name(), DataType::Float64, false),
            Field::new(Metric::FrostStress.name(), DataType::Float64, true),
            Field::new(Metric::DroughtIndex.name(), DataType::Float64, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn metric_column(&self, metrics: &HistoricalMetrics, metric: Metric) -> Result<ArrayRef> {
        let series = metrics.get(metric).ok_or_else(|| {
            RiskError::InvalidFormat(format!("Missing {} series for {}", metric, metrics.crop))
        })?;
        Ok(Arc::new(Float64Array::from(series.values())))
    }

    fn metrics_to_batch(
        &self,
        metrics: &HistoricalMetrics,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let dates: Vec<i64> = metrics
            .dates()
            .iter()
            .map(|d| d.and_utc().timestamp())
            .collect();
        let crops = vec![metrics.crop.name(); dates.len()];

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(crops)),
            Arc::new(TimestampSecondArray::from(dates)),
        ];
        for metric in Metric::ALL {
            columns.push(self.metric_column(metrics, metric)?);
        }

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, HistoricalSeries};
    use crate::processors::HistoricalTrendProcessor;
    use chrono::NaiveDate;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::NamedTempFile;

    fn series() -> HistoricalSeries {
        let date = |d| {
            NaiveDate::from_ymd_opt(2023, 5, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        HistoricalSeries {
            dates: vec![date(1), date(2), date(3)],
            tmax: vec![28.0, 36.0, 41.0],
            tmin: vec![1.0, 18.0, 23.0],
            tmean: vec![14.0, 27.0, 32.0],
            precipitation: vec![0.0, 4.0, 0.0],
            evapotranspiration: vec![3.0, 5.0, 6.5],
            soil_moisture: vec![22.0, 24.0, 20.0],
        }
    }

    #[test]
    fn test_write_and_count_rows() -> Result<()> {
        let soybean = HistoricalTrendProcessor::new(Crop::Soybean).process(&series())?;
        let wheat = HistoricalTrendProcessor::new(Crop::Wheat).process(&series())?;

        let temp_file = NamedTempFile::new()?;
        let writer = ParquetWriter::new();
        writer.write_metrics(&[&soybean, &wheat], temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 6);
        assert!(info.file_size > 0);
        Ok(())
    }

    #[test]
    fn test_row_group_size() -> Result<()> {
        let rice = HistoricalTrendProcessor::new(Crop::Rice).process(&series())?;

        let temp_file = NamedTempFile::new()?;
        let writer = ParquetWriter::new().with_row_group_size(1);
        writer.write_metrics(&[&rice], temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 3);
        assert_eq!(info.row_groups, 3);
        Ok(())
    }

    #[test]
    fn test_frost_column_is_null_for_wheat() -> Result<()> {
        let wheat = HistoricalTrendProcessor::new(Crop::Wheat).process(&series())?;
        let temp_file = NamedTempFile::new()?;
        ParquetWriter::new().write_metrics(&[&wheat], temp_file.path())?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(temp_file.path())?)?
            .build()?;
        let mut rows = 0;
        for batch in reader {
            let batch = batch?;
            let frost = batch
                .column_by_name("frost_stress")
                .expect("frost column present");
            assert_eq!(frost.null_count(), batch.num_rows());
            rows += batch.num_rows();
        }
        assert_eq!(rows, 3);
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let corn = HistoricalTrendProcessor::new(Crop::Corn).process(&series())?;

        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;
            let result = writer.write_metrics(&[&corn], temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli2").is_err());
        Ok(())
    }
}
