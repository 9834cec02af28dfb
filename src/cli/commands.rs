use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::{
    AveragePolicy, Crop, HistoricalMetrics, Metric, NutrientInputs, SeasonSummary, SoilConditions,
};
use crate::processors::{HistoricalTrendProcessor, ParallelProcessor, PeriodAssessor, TimeSeriesAggregator};
use crate::readers::{SampleReader, SeriesReader};
use crate::utils::filename::generate_default_parquet_filename;
use crate::utils::progress::ProgressReporter;
use crate::utils::settings::Settings;
use crate::writers::{write_json_report, ParquetWriter};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn, Level};

#[derive(Serialize)]
struct TrendReport<'a> {
    crop: Crop,
    days: usize,
    first_date: Option<NaiveDateTime>,
    last_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    averages: Option<BTreeMap<Metric, Option<f64>>>,
    season: SeasonSummary,
    metrics: &'a HistoricalMetrics,
}

/// Install the global tracing subscriber.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Assess {
            input,
            crop,
            output_file,
            crop_yield,
            nitrogen_applied,
            phosphorus_applied,
            soil_ph,
        } => {
            let crop = resolve_crop(crop.as_deref(), &settings)?;
            info!(input = %input.display(), %crop, "assessing forecast window");

            let entries = SampleReader::new().read_path(&input)?;
            let features = TimeSeriesAggregator::new().aggregate_raw(&entries)?;
            info!(entries = entries.len(), labels = features.len(), "aggregated forecast");
            for (label, mean) in features.iter() {
                debug!(label, mean, "feature");
            }

            let unknown = features.unknown_labels();
            if !unknown.is_empty() {
                info!(?unknown, "labels outside the forecast vocabulary were aggregated");
            }

            let nutrients = match (crop_yield, nitrogen_applied, phosphorus_applied, soil_ph) {
                (Some(crop_yield), Some(nitrogen_applied), Some(phosphorus_applied), Some(soil_ph)) => {
                    Some(NutrientInputs {
                        crop_yield,
                        nitrogen_applied,
                        phosphorus_applied,
                        soil_ph,
                    })
                }
                _ => None,
            };

            let report = PeriodAssessor::new(crop).report(&features, nutrients.as_ref())?;
            write_json_report(&report, output_file.as_deref())?;
        }

        Commands::Trend {
            input,
            crop,
            output_file,
            parquet,
            parquet_path,
            compression,
            average,
            strict,
            base_temperature,
            soil_ph,
            soil_nitrogen,
        } => {
            let crop = resolve_crop(crop.as_deref(), &settings)?;
            let policy = resolve_policy(strict, &settings);
            let base_temperature = base_temperature.unwrap_or(settings.base_temperature);

            info!(input = %input.display(), %crop, ?policy, "processing historical series");
            if average && policy == AveragePolicy::Strict && !crop.has_frost_thresholds() {
                warn!(%crop, "frost stress is not applicable; strict averaging will fail");
            }

            let spinner =
                ProgressReporter::new_spinner("Processing historical series...", output_file.is_none());
            let series = SeriesReader::new().read_path(&input)?;
            let processor = HistoricalTrendProcessor::new(crop).with_average_policy(policy);
            let metrics = processor.process(&series)?;

            let averages = if average {
                Some(processor.averages(&metrics)?)
            } else {
                None
            };

            let soil = match (soil_ph, soil_nitrogen) {
                (Some(ph), Some(nitrogen)) => Some(SoilConditions { ph, nitrogen }),
                _ => None,
            };
            let season = processor.summarize_season(&series, base_temperature, soil.as_ref())?;

            if parquet || parquet_path.is_some() {
                let path = parquet_path.unwrap_or_else(|| generate_default_parquet_filename(crop));
                let compression = compression.unwrap_or_else(|| settings.compression.clone());
                write_parquet(&[&metrics], &path, &compression, &spinner)?;
            }
            spinner.finish_with_message(&format!("Processed {} days for {}", metrics.day_count(), crop));

            let range = series.date_range();
            let report = TrendReport {
                crop,
                days: metrics.day_count(),
                first_date: range.map(|r| r.0),
                last_date: range.map(|r| r.1),
                averages,
                season,
                metrics: &metrics,
            };
            write_json_report(&report, output_file.as_deref())?;
        }

        Commands::Compare {
            input,
            crops,
            output_file,
            parquet,
            strict,
            max_workers,
        } => {
            let crops = if crops.is_empty() {
                Crop::ALL.to_vec()
            } else {
                crops
                    .iter()
                    .map(|c| Crop::parse(c))
                    .collect::<Result<Vec<_>>>()?
            };
            let max_workers = max_workers.unwrap_or(settings.max_workers);
            let policy = resolve_policy(strict, &settings);

            info!(input = %input.display(), crops = crops.len(), max_workers, "comparing crops");

            let series = SeriesReader::new().read_path(&input)?;
            let progress = ProgressReporter::new(crops.len() as u64, "Scoring crops...", output_file.is_none());
            let results = ParallelProcessor::new(max_workers)
                .with_average_policy(policy)
                .process_crops(&series, &crops, Some(&progress))?;

            if let Some(path) = parquet {
                let all: Vec<&HistoricalMetrics> = results.iter().map(|r| &r.metrics).collect();
                write_parquet(&all, &path, &settings.compression, &progress)?;
            }

            write_json_report(&results, output_file.as_deref())?;
        }

        Commands::Crops => {
            for crop in Crop::ALL {
                println!("{}", describe_crop(crop));
            }
        }
    }

    Ok(())
}

fn resolve_crop(requested: Option<&str>, settings: &Settings) -> Result<Crop> {
    match requested {
        Some(name) => Crop::parse(name),
        None => settings.crop(),
    }
}

fn resolve_policy(strict: bool, settings: &Settings) -> AveragePolicy {
    if strict {
        AveragePolicy::Strict
    } else {
        settings.average_policy
    }
}

fn write_parquet(
    metrics: &[&HistoricalMetrics],
    path: &Path,
    compression: &str,
    progress: &ProgressReporter,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let writer = ParquetWriter::new().with_compression(compression)?;
    writer.write_metrics(metrics, path)?;

    let file_info = writer.get_file_info(path)?;
    progress.println(&format!("Wrote {}\n{}", path.display(), file_info.summary()));
    Ok(())
}

fn describe_crop(crop: Crop) -> String {
    let p = crop.profile();
    let frost = match p.frost {
        Some(f) => format!("no frost ≥ {:.0}°C, frost ≤ {:.0}°C", f.no_frost, f.frost),
        None => "not applicable".to_string(),
    };

    format!(
        "{}\n\
        - Daytime heat: optimum {:.0}°C, limit {:.0}°C\n\
        - Nighttime heat: optimum {:.0}°C, limit {:.0}°C\n\
        - Frost: {}\n\
        - Optimal GDD: {:.0}-{:.0}\n\
        - Optimal precipitation: {:.0}-{:.0} mm\n\
        - Optimal soil pH: {:.1}-{:.1}\n\
        - Optimal nitrogen: {:.3}-{:.3} g/kg\n\
        - Optimal soil moisture: {:.0}-{:.0}%",
        crop,
        p.tmax_optimum,
        p.tmax_limit,
        p.tmin_optimum,
        p.tmin_limit,
        frost,
        p.gdd_opt.min,
        p.gdd_opt.max,
        p.precipitation_opt.min,
        p.precipitation_opt.max,
        p.ph_opt.min,
        p.ph_opt.max,
        p.nitrogen_opt.min,
        p.nitrogen_opt.max,
        p.soil_moisture_opt.min,
        p.soil_moisture_opt.max,
    )
}
