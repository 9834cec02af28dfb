use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agri-risk")]
#[command(about = "Crop-specific agronomic risk indices from daily weather and soil series")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: agri-risk.toml when present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score an aggregated forecast window for one crop
    Assess {
        #[arg(short, long, help = "Forecast samples (.json provider entries or label,value .csv)")]
        input: PathBuf,

        #[arg(short, long, help = "Crop name [default: from settings]")]
        crop: Option<String>,

        #[arg(short, long, help = "Write JSON report here instead of stdout")]
        output_file: Option<PathBuf>,

        #[arg(
            long,
            requires_all = ["nitrogen_applied", "phosphorus_applied", "soil_ph"],
            help = "Projected yield (kg/ha); enables nutrient-use efficiency"
        )]
        crop_yield: Option<f64>,

        #[arg(long, requires = "crop_yield", help = "Nitrogen applied (kg/ha)")]
        nitrogen_applied: Option<f64>,

        #[arg(long, requires = "crop_yield", help = "Phosphorus applied (kg P/ha)")]
        phosphorus_applied: Option<f64>,

        #[arg(long, requires = "crop_yield", help = "Soil pH")]
        soil_ph: Option<f64>,
    },

    /// Compute per-day risk series over a historical window
    Trend {
        #[arg(short, long, help = "Historical series (.json columns or .csv rows)")]
        input: PathBuf,

        #[arg(short, long, help = "Crop name [default: from settings]")]
        crop: Option<String>,

        #[arg(short, long, help = "Write JSON report here instead of stdout")]
        output_file: Option<PathBuf>,

        #[arg(
            long,
            help = "Also write series to Parquet at output/agri-risk-{crop}-{YYMMDD}.parquet"
        )]
        parquet: bool,

        #[arg(long, help = "Write series to this Parquet file instead of the default path")]
        parquet_path: Option<PathBuf>,

        #[arg(long, help = "Parquet compression [default: from settings]")]
        compression: Option<String>,

        #[arg(long, help = "Include per-metric averages")]
        average: bool,

        #[arg(long, help = "Fail averaging when a metric is not applicable")]
        strict: bool,

        #[arg(long, help = "GDD base temperature in °C [default: from settings]")]
        base_temperature: Option<f64>,

        #[arg(long, requires = "soil_nitrogen", help = "Soil pH for season yield risk")]
        soil_ph: Option<f64>,

        #[arg(long, requires = "soil_ph", help = "Soil nitrogen (g/kg) for season yield risk")]
        soil_nitrogen: Option<f64>,
    },

    /// Compare metric averages across crops for one historical window
    Compare {
        #[arg(short, long, help = "Historical series (.json columns or .csv rows)")]
        input: PathBuf,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Crops to compare [default: all supported crops]"
        )]
        crops: Vec<String>,

        #[arg(short, long, help = "Write JSON report here instead of stdout")]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Also write all series to this Parquet file")]
        parquet: Option<PathBuf>,

        #[arg(long, help = "Fail averaging when a metric is not applicable")]
        strict: bool,

        #[arg(long, help = "Worker threads [default: from settings]")]
        max_workers: Option<usize>,
    },

    /// Print the crop parameter table
    Crops,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_parquet_flag_uses_default_path() {
        let cli = Cli::try_parse_from(["agri-risk", "trend", "-i", "h.csv", "--parquet"]).unwrap();
        match cli.command {
            Commands::Trend {
                parquet,
                parquet_path,
                ..
            } => {
                assert!(parquet);
                assert_eq!(parquet_path, None);
            }
            _ => panic!("expected trend"),
        }

        let cli = Cli::try_parse_from([
            "agri-risk",
            "trend",
            "-i",
            "h.csv",
            "--parquet-path",
            "out/soy.parquet",
        ])
        .unwrap();
        match cli.command {
            Commands::Trend {
                parquet,
                parquet_path,
                ..
            } => {
                assert!(!parquet);
                assert_eq!(parquet_path, Some(PathBuf::from("out/soy.parquet")));
            }
            _ => panic!("expected trend"),
        }
    }

    #[test]
    fn test_nutrient_inputs_need_crop_yield() {
        for arg in ["--nitrogen-applied", "--phosphorus-applied", "--soil-ph"] {
            let result = Cli::try_parse_from(["agri-risk", "assess", "-i", "f.json", arg, "50"]);
            assert!(result.is_err(), "{} accepted without --crop-yield", arg);
        }

        let partial = Cli::try_parse_from([
            "agri-risk",
            "assess",
            "-i",
            "f.json",
            "--crop-yield",
            "3000",
            "--nitrogen-applied",
            "150",
        ]);
        assert!(partial.is_err());

        let full = Cli::try_parse_from([
            "agri-risk",
            "assess",
            "-i",
            "f.json",
            "--crop-yield",
            "3000",
            "--nitrogen-applied",
            "150",
            "--phosphorus-applied",
            "40",
            "--soil-ph",
            "6.5",
        ]);
        assert!(full.is_ok());
    }
}
