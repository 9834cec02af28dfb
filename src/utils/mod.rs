pub mod constants;
pub mod filename;
pub mod progress;
pub mod settings;

pub use constants::*;
pub use filename::generate_default_parquet_filename;
pub use progress::ProgressReporter;
pub use settings::Settings;
