pub mod sample_reader;
pub mod series_reader;

pub use sample_reader::SampleReader;
pub use series_reader::{parse_archive_date, SeriesReader};
