use crate::models::Crop;
use chrono::Local;
use std::path::PathBuf;

const DEFAULT_OUTPUT_DIR: &str = "output";

/// `output/agri-risk-{crop}-{YYMMDD}.parquet`, dated with the local day.
pub fn generate_default_parquet_filename(crop: Crop) -> PathBuf {
    let stamp = Local::now().format("%y%m%d");
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(format!("agri-risk-{}-{}.parquet", crop, stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_per_crop() {
        let path = generate_default_parquet_filename(Crop::Cotton);

        assert_eq!(path.parent(), Some(std::path::Path::new(DEFAULT_OUTPUT_DIR)));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("parquet"));

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();
        let stamp = stem.strip_prefix("agri-risk-cotton-").unwrap();
        assert_eq!(stamp.len(), 6);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }
}
