use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serialize a report as pretty JSON to a file, or stdout when no path is
/// given. Not-applicable values appear as `null`.
pub fn write_json_report<T: Serialize>(report: &T, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut writer = BufWriter::new(File::create(p)?);
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, report)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
