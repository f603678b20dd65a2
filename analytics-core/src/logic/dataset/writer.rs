use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::record::MetricRecord;
use super::DataError;

/// Write records as CSV with a header row, replacing any existing file
pub fn write_csv(path: &Path, records: &[MetricRecord]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    to_writer(file, records)?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn to_writer<W: Write>(output: W, records: &[MetricRecord]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_writer(output);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
