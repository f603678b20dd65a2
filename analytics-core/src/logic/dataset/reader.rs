use std::io::Read;
use std::path::Path;

use super::record::MetricRecord;
use super::DataError;

/// Read every record from a CSV file with a header row
pub fn read_csv(path: &Path) -> Result<Vec<MetricRecord>, DataError> {
    let reader = csv::Reader::from_path(path)?;
    collect_records(reader)
}

/// Same as [`read_csv`] over any reader
pub fn from_reader<R: Read>(input: R) -> Result<Vec<MetricRecord>, DataError> {
    collect_records(csv::Reader::from_reader(input))
}

fn collect_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<MetricRecord>, DataError> {
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: MetricRecord = row?;
        records.push(record);
    }
    Ok(records)
}
