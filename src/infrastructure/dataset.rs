//! CSV training data loader.
//!
//! Expected header:
//! `timestamp,location_id,weather_score,holiday_flag,weekend_flag,social_media_spike_index,traffic_index,actual_footfall`
//! with RFC 3339 timestamps and `true`/`false` flags.

use crate::domain::footfall::HistoricalRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

pub fn load_historical_records(path: &Path) -> Result<Vec<HistoricalRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open training data at {:?}", path))?;
    let rows = read_historical_records(BufReader::new(file))?;
    info!("Loaded {} training rows from {:?}", rows.len(), path);
    Ok(rows)
}

pub fn read_historical_records<R: Read>(reader: R) -> Result<Vec<HistoricalRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let record: HistoricalRecord =
            result.with_context(|| format!("Malformed training row {}", index + 1))?;
        rows.push(record);
    }
    Ok(rows)
}
