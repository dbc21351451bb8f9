//! Persistence of traffic observations and export of aggregate summaries.
//!
//! Observations are appended to a CSV log that is created with a header on
//! first write. Summaries are written as fresh CSV files, optionally gzip
//! compressed.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::observation::{Observation, TrafficStatus};

/// Format of the `timestamp` column in the observation log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Column order of the observation log.
pub const RECORD_HEADER: [&str; 8] = [
    "timestamp",
    "road_name",
    "direction",
    "speed",
    "status",
    "description",
    "delay_index",
    "free_flow_speed",
];

/// One row of the observation log. Field order matches [`RECORD_HEADER`].
#[derive(Debug, Serialize)]
struct TrafficRecord<'a> {
    #[serde(with = "timestamp_format")]
    timestamp: NaiveDateTime,
    road_name: &'a str,
    direction: Option<&'a str>,
    speed: Option<f64>,
    status: &'a TrafficStatus,
    description: Option<&'a str>,
    delay_index: f64,
    free_flow_speed: f64,
}

impl<'a> TrafficRecord<'a> {
    fn new(timestamp: NaiveDateTime, o: &'a Observation) -> Self {
        Self {
            timestamp,
            road_name: &o.road_name,
            direction: o.direction.as_deref(),
            speed: o.speed,
            status: &o.status,
            description: o.description.as_deref(),
            delay_index: o.delay_index,
            free_flow_speed: o.free_flow_speed,
        }
    }
}

/// Appends `observations` to the CSV log at `path`, stamping every row with
/// `timestamp`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_observations(path: &str, observations: &[Observation], timestamp: NaiveDateTime) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = observations.len(), "Appending CSV records");

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open '{path}' for appending"))?;

    // Header is written by hand so an empty first batch still creates it.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if !file_exists {
        writer.write_record(RECORD_HEADER)?;
    }

    for o in observations {
        writer.serialize(TrafficRecord::new(timestamp, o))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `rows` as a CSV summary to `path`, replacing any existing file.
///
/// With `gzip`, the output goes to `<path>.gz` instead. Returns the path
/// actually written.
pub fn write_summary<T: Serialize>(path: &str, rows: &[T], gzip: bool) -> Result<String> {
    let mut buffer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        buffer.serialize(row)?;
    }
    let contents = buffer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to finish summary CSV: {}", e.error()))?;

    let (target, body) = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&contents)?;
        (format!("{path}.gz"), encoder.finish()?)
    } else {
        (path.to_string(), contents)
    };

    let mut file = File::create(&target).with_context(|| format!("failed to create '{target}'"))?;
    file.write_all(&body)?;

    info!(path = %target, rows = rows.len(), gzip, "Summary written");
    Ok(target)
}
