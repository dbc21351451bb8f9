//! Data types used by the aggregation pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::analyzers::utility::serialize_rounded;
use crate::output::timestamp_format;

/// A single row deserialized from the observation log.
///
/// Only the columns needed for aggregation are read; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub road_name: String,
    #[serde(deserialize_with = "finite_option")]
    pub delay_index: Option<f64>,
}

/// Like [`csv::invalid_option`], but also treats `NaN` and infinities as
/// missing.
fn finite_option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value: Option<f64> = csv::invalid_option(deserializer)?;
    Ok(value.filter(|v| v.is_finite()))
}

/// Summed delay index of one road over the whole history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadAggregate {
    pub road_name: String,
    #[serde(serialize_with = "serialize_rounded")]
    pub delay_index: f64,
}

/// Summed delay index of one hour of day (0–23) over the whole history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyAggregate {
    pub hour: u32,
    #[serde(serialize_with = "serialize_rounded")]
    pub delay_index: f64,
}
