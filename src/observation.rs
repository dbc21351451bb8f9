//! Traffic observation types shared by the collector, persistence and analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Congestion status of a road segment as reported by the traffic provider.
///
/// | Code      | Variant                 |
/// |-----------|-------------------------|
/// | `"0"`     | [`TrafficStatus::Unknown`] |
/// | `"1"`     | [`TrafficStatus::Clear`] |
/// | `"2"`     | [`TrafficStatus::Slow`] |
/// | `"3"`     | [`TrafficStatus::Congested`] |
/// | `"4"`     | [`TrafficStatus::SeverelyCongested`] |
/// | `"error"` | [`TrafficStatus::Error`] |
///
/// Any other code is kept verbatim in [`TrafficStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrafficStatus {
    Unknown,
    Clear,
    Slow,
    Congested,
    SeverelyCongested,
    Other(String),
    /// The provider call for this road failed.
    Error,
}

impl TrafficStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "" | "0" => TrafficStatus::Unknown,
            "1" => TrafficStatus::Clear,
            "2" => TrafficStatus::Slow,
            "3" => TrafficStatus::Congested,
            "4" => TrafficStatus::SeverelyCongested,
            "error" => TrafficStatus::Error,
            other => TrafficStatus::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            TrafficStatus::Unknown => "0",
            TrafficStatus::Clear => "1",
            TrafficStatus::Slow => "2",
            TrafficStatus::Congested => "3",
            TrafficStatus::SeverelyCongested => "4",
            TrafficStatus::Other(code) => code,
            TrafficStatus::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TrafficStatus::Error)
    }
}

impl From<String> for TrafficStatus {
    fn from(code: String) -> Self {
        TrafficStatus::from_code(&code)
    }
}

impl From<TrafficStatus> for String {
    fn from(status: TrafficStatus) -> Self {
        status.code().to_string()
    }
}

impl fmt::Display for TrafficStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One directional stretch of a road, as returned by the traffic provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub name: Option<String>,
    pub direction: Option<String>,
    pub speed: Option<f64>,
    pub status: TrafficStatus,
    pub description: Option<String>,
}

/// Result of a single traffic-status query for one road.
#[derive(Debug, Clone, PartialEq)]
pub enum TrafficOutcome {
    Success(Vec<RoadSegment>),
    /// Carries the provider's error message or the transport error.
    Failure(String),
}

/// A normalized traffic reading with its delay index computed.
///
/// `delay_index` and `free_flow_speed` are always populated, including for
/// degraded records produced from failed provider calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub road_name: String,
    pub direction: Option<String>,
    pub speed: Option<f64>,
    pub status: TrafficStatus,
    pub description: Option<String>,
    pub delay_index: f64,
    pub free_flow_speed: f64,
}
