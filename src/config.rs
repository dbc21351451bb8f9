//! Static lookup tables used to compute delay indices.
//!
//! [`TrafficConfig`] is built once at startup, either from the built-in
//! defaults or from a JSON file, and then passed by reference to the
//! resolver and the calculator:
//!
//! ```json
//! {
//!   "free_flow_speeds": {
//!     "overrides": [
//!       { "pattern": "三环路", "speed": 80.0 },
//!       { "pattern": "主干道", "speed": 50.0 }
//!     ],
//!     "default_speed": 40.0
//!   },
//!   "status_fallback": { "congested": 2.0 }
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// A road-name substring mapped to its free-flow speed in km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedOverride {
    pub pattern: String,
    pub speed: f64,
}

impl SpeedOverride {
    pub fn new(pattern: &str, speed: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            speed,
        }
    }
}

/// Free-flow speeds keyed by road-name substring, scanned in declared order.
///
/// Road-class names (e.g. `"主干道"`) live in the same list and are looked
/// up by exact key when a road is classified by keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeFlowSpeedTable {
    pub overrides: Vec<SpeedOverride>,
    pub default_speed: f64,
}

impl Default for FreeFlowSpeedTable {
    fn default() -> Self {
        Self {
            overrides: vec![
                SpeedOverride::new("福州绕城高速", 100.0),
                SpeedOverride::new("三环路", 80.0),
                SpeedOverride::new("二环路", 60.0),
                SpeedOverride::new("高速公路", 100.0),
                SpeedOverride::new("快速路", 80.0),
                SpeedOverride::new("高架路", 70.0),
                SpeedOverride::new("主干道", 50.0),
            ],
            default_speed: 40.0,
        }
    }
}

impl FreeFlowSpeedTable {
    /// Returns the speed configured under exactly `key`, if any.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.overrides
            .iter()
            .find(|o| o.pattern == key)
            .map(|o| o.speed)
    }

    fn validate(&self) -> Result<()> {
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            bail!("default_speed must be positive, got {}", self.default_speed);
        }
        for o in &self.overrides {
            if o.pattern.is_empty() {
                bail!("free-flow speed override with empty pattern");
            }
            if !(o.speed.is_finite() && o.speed > 0.0) {
                bail!("free-flow speed for '{}' must be positive, got {}", o.pattern, o.speed);
            }
        }
        Ok(())
    }
}

/// Delay index assumed for each status when no usable speed is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusIndexTable {
    pub unknown: f64,
    pub clear: f64,
    pub slow: f64,
    pub congested: f64,
    pub severely_congested: f64,
    pub error: f64,
    /// Used for status codes outside 0..=4.
    pub unmapped: f64,
}

impl Default for StatusIndexTable {
    fn default() -> Self {
        Self {
            unknown: 1.0,
            clear: 1.0,
            slow: 1.5,
            congested: 2.0,
            severely_congested: 2.5,
            error: 1.0,
            unmapped: 1.0,
        }
    }
}

impl StatusIndexTable {
    fn validate(&self) -> Result<()> {
        let values = [
            ("unknown", self.unknown),
            ("clear", self.clear),
            ("slow", self.slow),
            ("congested", self.congested),
            ("severely_congested", self.severely_congested),
            ("error", self.error),
            ("unmapped", self.unmapped),
        ];
        for (name, value) in values {
            if !(value.is_finite() && value >= 0.0) {
                bail!("status fallback '{name}' must be non-negative, got {value}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub free_flow_speeds: FreeFlowSpeedTable,
    pub status_fallback: StatusIndexTable,
}

impl TrafficConfig {
    /// Loads the config from a JSON file at `path`. Missing sections keep
    /// their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: TrafficConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.free_flow_speeds.validate()?;
        self.status_fallback.validate()
    }
}
