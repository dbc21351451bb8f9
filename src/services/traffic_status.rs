//! Trait for per-road traffic status lookups.

use crate::observation::TrafficOutcome;

/// Abstraction over a road traffic-status provider (e.g., AMap).
///
/// Implementations never fail at the type level: transport errors,
/// timeouts and provider-side errors are all reported as
/// [`TrafficOutcome::Failure`] so a single bad road cannot abort a
/// collection run.
#[async_trait::async_trait]
pub trait TrafficStatusApi: Send + Sync {
    async fn road_status(&self, city: &str, road_name: &str) -> TrafficOutcome;
}
