//! Collection of traffic observations for a list of roads.

use crate::analyzers::utility::mean;
use crate::delay::{DelayIndexCalculator, round2};
use crate::observation::{Observation, RoadSegment, TrafficOutcome, TrafficStatus};
use crate::services::traffic_status::TrafficStatusApi;
use crate::speed::FreeFlowSpeedResolver;
use tracing::{Instrument, debug, info, warn};

pub const DEFAULT_FAILURE_MESSAGE: &str = "request failed";

/// Queries a [`TrafficStatusApi`] road by road and turns the responses into
/// [`Observation`]s.
pub struct TrafficSampleCollector<'a, P: ?Sized> {
    provider: &'a P,
    resolver: FreeFlowSpeedResolver<'a>,
    calculator: DelayIndexCalculator<'a>,
}

impl<'a, P: TrafficStatusApi + ?Sized> TrafficSampleCollector<'a, P> {
    pub fn new(
        provider: &'a P,
        resolver: FreeFlowSpeedResolver<'a>,
        calculator: DelayIndexCalculator<'a>,
    ) -> Self {
        Self {
            provider,
            resolver,
            calculator,
        }
    }

    /// Queries each road once, in order, and returns one observation per
    /// returned segment, or one degraded `error` observation for a road
    /// whose query failed.
    pub async fn collect(&self, city: &str, roads: &[String]) -> Vec<Observation> {
        let mut observations = Vec::new();

        for road in roads {
            let span = tracing::info_span!("collect_road", road = %road);
            let outcome = self
                .provider
                .road_status(city, road)
                .instrument(span.clone())
                .await;

            span.in_scope(|| match outcome {
                TrafficOutcome::Success(segments) => {
                    debug!(segments = segments.len(), "Traffic status received");
                    observations.extend(segments.into_iter().map(|s| self.observe_segment(road, s)));
                }
                TrafficOutcome::Failure(message) => {
                    warn!(error = %message, "Traffic status query failed");
                    observations.push(self.degraded(road, message));
                }
            });
        }

        info!(
            roads = roads.len(),
            observations = observations.len(),
            "Collection cycle finished"
        );
        observations
    }

    fn observe_segment(&self, queried_road: &str, segment: RoadSegment) -> Observation {
        let road_name = match segment.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                debug!(queried_road, "Segment has no name, using queried road");
                queried_road.to_string()
            }
        };

        let free_flow_speed = self.resolver.resolve(&road_name);
        let delay_index = self
            .calculator
            .compute(segment.speed, &segment.status, Some(free_flow_speed));

        Observation {
            road_name,
            direction: segment.direction,
            speed: segment.speed,
            status: segment.status,
            description: segment.description,
            delay_index,
            free_flow_speed,
        }
    }

    fn degraded(&self, road: &str, message: String) -> Observation {
        let free_flow_speed = self.resolver.resolve(road);
        let status = TrafficStatus::Error;
        let delay_index = self.calculator.compute(None, &status, Some(free_flow_speed));
        let description = if message.is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };

        Observation {
            road_name: road.to_string(),
            direction: None,
            speed: None,
            status,
            description: Some(description),
            delay_index,
            free_flow_speed,
        }
    }
}

/// Mean delay index over successful observations, rounded to two decimals.
/// Returns 0.0 when there are none.
pub fn average_delay_index(observations: &[Observation]) -> f64 {
    let valid: Vec<f64> = observations
        .iter()
        .filter(|o| !o.status.is_error())
        .map(|o| o.delay_index)
        .collect();

    round2(mean(&valid))
}

/// The `n` most delayed successful observations, highest delay index first.
/// Equal indices are ordered by road name, descending.
pub fn top_delayed(observations: &[Observation], n: usize) -> Vec<&Observation> {
    let mut ranked: Vec<&Observation> = observations
        .iter()
        .filter(|o| !o.status.is_error())
        .collect();
    ranked.sort_by(|a, b| {
        b.delay_index
            .total_cmp(&a.delay_index)
            .then_with(|| b.road_name.cmp(&a.road_name))
    });
    ranked.truncate(n);
    ranked
}
