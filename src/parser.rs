//! Parsers for AMap web-service JSON payloads.
//!
//! AMap encodes most scalars as strings and uses an empty array (`[]`) in
//! place of a missing value, so every field is read leniently.

use serde_json::Value;

use crate::observation::{RoadSegment, TrafficOutcome, TrafficStatus};
use crate::services::road_catalog::PoiPage;

const SUCCESS_STATUS: &str = "1";

/// Reads a scalar as text. Empty strings, arrays and nulls are absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a scalar as a number, accepting numeric strings.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn is_success(payload: &Value) -> bool {
    text(&payload["status"]).as_deref() == Some(SUCCESS_STATUS)
}

/// Decodes a place-search (`/v3/place/text`) response.
pub fn parse_poi_page(payload: &Value) -> PoiPage {
    let names: Vec<String> = payload["pois"]
        .as_array()
        .map(|pois| pois.iter().filter_map(|poi| text(&poi["name"])).collect())
        .unwrap_or_default();

    PoiPage {
        ok: is_success(payload),
        info: text(&payload["info"]),
        names,
    }
}

/// Decodes a road traffic-status (`/v3/traffic/status/road`) response.
///
/// A success response without `trafficinfo.roads` yields no segments.
pub fn parse_traffic_response(payload: &Value) -> TrafficOutcome {
    if !is_success(payload) {
        return TrafficOutcome::Failure(text(&payload["info"]).unwrap_or_default());
    }

    let segments: Vec<RoadSegment> = payload["trafficinfo"]["roads"]
        .as_array()
        .map(|roads| roads.iter().map(parse_segment).collect())
        .unwrap_or_default();

    TrafficOutcome::Success(segments)
}

fn parse_segment(road: &Value) -> RoadSegment {
    RoadSegment {
        name: text(&road["name"]),
        direction: text(&road["direction"]),
        speed: number(&road["speed"]),
        status: text(&road["status"])
            .map(|s| TrafficStatus::from_code(&s))
            .unwrap_or(TrafficStatus::Unknown),
        description: text(&road["description"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_poi_page() {
        let payload = json!({
            "status": "1",
            "info": "OK",
            "pois": [{"name": "五四路"}, {"name": []}, {"id": "B0FFF"}, {"name": "湖东路"}]
        });
        let page = parse_poi_page(&payload);
        assert!(page.ok);
        assert_eq!(page.info.as_deref(), Some("OK"));
        assert_eq!(page.names, vec!["五四路", "湖东路"]);
    }

    #[test]
    fn test_parse_poi_page_failure() {
        let payload = json!({"status": "0", "info": "INVALID_USER_KEY"});
        let page = parse_poi_page(&payload);
        assert!(!page.ok);
        assert!(page.names.is_empty());
    }

    #[test]
    fn test_parse_traffic_success() {
        let payload = json!({
            "status": "1",
            "info": "OK",
            "trafficinfo": {
                "roads": [
                    {"name": "五四路", "status": "2", "direction": "从北到南", "speed": "18"},
                    {"name": "五四路", "status": "1", "direction": [], "speed": 42.5},
                    {"status": "0", "speed": []}
                ]
            }
        });

        let TrafficOutcome::Success(segments) = parse_traffic_response(&payload) else {
            panic!("expected success");
        };
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].speed, Some(18.0));
        assert_eq!(segments[0].status, TrafficStatus::Slow);
        assert_eq!(segments[0].direction.as_deref(), Some("从北到南"));
        assert_eq!(segments[1].speed, Some(42.5));
        assert_eq!(segments[1].direction, None);
        assert_eq!(segments[2].name, None);
        assert_eq!(segments[2].speed, None);
        assert_eq!(segments[2].status, TrafficStatus::Unknown);
    }

    #[test]
    fn test_parse_traffic_without_roads() {
        let payload = json!({"status": "1", "info": "OK", "trafficinfo": []});
        assert_eq!(parse_traffic_response(&payload), TrafficOutcome::Success(vec![]));
    }

    #[test]
    fn test_parse_traffic_failure() {
        let payload = json!({"status": "0", "info": "DAILY_QUERY_OVER_LIMIT"});
        assert_eq!(
            parse_traffic_response(&payload),
            TrafficOutcome::Failure("DAILY_QUERY_OVER_LIMIT".to_string())
        );
    }

    #[test]
    fn test_numeric_status_field() {
        let payload = json!({"status": 1, "trafficinfo": {"roads": []}});
        assert_eq!(parse_traffic_response(&payload), TrafficOutcome::Success(vec![]));
    }
}
