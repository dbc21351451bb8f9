use chrono::Timelike;
use std::collections::{BTreeMap, HashMap};

use crate::analyzers::types::{HistoryRecord, HourlyAggregate, RoadAggregate};
use crate::analyzers::utility::rank_descending;

/// Sums the delay index of every road over `history`.
///
/// Sorted by total descending; equal totals are ordered by road name
/// descending. Sums are kept at full precision. Records without a delay
/// index add nothing, so a road seen only in such records totals 0.
pub fn total_by_road(history: &[HistoryRecord]) -> Vec<RoadAggregate> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in history {
        *totals.entry(record.road_name.as_str()).or_default() +=
            record.delay_index.unwrap_or_default();
    }

    let mut roads: Vec<RoadAggregate> = totals
        .into_iter()
        .map(|(road_name, delay_index)| RoadAggregate {
            road_name: road_name.to_string(),
            delay_index,
        })
        .collect();
    roads.sort_by(|a, b| rank_descending(a.delay_index, &a.road_name, b.delay_index, &b.road_name));
    roads
}

/// Sums the delay index per hour of day over `history`, in hour order.
///
/// Only hours with at least one record appear. Records without a delay
/// index add nothing.
pub fn total_by_hour(history: &[HistoryRecord]) -> Vec<HourlyAggregate> {
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    for record in history {
        *totals.entry(record.timestamp.hour()).or_default() += record.delay_index.unwrap_or_default();
    }

    totals
        .into_iter()
        .map(|(hour, delay_index)| HourlyAggregate { hour, delay_index })
        .collect()
}

/// Selects the `n` hours with the highest summed delay index.
///
/// Ties go to the later hour, matching [`total_by_road`].
pub fn peak_hours(hourly: &[HourlyAggregate], n: usize) -> Vec<HourlyAggregate> {
    let mut ranked = hourly.to_vec();
    ranked.sort_by(|a, b| rank_descending(a.delay_index, &a.hour, b.delay_index, &b.hour));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(road: &str, hour: u32, delay_index: f64) -> HistoryRecord {
        HistoryRecord {
            timestamp: at(hour, 0),
            road_name: road.to_string(),
            delay_index: Some(delay_index),
        }
    }

    fn scenario() -> Vec<HistoryRecord> {
        vec![record("A", 8, 2.0), record("A", 9, 1.0), record("B", 8, 3.0)]
    }

    #[test]
    fn test_total_by_road_scenario() {
        let roads = total_by_road(&scenario());
        assert_eq!(
            roads,
            vec![
                RoadAggregate { road_name: "B".into(), delay_index: 3.0 },
                RoadAggregate { road_name: "A".into(), delay_index: 3.0 },
            ]
        );
    }

    #[test]
    fn test_total_by_hour_scenario() {
        let hours = total_by_hour(&scenario());
        assert_eq!(
            hours,
            vec![
                HourlyAggregate { hour: 8, delay_index: 5.0 },
                HourlyAggregate { hour: 9, delay_index: 1.0 },
            ]
        );
    }

    #[test]
    fn test_peak_hours_scenario() {
        let hours = total_by_hour(&scenario());
        assert_eq!(peak_hours(&hours, 1), vec![HourlyAggregate { hour: 8, delay_index: 5.0 }]);
    }

    #[test]
    fn test_total_by_road_is_a_partition() {
        let history = vec![
            record("五四路", 7, 1.33),
            record("湖东路", 7, 2.5),
            record("五四路", 18, 1.87),
            record("八一七路", 18, 1.0),
            record("湖东路", 19, 1.11),
        ];
        let roads = total_by_road(&history);
        let total: f64 = roads.iter().map(|r| r.delay_index).sum();
        let expected: f64 = history.iter().filter_map(|r| r.delay_index).sum();
        assert!((total - expected).abs() < 1e-9);
        assert_eq!(roads.len(), 3);
        assert_eq!(roads[0].road_name, "湖东路");
    }

    #[test]
    fn test_tie_break_ignores_input_order() {
        let mut history = scenario();
        history.reverse();
        let names: Vec<_> = total_by_road(&history)
            .into_iter()
            .map(|r| r.road_name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_hour_uses_timestamp_hour_only() {
        let mut late = record("A", 8, 1.0);
        late.timestamp = at(8, 59);
        let history = vec![record("A", 8, 1.0), late, record("A", 23, 0.5)];

        let hours = total_by_hour(&history);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0], HourlyAggregate { hour: 8, delay_index: 2.0 });
        assert_eq!(hours[1].hour, 23);
    }

    #[test]
    fn test_missing_delay_index_counts_as_zero() {
        let mut blank = record("C", 10, 0.0);
        blank.delay_index = None;
        let history = vec![record("A", 8, 1.0), blank];

        assert_eq!(
            total_by_road(&history),
            vec![
                RoadAggregate { road_name: "A".into(), delay_index: 1.0 },
                RoadAggregate { road_name: "C".into(), delay_index: 0.0 },
            ]
        );
        assert_eq!(
            total_by_hour(&history),
            vec![
                HourlyAggregate { hour: 8, delay_index: 1.0 },
                HourlyAggregate { hour: 10, delay_index: 0.0 },
            ]
        );
    }

    #[test]
    fn test_peak_hours_count_and_order() {
        let hourly = vec![
            HourlyAggregate { hour: 7, delay_index: 4.0 },
            HourlyAggregate { hour: 8, delay_index: 9.5 },
            HourlyAggregate { hour: 17, delay_index: 4.0 },
            HourlyAggregate { hour: 18, delay_index: 8.0 },
        ];
        let peaks = peak_hours(&hourly, 3);
        let hours: Vec<_> = peaks.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![8, 18, 17]);
        assert!(peaks.iter().all(|p| hourly.contains(p)));

        assert_eq!(peak_hours(&hourly, 10).len(), 4);
        assert!(peak_hours(&hourly, 0).is_empty());
        assert!(peak_hours(&[], 3).is_empty());
    }

    #[test]
    fn test_empty_history() {
        assert!(total_by_road(&[]).is_empty());
        assert!(total_by_hour(&[]).is_empty());
    }
}
