use serde::Serializer;
use std::cmp::Ordering;

use crate::delay::round2;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Ranking order for aggregates: higher total first, then higher key first.
///
/// Sorting by the full `(total, key)` pair keeps the output independent of
/// input order when totals tie.
pub fn rank_descending<K: Ord>(a_total: f64, a_key: &K, b_total: f64, b_key: &K) -> Ordering {
    b_total.total_cmp(&a_total).then_with(|| b_key.cmp(a_key))
}

/// Serializes a delay-index sum rounded to two decimals.
pub fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}
