//! Delay index computation.

use crate::config::StatusIndexTable;
use crate::observation::TrafficStatus;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Converts a speed/status reading into a delay index.
pub struct DelayIndexCalculator<'a> {
    fallback: &'a StatusIndexTable,
}

impl<'a> DelayIndexCalculator<'a> {
    pub fn new(fallback: &'a StatusIndexTable) -> Self {
        Self { fallback }
    }

    /// Computes `free_flow_speed / speed` rounded to two decimals.
    ///
    /// A missing, zero or negative speed (or free-flow speed) switches to the
    /// status fallback table instead. The ratio is not clamped: readings
    /// faster than free flow give values below 1.0.
    pub fn compute(
        &self,
        speed: Option<f64>,
        status: &TrafficStatus,
        free_flow_speed: Option<f64>,
    ) -> f64 {
        match (usable(speed), usable(free_flow_speed)) {
            (Some(speed), Some(free_flow)) => round2(free_flow / speed),
            _ => self.status_index(status),
        }
    }

    pub fn status_index(&self, status: &TrafficStatus) -> f64 {
        let t = self.fallback;
        match status {
            TrafficStatus::Unknown => t.unknown,
            TrafficStatus::Clear => t.clear,
            TrafficStatus::Slow => t.slow,
            TrafficStatus::Congested => t.congested,
            TrafficStatus::SeverelyCongested => t.severely_congested,
            TrafficStatus::Error => t.error,
            TrafficStatus::Other(_) => t.unmapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_speed_absent() {
        let table = StatusIndexTable::default();
        let calc = DelayIndexCalculator::new(&table);
        assert_eq!(calc.compute(None, &TrafficStatus::Congested, Some(60.0)), 2.0);
        assert_eq!(calc.compute(None, &TrafficStatus::Slow, Some(60.0)), 1.5);
        assert_eq!(calc.compute(None, &TrafficStatus::SeverelyCongested, Some(60.0)), 2.5);
        assert_eq!(calc.compute(None, &TrafficStatus::Error, Some(60.0)), 1.0);
        assert_eq!(calc.compute(None, &TrafficStatus::Error, Some(1.0)), 1.0);
        assert_eq!(calc.compute(None, &TrafficStatus::Other("9".into()), Some(60.0)), 1.0);
    }

    #[test]
    fn test_speed_ratio() {
        let table = StatusIndexTable::default();
        let calc = DelayIndexCalculator::new(&table);
        assert_eq!(calc.compute(Some(30.0), &TrafficStatus::Clear, Some(60.0)), 2.0);
        assert_eq!(calc.compute(Some(60.0), &TrafficStatus::Clear, Some(60.0)), 1.0);
        assert_eq!(calc.compute(Some(35.0), &TrafficStatus::Clear, Some(50.0)), 1.43);
    }

    #[test]
    fn test_faster_than_free_flow_is_kept() {
        let table = StatusIndexTable::default();
        let calc = DelayIndexCalculator::new(&table);
        assert_eq!(calc.compute(Some(80.0), &TrafficStatus::Clear, Some(40.0)), 0.5);
    }

    #[test]
    fn test_zero_speed_is_treated_as_absent() {
        let table = StatusIndexTable::default();
        let calc = DelayIndexCalculator::new(&table);
        assert_eq!(calc.compute(Some(0.0), &TrafficStatus::Congested, Some(60.0)), 2.0);
        assert_eq!(calc.compute(Some(30.0), &TrafficStatus::Slow, Some(0.0)), 1.5);
        assert_eq!(calc.compute(Some(30.0), &TrafficStatus::Slow, None), 1.5);
    }

    #[test]
    fn test_custom_fallback_table() {
        let table = StatusIndexTable {
            congested: 3.0,
            ..Default::default()
        };
        let calc = DelayIndexCalculator::new(&table);
        assert_eq!(calc.compute(None, &TrafficStatus::Congested, Some(60.0)), 3.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(3.0), 3.0);
    }
}
