//! Free-flow speed resolution by road name.

use crate::config::FreeFlowSpeedTable;

/// Road-class keywords and the class name they map to, checked in order.
///
/// Matching is by substring, so the more specific keywords must come before
/// the generic ones ("路" and "街" appear in most road names).
static ROAD_CLASS_KEYWORDS: &[(&str, &str)] = &[
    ("高速", "高速公路"),
    ("快速", "快速路"),
    ("高架", "高架路"),
    ("大道", "主干道"),
    ("路", "主干道"),
    ("街", "主干道"),
];

/// Maps a road name to the speed expected on it without congestion.
pub struct FreeFlowSpeedResolver<'a> {
    table: &'a FreeFlowSpeedTable,
}

impl<'a> FreeFlowSpeedResolver<'a> {
    pub fn new(table: &'a FreeFlowSpeedTable) -> Self {
        Self { table }
    }

    /// Resolves the free-flow speed (km/h) for `road_name`.
    ///
    /// The first match wins:
    /// 1. a configured override whose pattern is a substring of the name,
    ///    in declared order;
    /// 2. the class of the first matching road-class keyword, looked up in
    ///    the table (or the default when the class has no entry);
    /// 3. the table default.
    pub fn resolve(&self, road_name: &str) -> f64 {
        if let Some(o) = self
            .table
            .overrides
            .iter()
            .find(|o| road_name.contains(o.pattern.as_str()))
        {
            return o.speed;
        }

        ROAD_CLASS_KEYWORDS
            .iter()
            .find(|(keyword, _)| road_name.contains(keyword))
            .map(|(_, class)| self.table.get(class).unwrap_or(self.table.default_speed))
            .unwrap_or(self.table.default_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedOverride;

    fn table() -> FreeFlowSpeedTable {
        FreeFlowSpeedTable::default()
    }

    #[test]
    fn test_override_wins_over_class_keyword() {
        let table = table();
        let resolver = FreeFlowSpeedResolver::new(&table);
        // "三环路" contains the generic "路" keyword but is overridden.
        assert_eq!(resolver.resolve("福州三环路"), 80.0);
        assert_eq!(resolver.resolve("福州绕城高速"), 100.0);
    }

    #[test]
    fn test_override_scan_uses_declared_order() {
        let table = FreeFlowSpeedTable {
            overrides: vec![SpeedOverride::new("江滨", 55.0), SpeedOverride::new("江滨西", 65.0)],
            default_speed: 40.0,
        };
        let resolver = FreeFlowSpeedResolver::new(&table);
        assert_eq!(resolver.resolve("江滨西大道"), 55.0);
    }

    #[test]
    fn test_class_inference() {
        let table = table();
        let resolver = FreeFlowSpeedResolver::new(&table);
        assert_eq!(resolver.resolve("沈海高速"), 100.0);
        assert_eq!(resolver.resolve("南江滨快速通道"), 80.0);
        assert_eq!(resolver.resolve("杨桥高架"), 70.0);
        assert_eq!(resolver.resolve("闽江大道"), 50.0);
        assert_eq!(resolver.resolve("五四路"), 50.0);
        assert_eq!(resolver.resolve("三坊七巷南后街"), 50.0);
    }

    #[test]
    fn test_specific_keyword_precedes_generic() {
        let table = table();
        let resolver = FreeFlowSpeedResolver::new(&table);
        // Contains both "高架" and "路"; the elevated class must win.
        assert_eq!(resolver.resolve("二环高架路段"), 70.0);
    }

    #[test]
    fn test_class_without_entry_falls_back_to_default() {
        let table = FreeFlowSpeedTable {
            overrides: vec![],
            default_speed: 35.0,
        };
        let resolver = FreeFlowSpeedResolver::new(&table);
        assert_eq!(resolver.resolve("五四路"), 35.0);
    }

    #[test]
    fn test_unmatched_name_uses_default() {
        let table = table();
        let resolver = FreeFlowSpeedResolver::new(&table);
        assert_eq!(resolver.resolve("金山隧道"), 40.0);
        assert_eq!(resolver.resolve("x"), 40.0);
    }
}
