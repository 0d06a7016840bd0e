//! Color key and day-paint model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Month identifiers in calendar order, as used by the macro view.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Day-of-month to color token for one month.
pub type MonthDayColors = BTreeMap<u32, String>;

/// Month identifier to per-day color tokens.
///
/// Serialized as `{ "Jan": { "5": "#9333ea" } }`.
pub type DayColorMap = BTreeMap<String, MonthDayColors>;

/// Named color entry in the color key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDefinition {
    pub name: String,
    /// CSS color token or hex string.
    pub color: String,
}

impl ColorDefinition {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Built-in palette every color key starts with.
pub fn preset_colors() -> Vec<ColorDefinition> {
    vec![
        ColorDefinition::new("Purple", "#9333ea"),
        ColorDefinition::new("Blue", "#2563eb"),
    ]
}

/// Position of `month` in calendar order, or `None` for unknown ids.
pub fn month_index(month: &str) -> Option<usize> {
    MONTHS.iter().position(|candidate| *candidate == month)
}

/// Day count the month grid renders for `month`; February always has 28.
pub fn days_in_month(month: &str) -> Option<u32> {
    const LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    month_index(month).map(|index| LENGTHS[index])
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, month_index, preset_colors, DayColorMap, MONTHS};

    #[test]
    fn presets_start_with_purple_and_blue() {
        let names = preset_colors()
            .into_iter()
            .map(|def| def.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Purple", "Blue"]);
    }

    #[test]
    fn month_index_follows_calendar_order() {
        assert_eq!(month_index("Jan"), Some(0));
        assert_eq!(month_index("Dec"), Some(11));
        assert_eq!(month_index("jan"), None);
    }

    #[test]
    fn month_grid_lengths_match_calendar() {
        assert_eq!(days_in_month("Feb"), Some(28));
        assert_eq!(days_in_month("Apr"), Some(30));
        assert_eq!(days_in_month("Smarch"), None);
        let total = MONTHS
            .iter()
            .filter_map(|month| days_in_month(month))
            .inspect(|days| assert!(*days <= 31))
            .sum::<u32>();
        assert_eq!(total, 365);
    }

    #[test]
    fn day_color_map_uses_string_day_keys_on_the_wire() {
        let mut map = DayColorMap::new();
        map.entry("Jan".to_string())
            .or_default()
            .insert(5, "red".to_string());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Jan":{"5":"red"}}"#);

        let decoded: DayColorMap = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, map);
    }
}
