//! Quantile table: event -> quantile level -> recovery duration (days)
//!
//! Global invariants enforced:
//! - Tables are immutable once constructed
//! - Every stored duration is finite and non-negative
//! - Iteration order is deterministic (events and levels sorted)

use crate::error::{RdiError, Result};
use crate::quantile::QuantileLevel;
use crate::range::ReferenceRange;
use crate::rdi::validate_duration;
use crate::weather::WeatherState;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One historical downturn and its recovery-duration quantiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventCase {
    pub weather: WeatherState,
    /// Free-text commentary, passed through to presentation untouched
    #[serde(default)]
    pub comment: String,
    #[serde(deserialize_with = "unique_levels")]
    pub durations: BTreeMap<QuantileLevel, f64>,
}

impl EventCase {
    pub fn new(
        weather: WeatherState,
        comment: impl Into<String>,
        durations: impl IntoIterator<Item = (QuantileLevel, f64)>,
    ) -> Result<Self> {
        let mut levels = BTreeMap::new();
        for (level, days) in durations {
            if levels.insert(level, days).is_some() {
                return Err(RdiError::DuplicateQuantile {
                    level: level.to_string(),
                });
            }
        }

        Ok(EventCase {
            weather,
            comment: comment.into(),
            durations: levels,
        })
    }

    /// Quantile levels in ascending order
    pub fn levels(&self) -> impl Iterator<Item = QuantileLevel> + '_ {
        self.durations.keys().copied()
    }
}

/// Deserialize durations, rejecting levels spelled twice (`"0.5"` and `"50%"`)
fn unique_levels<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<QuantileLevel, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LevelsVisitor;

    impl<'de> Visitor<'de> for LevelsVisitor {
        type Value = BTreeMap<QuantileLevel, f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of quantile levels to durations in days")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut durations = BTreeMap::new();
            while let Some((level, days)) = access.next_entry::<QuantileLevel, f64>()? {
                if durations.insert(level, days).is_some() {
                    return Err(de::Error::custom(RdiError::DuplicateQuantile {
                        level: level.to_string(),
                    }));
                }
            }
            Ok(durations)
        }
    }

    deserializer.deserialize_map(LevelsVisitor)
}

/// Immutable table of event cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, EventCase>",
    into = "BTreeMap<String, EventCase>"
)]
pub struct QuantileTable {
    events: BTreeMap<String, EventCase>,
}

impl QuantileTable {
    /// Build a validated table
    pub fn new(events: impl IntoIterator<Item = (String, EventCase)>) -> Result<Self> {
        let events: BTreeMap<String, EventCase> = events.into_iter().collect();

        if events.is_empty() {
            return Err(RdiError::EmptyTable);
        }

        for (name, case) in &events {
            if name.trim().is_empty() {
                return Err(RdiError::BlankEventName);
            }
            if case.durations.is_empty() {
                return Err(RdiError::EmptyTable);
            }
            for &days in case.durations.values() {
                validate_duration(days)?;
            }
        }

        Ok(QuantileTable { events })
    }

    /// Look up the duration for an (event, quantile) selection
    pub fn lookup(&self, event: &str, level: QuantileLevel) -> Result<f64> {
        let case = self.event(event)?;
        case.durations
            .get(&level)
            .copied()
            .ok_or_else(|| RdiError::missing_quantile(event, level))
    }

    pub fn event(&self, name: &str) -> Result<&EventCase> {
        self.events
            .get(name)
            .ok_or_else(|| RdiError::missing_event(name))
    }

    /// Events sorted by name
    pub fn events(&self) -> impl Iterator<Item = (&str, &EventCase)> {
        self.events.iter().map(|(name, case)| (name.as_str(), case))
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Every duration across every event and quantile
    pub fn durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.events
            .values()
            .flat_map(|case| case.durations.values().copied())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Derive the global reference range over the whole table
    pub fn reference_range(&self) -> Result<ReferenceRange> {
        ReferenceRange::from_durations(self.durations())
    }
}

impl TryFrom<BTreeMap<String, EventCase>> for QuantileTable {
    type Error = RdiError;

    fn try_from(events: BTreeMap<String, EventCase>) -> Result<Self> {
        QuantileTable::new(events)
    }
}

impl From<QuantileTable> for BTreeMap<String, EventCase> {
    fn from(table: QuantileTable) -> Self {
        table.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdi::log_compress;

    fn q(v: f64) -> QuantileLevel {
        QuantileLevel::new(v).unwrap()
    }

    fn sample_table() -> QuantileTable {
        QuantileTable::new([
            (
                "alpha".to_string(),
                EventCase::new(
                    WeatherState::Storm,
                    "slow",
                    [(q(0.2), 100.0), (q(0.8), 400.0)],
                )
                .unwrap(),
            ),
            (
                "beta".to_string(),
                EventCase::new(WeatherState::Cloudy, "fast", [(q(0.5), 10.0)]).unwrap(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let table = sample_table();
        assert_eq!(table.lookup("alpha", q(0.8)).unwrap(), 400.0);
        assert_eq!(table.lookup("beta", q(0.5)).unwrap(), 10.0);
    }

    #[test]
    fn test_lookup_missing_event() {
        let table = sample_table();
        let err = table.lookup("gamma", q(0.5)).unwrap_err();
        assert!(err.is_missing_key());
        assert_eq!(err.to_string(), "event 'gamma' not found");
    }

    #[test]
    fn test_lookup_missing_quantile() {
        let table = sample_table();
        let err = table.lookup("beta", q(0.8)).unwrap_err();
        assert!(err.is_missing_key());
        assert_eq!(err.to_string(), "quantile 0.8 not found for event 'beta'");
    }

    #[test]
    fn test_range_spans_all_events() {
        let range = sample_table().reference_range().unwrap();
        assert_eq!(range.z_min(), log_compress(10.0));
        assert_eq!(range.z_max(), log_compress(400.0));
    }

    #[test]
    fn test_events_sorted() {
        let table = sample_table();
        let names: Vec<_> = table.event_names().collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = QuantileTable::new(Vec::<(String, EventCase)>::new());
        assert_eq!(result, Err(RdiError::EmptyTable));
    }

    #[test]
    fn test_event_without_durations_rejected() {
        let result = QuantileTable::new([(
            "alpha".to_string(),
            EventCase::new(WeatherState::Clear, "", Vec::<(QuantileLevel, f64)>::new()).unwrap(),
        )]);
        assert_eq!(result, Err(RdiError::EmptyTable));
    }

    #[test]
    fn test_blank_event_name_rejected() {
        let result = QuantileTable::new([(
            "  ".to_string(),
            EventCase::new(WeatherState::Clear, "", [(q(0.5), 3.0)]).unwrap(),
        )]);
        assert_eq!(result, Err(RdiError::BlankEventName));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = QuantileTable::new([(
            "alpha".to_string(),
            EventCase::new(WeatherState::Clear, "", [(q(0.5), -3.0)]).unwrap(),
        )]);
        assert_eq!(result, Err(RdiError::InvalidDuration { days: -3.0 }));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{
            "alpha": {"weather": "storm", "durations": {"0.5": -1}}
        }"#;
        assert!(serde_json::from_str::<QuantileTable>(json).is_err());

        let json = r#"{
            "alpha": {"weather": "storm", "comment": "ok", "durations": {"0.5": 12}}
        }"#;
        let table: QuantileTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.lookup("alpha", q(0.5)).unwrap(), 12.0);
        assert_eq!(table.event("alpha").unwrap().comment, "ok");
    }

    #[test]
    fn test_deserialize_rejects_unknown_case_fields() {
        let json = r#"{
            "alpha": {"weather": "storm", "durations": {"0.5": 12}, "color": "red"}
        }"#;
        assert!(serde_json::from_str::<QuantileTable>(json).is_err());
    }

    #[test]
    fn test_duplicate_level_rejected() {
        let result = EventCase::new(
            WeatherState::Storm,
            "",
            [(q(0.5), 10.0), (q(0.2), 5.0), (q(0.5), 999.0)],
        );
        assert_eq!(
            result,
            Err(RdiError::DuplicateQuantile {
                level: "0.5".to_string()
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_same_level_spelled_twice() {
        for json in [
            r#"{"a": {"weather": "storm", "durations": {"0.5": 10, "50%": 999, "0.2": 5}}}"#,
            r#"{"a": {"weather": "storm", "durations": {"0.5": 10, "0.50": 999}}}"#,
        ] {
            let err = serde_json::from_str::<QuantileTable>(json).unwrap_err();
            assert!(err.to_string().contains("listed more than once"), "{}", err);
        }
    }
}
