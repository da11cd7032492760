//! Quantile levels and scenario outlooks
//!
//! A quantile level `q` reads as "a fraction `q` of comparable events
//! recovered within T days". Levels are serialized as strings so they can key
//! JSON objects (`{"0.5": 198}`).

use crate::error::{RdiError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Probability threshold strictly inside (0, 1)
#[derive(Debug, Clone, Copy)]
pub struct QuantileLevel(f64);

impl QuantileLevel {
    /// 20% quantile (optimistic scenario)
    pub const P20: QuantileLevel = QuantileLevel(0.2);
    /// Median (baseline scenario)
    pub const P50: QuantileLevel = QuantileLevel(0.5);
    /// 80% quantile (conservative scenario)
    pub const P80: QuantileLevel = QuantileLevel(0.8);

    /// The standard scenario levels, in ascending order
    pub const STANDARD: [QuantileLevel; 3] = [Self::P20, Self::P50, Self::P80];

    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 || value >= 1.0 {
            return Err(RdiError::InvalidQuantile {
                value: value.to_string(),
            });
        }
        Ok(QuantileLevel(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Level as a percentage label (0.2 -> "20%", 0.204 -> "20.4%")
    ///
    /// Moves the decimal point in the level's text instead of multiplying,
    /// so distinct levels never share a label.
    pub fn percent_label(&self) -> String {
        let text = self.0.to_string();
        let Some(digits) = text.strip_prefix("0.") else {
            return text;
        };

        let (whole, fraction) = digits.split_at(digits.len().min(2));
        let whole = format!("{:0<2}", whole);
        let whole = match whole.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };

        if fraction.is_empty() {
            format!("{}%", whole)
        } else {
            format!("{}.{}%", whole, fraction)
        }
    }

    pub fn outlook(&self) -> ScenarioOutlook {
        ScenarioOutlook::for_level(*self)
    }
}

// Construction rejects NaN, so bitwise equality is a total equivalence.
impl PartialEq for QuantileLevel {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for QuantileLevel {}

impl Hash for QuantileLevel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for QuantileLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QuantileLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for QuantileLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts fractions (`0.5`) and percentages (`50%`)
impl FromStr for QuantileLevel {
    type Err = RdiError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || RdiError::InvalidQuantile {
            value: s.to_string(),
        };

        let value = match trimmed.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f64>().map_err(|_| invalid())? / 100.0,
            None => trimmed.parse::<f64>().map_err(|_| invalid())?,
        };

        QuantileLevel::new(value).map_err(|_| invalid())
    }
}

impl Serialize for QuantileLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuantileLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(QuantileLevelVisitor)
    }
}

struct QuantileLevelVisitor;

impl<'de> Visitor<'de> for QuantileLevelVisitor {
    type Value = QuantileLevel;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a quantile level between 0 and 1, e.g. \"0.5\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        QuantileLevel::new(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        QuantileLevel::new(v as f64).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        QuantileLevel::new(v as f64).map_err(E::custom)
    }
}

/// How a scenario reads relative to the median
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioOutlook {
    Optimistic,   // below the median
    Baseline,     // the median
    Conservative, // above the median
}

impl ScenarioOutlook {
    pub fn for_level(level: QuantileLevel) -> Self {
        match level.value().total_cmp(&0.5) {
            Ordering::Less => ScenarioOutlook::Optimistic,
            Ordering::Equal => ScenarioOutlook::Baseline,
            Ordering::Greater => ScenarioOutlook::Conservative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioOutlook::Optimistic => "optimistic",
            ScenarioOutlook::Baseline => "baseline",
            ScenarioOutlook::Conservative => "conservative",
        }
    }
}
