//! Index band classification
//!
//! Global invariants enforced:
//! - Band assignment is monotonic in the score

use serde::{Deserialize, Serialize};

/// Index band classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBand {
    Severe,     // < 25
    Strained,   // 25-50
    Recovering, // 50-75
    Resilient,  // >= 75
}

impl IndexBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexBand::Severe => "severe",
            IndexBand::Strained => "strained",
            IndexBand::Recovering => "recovering",
            IndexBand::Resilient => "resilient",
        }
    }
}

/// Configurable band thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandThresholds {
    pub strained: f64,
    pub recovering: f64,
    pub resilient: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        BandThresholds {
            strained: 25.0,
            recovering: 50.0,
            resilient: 75.0,
        }
    }
}

/// Assign band based on RDI with default thresholds
pub fn assign_band(rdi: f64) -> IndexBand {
    assign_band_with_thresholds(rdi, &BandThresholds::default())
}

/// Assign band with custom thresholds
pub fn assign_band_with_thresholds(rdi: f64, thresholds: &BandThresholds) -> IndexBand {
    if rdi < thresholds.strained {
        IndexBand::Severe
    } else if rdi < thresholds.recovering {
        IndexBand::Strained
    } else if rdi < thresholds.resilient {
        IndexBand::Recovering
    } else {
        IndexBand::Resilient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        assert_eq!(assign_band(0.0), IndexBand::Severe);
        assert_eq!(assign_band(24.9), IndexBand::Severe);
        assert_eq!(assign_band(25.0), IndexBand::Strained);
        assert_eq!(assign_band(50.0), IndexBand::Recovering);
        assert_eq!(assign_band(73.7), IndexBand::Recovering);
        assert_eq!(assign_band(75.0), IndexBand::Resilient);
        assert_eq!(assign_band(100.0), IndexBand::Resilient);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = BandThresholds {
            strained: 10.0,
            recovering: 20.0,
            resilient: 90.0,
        };
        assert_eq!(assign_band_with_thresholds(15.0, &thresholds), IndexBand::Strained);
        assert_eq!(assign_band_with_thresholds(80.0, &thresholds), IndexBand::Recovering);
    }

    #[test]
    fn test_bands_order_by_health() {
        assert!(IndexBand::Severe < IndexBand::Strained);
        assert!(IndexBand::Recovering < IndexBand::Resilient);
    }
}
