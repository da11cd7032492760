//! Reference range derivation
//!
//! The range is global: it spans every duration of every event in the table,
//! so adding an event can move the score of every other event.

use crate::error::{RdiError, Result};
use crate::rdi::{log_compress, validate_duration};
use serde::Serialize;

/// Log-space bounds of the reference population
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRange {
    z_min: f64,
    z_max: f64,
}

impl ReferenceRange {
    /// Build a range from explicit log-space bounds
    ///
    /// Requires finite bounds with `z_max > z_min`.
    pub fn new(z_min: f64, z_max: f64) -> Result<Self> {
        if !z_min.is_finite() || !z_max.is_finite() {
            return Err(RdiError::InvalidRange { z_min, z_max });
        }
        if z_max == z_min {
            return Err(RdiError::DegenerateRange { z: z_min });
        }
        // Finite bounds can still be too far apart to subtract
        if z_max < z_min || !(z_max - z_min).is_finite() {
            return Err(RdiError::InvalidRange { z_min, z_max });
        }
        Ok(ReferenceRange { z_min, z_max })
    }

    /// Derive the range from raw durations (days)
    ///
    /// Z_min = min(ln(1 + T)), Z_max = max(ln(1 + T)) over every duration.
    pub fn from_durations<I>(durations: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut bounds: Option<(f64, f64)> = None;

        for days in durations {
            let z = log_compress(validate_duration(days)?);
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(z), hi.max(z)),
                None => (z, z),
            });
        }

        let (z_min, z_max) = bounds.ok_or(RdiError::EmptyTable)?;
        tracing::debug!(z_min, z_max, "derived reference range");
        ReferenceRange::new(z_min, z_max)
    }

    pub fn z_min(&self) -> f64 {
        self.z_min
    }

    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    /// Width of the range in log space (always positive)
    pub fn span(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Check whether a compressed duration falls inside the reference population
    pub fn contains(&self, z: f64) -> bool {
        z >= self.z_min && z <= self.z_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dataset_bounds() {
        let range =
            ReferenceRange::from_durations([120.0, 198.0, 320.0, 35.0, 63.0, 110.0]).unwrap();
        assert!((range.z_min() - 36f64.ln()).abs() < 1e-12);
        assert!((range.z_max() - 321f64.ln()).abs() < 1e-12);
        assert!((range.z_min() - 3.5835).abs() < 1e-4);
        assert!((range.z_max() - 5.7714).abs() < 1e-4);
    }

    #[test]
    fn test_empty_durations_rejected() {
        let result = ReferenceRange::from_durations(Vec::<f64>::new());
        assert_eq!(result, Err(RdiError::EmptyTable));
    }

    #[test]
    fn test_single_duration_is_degenerate() {
        let result = ReferenceRange::from_durations([42.0]);
        assert!(matches!(result, Err(RdiError::DegenerateRange { .. })));
    }

    #[test]
    fn test_repeated_duration_is_degenerate() {
        let result = ReferenceRange::from_durations([42.0, 42.0, 42.0]);
        assert!(matches!(result, Err(RdiError::DegenerateRange { .. })));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = ReferenceRange::from_durations([10.0, -1.0]);
        assert_eq!(result, Err(RdiError::InvalidDuration { days: -1.0 }));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(matches!(
            ReferenceRange::new(5.0, 3.0),
            Err(RdiError::InvalidRange { .. })
        ));
        assert!(matches!(
            ReferenceRange::new(f64::NAN, 3.0),
            Err(RdiError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_overflowing_span_rejected() {
        assert!(matches!(
            ReferenceRange::new(-1e308, 1e308),
            Err(RdiError::InvalidRange { .. })
        ));
        assert!(ReferenceRange::new(-1e300, 1e300).is_ok());
    }

    #[test]
    fn test_contains() {
        let range = ReferenceRange::new(1.0, 2.0).unwrap();
        assert!(range.contains(1.0));
        assert!(range.contains(1.5));
        assert!(range.contains(2.0));
        assert!(!range.contains(0.5));
        assert_eq!(range.span(), 1.0);
    }
}
