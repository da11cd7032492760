//! Recovery Duration Index (RDI) calculation
//!
//! Global invariants enforced:
//! - Deterministic, side-effect free calculations
//! - Scores always lie within [0, 100]
//! - Score is non-increasing in recovery duration

use crate::error::{RdiError, Result};
use crate::range::ReferenceRange;

/// Lowest possible RDI (slowest recovery, highest risk)
pub const RDI_MIN: f64 = 0.0;

/// Highest possible RDI (fastest recovery, lowest risk)
pub const RDI_MAX: f64 = 100.0;

/// Log-compress a recovery duration: Z = ln(1 + T)
///
/// Both the reference range and the score go through this function so that
/// a duration at either end of the table maps exactly onto the range bounds.
pub fn log_compress(days: f64) -> f64 {
    days.ln_1p()
}

/// Reject negative or non-finite durations
pub fn validate_duration(days: f64) -> Result<f64> {
    if !days.is_finite() || days < 0.0 {
        return Err(RdiError::InvalidDuration { days });
    }
    Ok(days)
}

/// Calculate the RDI for a duration against explicit log-space bounds
///
/// Formula:
/// RDI = clamp(100 * (Z_max - ln(1 + T)) / (Z_max - Z_min), 0, 100)
///
/// Fails with `InvalidDuration` for `T < 0` and `DegenerateRange` when
/// `Z_max == Z_min`.
pub fn calculate_rdi(days: f64, z_min: f64, z_max: f64) -> Result<f64> {
    let days = validate_duration(days)?;
    let range = ReferenceRange::new(z_min, z_max)?;
    Ok(normalize(log_compress(days), &range))
}

/// Calculate the RDI against an already validated reference range
pub fn calculate_rdi_in(days: f64, range: &ReferenceRange) -> Result<f64> {
    let days = validate_duration(days)?;
    Ok(normalize(log_compress(days), range))
}

/// Inverted min-max normalization of a compressed duration, clamped to [0, 100]
fn normalize(z: f64, range: &ReferenceRange) -> f64 {
    // Fraction first: keeps the bounds exact (Z == Z_min gives exactly 100)
    let fraction = (range.z_max() - z) / range.span();
    (RDI_MAX * fraction).clamp(RDI_MIN, RDI_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_bounds() -> (f64, f64) {
        (log_compress(35.0), log_compress(320.0))
    }

    #[test]
    fn test_reference_scenario_median_covid() {
        let (z_min, z_max) = reference_bounds();
        let rdi = calculate_rdi(63.0, z_min, z_max).unwrap();
        assert!((rdi - 73.7).abs() < 0.1, "expected ~73.7, got {}", rdi);
    }

    #[test]
    fn test_maximum_duration_scores_zero() {
        let (z_min, z_max) = reference_bounds();
        assert_eq!(calculate_rdi(320.0, z_min, z_max).unwrap(), 0.0);
    }

    #[test]
    fn test_minimum_duration_scores_hundred() {
        let (z_min, z_max) = reference_bounds();
        assert_eq!(calculate_rdi(35.0, z_min, z_max).unwrap(), 100.0);
    }

    #[test]
    fn test_clamps_outside_reference_population() {
        let (z_min, z_max) = reference_bounds();
        assert_eq!(calculate_rdi(0.0, z_min, z_max).unwrap(), 100.0);
        assert_eq!(calculate_rdi(5000.0, z_min, z_max).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let (z_min, z_max) = reference_bounds();
        assert_eq!(
            calculate_rdi(-5.0, z_min, z_max),
            Err(RdiError::InvalidDuration { days: -5.0 })
        );
    }

    #[test]
    fn test_non_finite_duration_rejected() {
        let (z_min, z_max) = reference_bounds();
        assert!(calculate_rdi(f64::NAN, z_min, z_max).is_err());
        assert!(calculate_rdi(f64::INFINITY, z_min, z_max).is_err());
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let z = log_compress(100.0);
        assert_eq!(
            calculate_rdi(100.0, z, z),
            Err(RdiError::DegenerateRange { z })
        );
    }

    #[test]
    fn test_unrepresentable_span_rejected() {
        assert!(matches!(
            calculate_rdi(0.0, -1e308, 1e308),
            Err(RdiError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_zero_duration_compresses_to_zero() {
        assert_eq!(log_compress(0.0), 0.0);
    }

    #[test]
    fn test_score_decreases_with_duration() {
        let (z_min, z_max) = reference_bounds();
        let fast = calculate_rdi(60.0, z_min, z_max).unwrap();
        let slow = calculate_rdi(200.0, z_min, z_max).unwrap();
        assert!(fast > slow);
    }

    #[test]
    fn test_calculate_rdi_in_matches_explicit_bounds() {
        let (z_min, z_max) = reference_bounds();
        let range = ReferenceRange::new(z_min, z_max).unwrap();
        assert_eq!(
            calculate_rdi_in(110.0, &range).unwrap(),
            calculate_rdi(110.0, z_min, z_max).unwrap()
        );
    }
}
