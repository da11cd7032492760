//! RDI core library - Recovery Duration Index computation

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is a pure function of (duration, reference range)
// - No global mutable state; configuration is passed explicitly
// - No randomness, clocks, threads, or async
// - Deterministic iteration order must be explicit
// - Identical input yields byte-for-byte identical output

pub mod band;
pub mod config;
pub mod dataset;
pub mod error;
pub mod quantile;
pub mod range;
pub mod rdi;
pub mod report;
pub mod table;
pub mod weather;

pub use band::{assign_band, BandThresholds, IndexBand};
pub use config::ResolvedConfig;
pub use error::{MissingKey, RdiError, Result};
pub use quantile::{QuantileLevel, ScenarioOutlook};
pub use range::ReferenceRange;
pub use rdi::{calculate_rdi, calculate_rdi_in, log_compress};
pub use report::{render_json, render_summary, render_text, sort_reports, ScenarioReport};
pub use table::{EventCase, QuantileTable};
pub use weather::WeatherState;

use band::assign_band_with_thresholds;

/// Evaluate one (event, quantile) selection against the resolved configuration
///
/// Returns the looked-up duration T together with its RDI; fails with
/// `MissingKey` when the event or quantile is absent from the table.
pub fn evaluate(config: &ResolvedConfig, event: &str, level: QuantileLevel) -> Result<ScenarioReport> {
    let case = config.table.event(event)?;
    let days = config.table.lookup(event, level)?;
    let rdi = calculate_rdi_in(days, &config.range)?;

    Ok(ScenarioReport {
        event: event.to_string(),
        quantile: level,
        outlook: level.outlook(),
        duration_days: days,
        z: log_compress(days),
        rdi,
        band: assign_band_with_thresholds(rdi, &config.thresholds),
        weather: case.weather,
        comment: case.comment.clone(),
    })
}

/// Evaluate every quantile level recorded for an event, in ascending level order
pub fn compare_scenarios(config: &ResolvedConfig, event: &str) -> Result<Vec<ScenarioReport>> {
    let case = config.table.event(event)?;
    case.levels()
        .map(|level| evaluate(config, event, level))
        .collect()
}

/// Evaluate every (event, quantile) pair in the table
pub fn evaluate_all(config: &ResolvedConfig) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::new();
    for name in config.table.event_names() {
        reports.extend(compare_scenarios(config, name)?);
    }
    Ok(sort_reports(reports))
}
