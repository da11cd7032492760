//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::band::IndexBand;
use crate::quantile::{QuantileLevel, ScenarioOutlook};
use crate::weather::WeatherState;
use serde::{Deserialize, Serialize};

/// Complete RDI report for one (event, quantile) selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioReport {
    pub event: String,
    pub quantile: QuantileLevel,
    pub outlook: ScenarioOutlook,
    /// Looked-up recovery duration T (days)
    pub duration_days: f64,
    /// Compressed duration ln(1 + T)
    pub z: f64,
    pub rdi: f64,
    pub band: IndexBand,
    pub weather: WeatherState,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub comment: String,
}

impl ScenarioReport {
    /// One-line reading of the quantile
    pub fn interpretation(&self) -> String {
        format!(
            "{} of comparable events recovered within {} days ({} scenario)",
            self.quantile.percent_label(),
            format_days(self.duration_days),
            self.outlook.as_str()
        )
    }
}

/// Sort reports deterministically
pub fn sort_reports(mut reports: Vec<ScenarioReport>) -> Vec<ScenarioReport> {
    reports.sort_by(|a, b| {
        // 1. Event name ascending
        a.event
            .cmp(&b.event)
            // 2. Quantile level ascending
            .then_with(|| a.quantile.cmp(&b.quantile))
    });
    reports
}

/// Render reports as a text table
pub fn render_text(reports: &[ScenarioReport]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<8} {:<11} {:<9} {:<8} {:<12} {}\n",
        "RDI", "BAND", "QUANTILE", "DAYS", "WEATHER", "EVENT"
    ));

    for report in reports {
        output.push_str(&format!(
            "{:<8} {:<11} {:<9} {:<8} {:<12} {}\n",
            format!("{:.1}", report.rdi),
            report.band.as_str(),
            report.quantile.percent_label(),
            format_days(report.duration_days),
            report.weather.as_str(),
            truncate_or_pad(&report.event, 40).trim_end(),
        ));
    }

    output
}

/// Render a single report as metric cards followed by its interpretation
pub fn render_summary(report: &ScenarioReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", report.event));
    output.push_str(&format!(
        "  Recovery quantile (days): {}\n",
        format_days(report.duration_days)
    ));
    output.push_str(&format!("  RDI score:                {:.1}\n", report.rdi));
    output.push_str(&format!(
        "  Band:                     {}\n",
        report.band.as_str()
    ));
    output.push_str(&format!("  Weather:                  {}\n", report.weather));
    output.push('\n');
    output.push_str(&format!("  {}\n", report.interpretation()));
    if !report.comment.is_empty() {
        output.push_str(&format!("  {}\n", report.comment));
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[ScenarioReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Whole days print without a fractional part, others in full
fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{:.0}", days)
    } else {
        days.to_string()
    }
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
