//! Configuration file support for RDI
//!
//! Loads the quantile table and index settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.rdirc.json` in the working directory
//! 3. `rdi.config.json` in the working directory
//!
//! All fields are optional. Without `cases` the built-in reference dataset is
//! used. The resolved configuration is built once and read-only afterwards.

use crate::band::BandThresholds;
use crate::dataset;
use crate::quantile::QuantileLevel;
use crate::range::ReferenceRange;
use crate::table::QuantileTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// RDI configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RdiConfig {
    /// Event cases replacing the built-in reference dataset
    #[serde(default)]
    pub cases: Option<QuantileTable>,

    /// Custom index band thresholds
    #[serde(default)]
    pub bands: Option<BandConfig>,

    /// Quantile level used when none is given on the command line (default: 0.5)
    #[serde(default)]
    pub default_quantile: Option<QuantileLevel>,
}

/// Custom index band thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandConfig {
    /// RDI threshold for the strained band (default: 25.0)
    pub strained: Option<f64>,
    /// RDI threshold for the recovering band (default: 50.0)
    pub recovering: Option<f64>,
    /// RDI threshold for the resilient band (default: 75.0)
    pub resilient: Option<f64>,
}

/// Resolved configuration: table plus its derived reference range
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub table: QuantileTable,
    /// Global reference range over every duration in `table`
    pub range: ReferenceRange,
    pub thresholds: BandThresholds,
    pub default_quantile: QuantileLevel,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl BandConfig {
    fn thresholds(&self) -> BandThresholds {
        let defaults = BandThresholds::default();
        BandThresholds {
            strained: self.strained.unwrap_or(defaults.strained),
            recovering: self.recovering.unwrap_or(defaults.recovering),
            resilient: self.resilient.unwrap_or(defaults.resilient),
        }
    }
}

impl RdiConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        // Validate band thresholds are inside the index and ordered
        if let Some(ref b) = self.bands {
            let t = b.thresholds();

            for (name, val) in [
                ("strained", t.strained),
                ("recovering", t.recovering),
                ("resilient", t.resilient),
            ] {
                if !(val > 0.0 && val < 100.0) {
                    anyhow::bail!("bands.{} must be between 0 and 100 (got {})", name, val);
                }
            }
            if t.strained >= t.recovering {
                anyhow::bail!(
                    "bands.strained ({}) must be less than bands.recovering ({})",
                    t.strained,
                    t.recovering
                );
            }
            if t.recovering >= t.resilient {
                anyhow::bail!(
                    "bands.recovering ({}) must be less than bands.resilient ({})",
                    t.recovering,
                    t.resilient
                );
            }
        }

        // The reference range must be defined for the supplied table
        if let Some(ref table) = self.cases {
            table
                .reference_range()
                .context("cases do not define a usable reference range")?;
        }

        // Scoring without an explicit level must work for every event
        let level = self.default_quantile.unwrap_or(QuantileLevel::P50);
        let builtin;
        let table = match &self.cases {
            Some(table) => table,
            None => {
                builtin = dataset::reference_table().context("built-in dataset is invalid")?;
                &builtin
            }
        };
        for (name, case) in table.events() {
            if !case.durations.contains_key(&level) {
                anyhow::bail!(
                    "event '{}' has no duration for default_quantile {}",
                    name,
                    level
                );
            }
        }

        Ok(())
    }

    /// Resolve config into the read-only form used for scoring
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let table = match &self.cases {
            Some(table) => table.clone(),
            None => dataset::reference_table().context("built-in dataset is invalid")?,
        };
        let range = table
            .reference_range()
            .context("failed to derive reference range")?;

        let thresholds = match &self.bands {
            Some(b) => b.thresholds(),
            None => BandThresholds::default(),
        };

        tracing::debug!(
            events = table.len(),
            z_min = range.z_min(),
            z_max = range.z_max(),
            "resolved configuration"
        );

        Ok(ResolvedConfig {
            table,
            range,
            thresholds,
            default_quantile: self.default_quantile.unwrap_or(QuantileLevel::P50),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        RdiConfig::default().resolve()
    }
}

/// Discover and load a config file from a directory
///
/// Search order:
/// 1. `.rdirc.json`
/// 2. `rdi.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(RdiConfig, PathBuf)>> {
    for name in [".rdirc.json", "rdi.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<RdiConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: RdiConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (RdiConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
