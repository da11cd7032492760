//! RDI CLI - Recovery Duration Index for historical downturn scenarios

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use rdi_core::config::{self, ResolvedConfig};
use rdi_core::{
    calculate_rdi, calculate_rdi_in, compare_scenarios, evaluate, evaluate_all, log_compress,
    render_json, render_summary, render_text, QuantileLevel, ReferenceRange,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rdi")]
#[command(about = "Recovery Duration Index: score recovery-time quantiles on a 0-100 scale")]
#[command(version = env!("RDI_VERSION"))]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one event at one quantile level
    Score {
        /// Event name (see `rdi events`)
        event: String,

        /// Quantile level, as a fraction (0.5) or percentage (50%)
        /// (default: config file, else 0.5)
        #[arg(long, short)]
        quantile: Option<QuantileLevel>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Score every quantile level of one event, or of all events
    Compare {
        /// Event name (default: every event in the table)
        event: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Score a raw duration against explicit or configured log-space bounds
    Compute {
        /// Recovery duration in days
        #[arg(long, allow_hyphen_values = true)]
        days: f64,

        /// Lower log-space bound ln(1 + T_min) (requires --z-max)
        #[arg(long, requires = "z_max", allow_hyphen_values = true)]
        z_min: Option<f64>,

        /// Upper log-space bound ln(1 + T_max) (requires --z-min)
        #[arg(long, requires = "z_min", allow_hyphen_values = true)]
        z_max: Option<f64>,

        /// Path to config file used when no bounds are given
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the events in the quantile table
    Events {
        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the reference range derived from the whole table
    Range {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scoring anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Score {
            event,
            quantile,
            format,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;
            let level = quantile.unwrap_or(resolved.default_quantile);

            let report = evaluate(&resolved, &event, level)
                .with_context(|| unknown_key_hint(&resolved, &event))?;

            match format {
                OutputFormat::Text => print!("{}", render_summary(&report)),
                OutputFormat::Json => println!("{}", render_json(std::slice::from_ref(&report))),
            }
        }
        Commands::Compare {
            event,
            format,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;

            let reports = match event {
                Some(ref name) => compare_scenarios(&resolved, name)
                    .with_context(|| unknown_key_hint(&resolved, name))?,
                None => evaluate_all(&resolved).context("failed to score table")?,
            };

            match format {
                OutputFormat::Text => print!("{}", render_text(&reports)),
                OutputFormat::Json => println!("{}", render_json(&reports)),
            }
        }
        Commands::Compute {
            days,
            z_min,
            z_max,
            config: config_path,
        } => {
            let rdi = match (z_min, z_max) {
                (Some(lo), Some(hi)) => calculate_rdi(days, lo, hi)?,
                _ => {
                    let resolved = load_config(config_path.as_deref())?;
                    calculate_rdi_in(days, &resolved.range)?
                }
            };

            println!("T = {} days, Z = {:.4}, RDI = {:.1}", days, log_compress(days), rdi);
        }
        Commands::Events {
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;

            for (name, case) in resolved.table.events() {
                let levels = case
                    .levels()
                    .map(|l| l.percent_label())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{} {}", case.weather.icon(), name);
                println!("    {} [{}]", case.weather.description(), levels);
            }
        }
        Commands::Range {
            format,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;
            print_range(&resolved.range, format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let dir = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&dir, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = load_config(path.as_deref())?;
                print_resolved_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Load configuration from an explicit path or the current directory
fn load_config(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let dir = std::env::current_dir()?;
    let resolved =
        config::load_and_resolve(&dir, config_path).context("failed to load configuration")?;

    if let Some(path) = &resolved.config_path {
        tracing::info!("using config: {}", path.display());
    }

    Ok(resolved)
}

/// Context line listing what the table does contain
fn unknown_key_hint(resolved: &ResolvedConfig, event: &str) -> String {
    match resolved.table.event(event) {
        Ok(case) => {
            let levels = case
                .levels()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("failed to score '{}' (available quantiles: {})", event, levels)
        }
        Err(_) => {
            let events = resolved.table.event_names().collect::<Vec<_>>().join(", ");
            format!("failed to score '{}' (available events: {})", event, events)
        }
    }
}

fn print_range(range: &ReferenceRange, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Reference range (log space):");
            println!("  z_min: {:.4} (T = {:.0} days)", range.z_min(), range.z_min().exp_m1());
            println!("  z_max: {:.4} (T = {:.0} days)", range.z_max(), range.z_max().exp_m1());
            println!("  span:  {:.4}", range.span());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(range)
                .context("failed to serialize reference range")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn print_resolved_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Events:");
    for (name, case) in resolved.table.events() {
        let durations = case
            .durations
            .iter()
            .map(|(level, days)| format!("{}={}", level, days))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {} ({}): {}", name, case.weather.as_str(), durations);
    }
    println!();
    println!("Reference range:");
    println!("  z_min: {:.4}", resolved.range.z_min());
    println!("  z_max: {:.4}", resolved.range.z_max());
    println!();
    println!("Bands:");
    println!("  strained: {}", resolved.thresholds.strained);
    println!("  recovering: {}", resolved.thresholds.recovering);
    println!("  resilient: {}", resolved.thresholds.resilient);
    println!();
    println!("Default quantile: {}", resolved.default_quantile);
}
