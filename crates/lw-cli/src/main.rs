use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use lw_core::{
    BindReport, CorrelationConfig, HistoryWindow, Layer, LayerFilter, NowPointer, SliceMatch,
    SliceSet, TimeSlice, WireDocument, ZoomLevel, to_json_pretty,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "lw", about = "Radial time slicing and recurring-moment correlation")]
struct Cli {
    /// Pin the present instant (RFC 3339) instead of reading the clock
    #[arg(long, global = true)]
    now: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slice wheel for a focus date and zoom level
    Slices {
        /// hour, day, week, month or year (unknown names fall back to month)
        #[arg(long, default_value = "month")]
        zoom: String,

        /// Focus instant (RFC 3339); defaults to now
        #[arg(long)]
        focus: Option<String>,
    },

    /// Print the now-pointer angle for a zoom level
    Now {
        #[arg(long, default_value = "month")]
        zoom: String,
    },

    /// Bind a sample document onto its wheel and print the slices
    Bind {
        /// JSON document with focus, zoom and per-layer samples
        path: PathBuf,
    },

    /// Bind a sample document and print ranked recurring slices
    Correlate {
        /// JSON document with focus, zoom and per-layer samples
        path: PathBuf,

        /// TOML or JSON correlation config (falls back to $LW_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Minimum similarity, inclusive
        #[arg(long)]
        threshold: Option<f64>,

        /// mood, sleep, mobility or all
        #[arg(long)]
        layer: Option<String>,

        /// weeks, months or all
        #[arg(long)]
        window: Option<String>,

        /// Maximum days between matched slices, inclusive
        #[arg(long)]
        max_distance_days: Option<f64>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = match &cli.now {
        Some(s) => parse_instant(s).context("invalid --now")?,
        None => Utc::now(),
    };

    match &cli.command {
        Commands::Slices { zoom, focus } => cmd_slices(zoom, focus.as_deref(), now),
        Commands::Now { zoom } => cmd_now(zoom, now),
        Commands::Bind { path } => cmd_bind(path, now),
        Commands::Correlate {
            path,
            config,
            threshold,
            layer,
            window,
            max_distance_days,
        } => {
            let overrides = Overrides {
                threshold: *threshold,
                layer: layer.as_deref(),
                window: window.as_deref(),
                max_distance_days: *max_distance_days,
            };
            cmd_correlate(path, config.as_deref(), &overrides, now)
        }
    }
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(s.trim())
        .with_context(|| format!("'{s}' is not an RFC 3339 timestamp"))?;
    Ok(dt.with_timezone(&Utc))
}

fn read_document(path: &Path) -> Result<WireDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    WireDocument::from_json(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = to_json_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn cmd_slices(zoom: &str, focus: Option<&str>, now: DateTime<Utc>) -> Result<()> {
    let focus = match focus {
        Some(s) => parse_instant(s).context("invalid --focus")?,
        None => now,
    };
    let set = SliceSet::generate_at(focus, ZoomLevel::from_name(zoom), now);
    print_json(&set)
}

fn cmd_now(zoom: &str, now: DateTime<Utc>) -> Result<()> {
    print_json(&NowPointer::compute_at(ZoomLevel::from_name(zoom), now))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BindOutput<'a> {
    zoom: ZoomLevel,
    slices: &'a [TimeSlice],
    reports: BTreeMap<Layer, BindReport>,
}

fn cmd_bind(path: &Path, now: DateTime<Utc>) -> Result<()> {
    let doc = read_document(path)?;
    let (timeline, reports) = doc.into_timeline_at(now);
    log_drops(&reports);
    print_json(&BindOutput {
        zoom: timeline.zoom(),
        slices: timeline.slices(),
        reports,
    })
}

fn log_drops(reports: &BTreeMap<Layer, BindReport>) {
    for (layer, report) in reports {
        if report.dropped() > 0 {
            tracing::info!(
                "{layer}: bound {}, unmatched {}, unparsable {}",
                report.bound,
                report.unmatched,
                report.unparsable
            );
        }
    }
}

/// Flag-level config overrides, applied last.
struct Overrides<'a> {
    threshold: Option<f64>,
    layer: Option<&'a str>,
    window: Option<&'a str>,
    max_distance_days: Option<f64>,
}

/// Defaults < document `correlation` < config file < flags. A config file
/// replaces the document's block wholesale rather than merging into it.
fn resolve_config(
    doc: &WireDocument,
    file: Option<&Path>,
    overrides: &Overrides<'_>,
) -> Result<CorrelationConfig> {
    let env_file = std::env::var("LW_CONFIG").ok().map(PathBuf::from);
    let file = file.map(Path::to_path_buf).or(env_file);

    let mut config = match file {
        Some(path) => load_config_file(&path)?,
        None => doc.correlation.clone().unwrap_or_default(),
    };

    if let Some(t) = overrides.threshold {
        config.match_threshold = t;
    }
    if let Some(name) = overrides.layer {
        let Some(filter) = LayerFilter::from_name(name) else {
            bail!("unknown layer filter '{name}' (expected mood, sleep, mobility or all)");
        };
        config.layer_filter = filter;
    }
    if let Some(name) = overrides.window {
        let Some(window) = HistoryWindow::from_name(name) else {
            bail!("unknown history window '{name}' (expected weeks, months or all)");
        };
        config.history_window = window;
    }
    if let Some(d) = overrides.max_distance_days {
        config.max_distance_days = d;
    }

    config.validate().context("invalid correlation config")?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<CorrelationConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let parsed = if is_json {
        CorrelationConfig::from_json(&content)
    } else {
        CorrelationConfig::from_toml(&content)
    };
    parsed.with_context(|| format!("failed to load config {}", path.display()))
}

fn cmd_correlate(
    path: &Path,
    config_file: Option<&Path>,
    overrides: &Overrides<'_>,
    now: DateTime<Utc>,
) -> Result<()> {
    let doc = read_document(path)?;
    let config = resolve_config(&doc, config_file, overrides)?;
    let (timeline, reports) = doc.into_timeline_at(now);
    log_drops(&reports);

    let matches: Vec<SliceMatch> = timeline
        .correlate_at(&config, now)
        .context("correlation failed")?;
    tracing::info!("{} recurring slice pairs", matches.len());
    print_json(&matches)
}
