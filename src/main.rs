//! Typemetry - Keystroke log analyzer
//!
//! Reads a keystroke log, resolves buttons through the configured
//! layout and prints press-duration and transition statistics.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use typemetry::analytics::{TimingExtractor, TransitionStats};
use typemetry::config::Config;
use typemetry::eventlog::EventLogStore;
use typemetry::layout::{standard_layout, StandardLayout};
use typemetry::report::AnalysisReport;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the keystroke log (defaults to the configured path)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Load configuration from a specific file instead of the default
    /// location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transition time limit in seconds (overrides the configured
    /// value); slower transitions count as thinking pauses
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Restrict the analysis to a predefined button group
    #[arg(short, long, value_enum, default_value_t = Group::All)]
    group: Group,

    /// Write the full JSON report to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How many top entries to print per table
    #[arg(long, default_value_t = 10)]
    top: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Group {
    All,
    Alphabet,
    Numeric,
    Punctuation,
    Functional,
    Extended,
    LeftHand,
    RightHand,
}

fn select_buttons(layout: &StandardLayout, group: Group) -> Vec<String> {
    match group {
        Group::All => layout.map.buttons().to_vec(),
        Group::Alphabet => layout.groups.alphabet.clone(),
        Group::Numeric => layout.groups.numeric.clone(),
        Group::Punctuation => layout.groups.punctuation.clone(),
        Group::Functional => layout.groups.functional.clone(),
        Group::Extended => layout.groups.extended.clone(),
        Group::LeftHand => layout.groups.left_hand(),
        Group::RightHand => layout.groups.right_hand(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().unwrap_or_default(),
    };

    let layout = standard_layout(&config.layout).context("failed to build keyboard layout")?;
    let log_path = cli.log.clone().unwrap_or_else(|| config.log.path.clone());
    let store = EventLogStore::from_path(&log_path)
        .with_context(|| format!("failed to read log {}", log_path.display()))?;

    println!(
        "Loaded {} events across {} session(s) from {}",
        store.len(),
        store.sessions(),
        log_path.display()
    );

    let time_limit = cli.time_limit.unwrap_or(config.analysis.time_limit_secs);
    let buttons = select_buttons(&layout, cli.group);
    let extractor = TimingExtractor::new(&store, buttons);

    let timing = extractor.timing();
    let chronology = extractor
        .chronological()
        .context("log is not chronologically consistent")?;
    let stats = TransitionStats::correlate(&chronology.presses, time_limit, extractor.buttons());

    // Slowest held buttons first; buttons never pressed are skipped.
    let mut durations: Vec<(&str, usize, f64)> = timing
        .iter()
        .filter_map(|(button, entry)| {
            entry
                .mean_duration()
                .map(|mean| (button.as_str(), entry.press_count(), mean))
        })
        .collect();
    durations.sort_by(|a, b| b.2.total_cmp(&a.2));

    println!("\nPress durations ({} button(s) with data):", durations.len());
    println!("{:<10} {:>8} {:>12}", "Button", "Presses", "Mean [ms]");
    for (button, presses, mean) in durations.iter().take(cli.top) {
        println!("{button:<10} {presses:>8} {:>12.1}", mean * 1000.0);
    }

    let mut pairs: Vec<(usize, usize, u64)> = Vec::new();
    for following in 0..stats.size() {
        for preceding in 0..stats.size() {
            let count = stats.count_at(following, preceding);
            if count > 0 {
                pairs.push((following, preceding, count));
            }
        }
    }
    pairs.sort_by(|a, b| b.2.cmp(&a.2));

    println!(
        "\nTransitions within {time_limit:.3}s ({} samples total):",
        stats.total_samples()
    );
    println!(
        "{:<22} {:>7} {:>11} {:>12}",
        "Pair", "Count", "Mean [ms]", "StdDev [ms]"
    );
    for (following, preceding, count) in pairs.iter().take(cli.top) {
        let pair = format!(
            "{} -> {}",
            stats.buttons()[*preceding],
            stats.buttons()[*following]
        );
        let mean_ms = stats
            .mean_at(*following, *preceding)
            .map_or_else(|| "-".to_string(), |m| format!("{:.1}", m * 1000.0));
        let std_ms = stats
            .variance_at(*following, *preceding)
            .map_or_else(|| "-".to_string(), |v| format!("{:.1}", v.sqrt() * 1000.0));
        println!("{pair:<22} {count:>7} {mean_ms:>11} {std_ms:>12}");
    }

    if let Some(path) = &cli.output {
        let report = AnalysisReport::new(&store, &log_path, &timing, &stats, time_limit);
        report
            .export_json(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}
