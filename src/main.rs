use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use marker_lander::config::ControllerConfig;
use marker_lander::io::{csv, json::{self, RunSummary}};
use marker_lander::sim::{self, event, presets, FlightLog};

#[derive(Parser)]
#[command(name = "marker-lander")]
#[command(about = "Replay a scripted landing through the marker-tracking controller")]
#[command(version)]
struct Cli {
    /// Preset scenario: acquire, intermittent, never-seen, emergency.
    #[arg(long, default_value = "acquire")]
    scenario: String,

    /// Controller configuration (JSON). Missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the per-cycle log (CSV).
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Path to write the run summary (JSON).
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ControllerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControllerConfig::default(),
    };

    let scenario = presets::by_name(&cli.scenario).ok_or_else(|| {
        anyhow!("unknown scenario '{}', expected one of {:?}", cli.scenario, presets::NAMES)
    })?;

    let log = sim::run(&scenario, &config)?;
    let summary = RunSummary::from_log(&log, config.ground_threshold);

    print_report(&log, &summary, &config);

    if let Some(path) = &cli.csv {
        csv::write_log_file(path, &log)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "cycle log written");
    }
    if let Some(path) = &cli.json {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary written");
    }

    Ok(())
}

fn print_report(log: &FlightLog, summary: &RunSummary, config: &ControllerConfig) {
    println!();
    println!("====================================================================");
    println!("  MARKER LANDING RUN — {}", log.scenario);
    println!("====================================================================");
    println!();
    println!("  Controller");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  kp range:      [{:.4}, {:.4}]   Error threshold: {:>5.1} px",
        config.kp_min, config.kp_max, config.error_threshold
    );
    println!(
        "  Explore thr:   {:>8.2}          Ground level:    {:>5.2}",
        config.exploration_throttle, config.ground_threshold
    );
    println!(
        "  Gate:          {:?}   Memory: {:?}",
        config.correction_gate, config.marker_memory
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    let events = event::scan(log, &mut event::standard_detectors(config.ground_threshold));
    if events.is_empty() {
        println!("  (none)");
    }
    for e in &events {
        println!(
            "  {:<20} cycle={:>4}   alt={:>6.2}   throttle={:>7.3}",
            format!("{:?}", e.kind),
            e.cycle,
            e.record.altitude,
            e.record.action.throttle
        );
    }
    println!();

    println!("  Cycles");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>5}  {:>7}  {:>6}  {:>8}  {:>8}  {:>8}  {:>8}",
        "cycle", "alt", "seen", "mode", "roll", "pitch", "throttle"
    );
    println!("  {}", "─".repeat(62));

    let sample_interval = (log.len() / 30).max(1);
    for (i, r) in log.records.iter().enumerate() {
        let changed = i > 0 && log.records[i - 1].mode != r.mode;
        if !(i % sample_interval == 0 || changed || i == log.len() - 1) {
            continue;
        }
        println!(
            "  {:>5}  {:>7.3}  {:>6}  {:>8}  {:>8.4}  {:>8.4}  {:>8.4}{}",
            r.cycle,
            r.altitude,
            if r.marker_seen { "yes" } else { "-" },
            r.mode.to_string(),
            r.action.roll,
            r.action.pitch,
            r.action.throttle,
            if r.overridden { "  OVR" } else { "" }
        );
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Cycles:          {:>6}   in landing: {}", summary.cycles, summary.cycles_landing);
    println!("  Acquired at:     {:>6}", opt(summary.first_acquisition));
    println!("  Detection drops: {:>6}", summary.detection_losses);
    println!("  Max |roll|:      {:>8.4}   Max |pitch|: {:.4}", summary.max_abs_roll, summary.max_abs_pitch);
    println!("  Touchdown at:    {:>6}", opt(summary.touchdown_cycle));
    println!("  Final mode:      {:>6}   throttle: {:.3}", summary.final_mode.to_string(), summary.final_throttle);
    println!("====================================================================");
    println!();
}

fn opt(v: Option<usize>) -> String {
    v.map_or_else(|| "-".to_string(), |c| c.to_string())
}
