//! `lane_runner`: run the track engine headless for a fixed number of frames and log what
//! happened.
//!
//! Usage:
//!   cargo run -- --frames 3600 --dt-ms 16 --seed 7
//!   cargo run -- --config assets/config/runner.ron --config my_override.ron --no-autopilot

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;
use lane_runner::{install, run_frames, RunSummary, SimOptions};
use lr_config::RunnerConfig;

const LOG_TARGET: &str = "lane_runner";
const DEFAULT_LAYERS: [&str; 2] = ["assets/config/runner.ron", "assets/config/runner.local.ron"];

#[derive(Parser, Debug)]
#[command(about = "Headless endless-runner track simulation", version)]
struct Args {
    /// Config layer, applied in order; repeat for overrides. Defaults to the asset layers.
    #[arg(long = "config")]
    config: Vec<PathBuf>,
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,
    /// Lane chooser seed; overrides the config.
    #[arg(long)]
    seed: Option<u64>,
    /// trace, debug, info, warn or error.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Leave the runner in the middle lane.
    #[arg(long)]
    no_autopilot: bool,
}

fn load_config(explicit: &[PathBuf]) -> Result<RunnerConfig> {
    let layers: Vec<PathBuf> = if explicit.is_empty() {
        DEFAULT_LAYERS.iter().map(PathBuf::from).collect()
    } else {
        explicit.to_vec()
    };
    let (cfg, used, errors) = RunnerConfig::load_layered(layers.iter().map(PathBuf::as_path));
    if !explicit.is_empty() && !errors.is_empty() {
        bail!("config layers failed to load: {}", errors.join("; "));
    }
    for e in errors {
        warn!(target: LOG_TARGET, "CONFIG LOAD ISSUE: {e}");
    }
    if used.is_empty() {
        info!(target: LOG_TARGET, "No config layers found; using defaults");
    } else {
        info!(target: LOG_TARGET, ?used, "Config layers loaded");
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.dt_ms == 0 {
        bail!("--dt-ms must be at least 1");
    }
    let level: Level = args
        .log_level
        .parse()
        .with_context(|| format!("unknown log level {:?}", args.log_level))?;

    let mut app = App::new();
    app.add_plugins(LogPlugin {
        level,
        ..default()
    });

    let cfg = load_config(&args.config)?;
    cfg.check().context("invalid configuration")?;
    for w in cfg.validate() {
        warn!(target: LOG_TARGET, "CONFIG WARNING: {w}");
    }

    let opts = SimOptions {
        dt: Duration::from_millis(args.dt_ms),
        autopilot: !args.no_autopilot,
        seed: args.seed,
    };
    install(&mut app, cfg, &opts);

    let stepped = run_frames(&mut app, args.frames);
    let summary = RunSummary::collect(app.world_mut()).context("track was never built")?;
    info!(target: LOG_TARGET, frames = stepped, "{summary}");
    if summary.dispatch_errors > 0 {
        warn!(
            target: LOG_TARGET,
            errors = summary.dispatch_errors,
            "Some notifications failed to dispatch"
        );
    }
    Ok(())
}

