//! Headless simulation host for the lane runner.
//!
//! [`install`] puts the runner plugins on an `App` driven by fixed frame steps; [`RunSummary`]
//! reads the end state back out of the world for logging and tests.

use std::fmt;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use lr_config::RunnerConfig;
use lr_core::{RngSeed, RunDiagnostics, RunnerBus, RunnerConfigRes, TrackState};
use lr_gameplay::{player_position, AutopilotPlugin, GameplayPlugin};
use lr_track::{Lane, RunPhase, TrackStats};

#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    /// Simulated time per frame.
    pub dt: Duration,
    pub autopilot: bool,
    /// Overrides the configured seed.
    pub seed: Option<u64>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: Duration::from_millis(16),
            autopilot: true,
            seed: None,
        }
    }
}

pub fn install(app: &mut App, cfg: RunnerConfig, opts: &SimOptions) {
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(opts.dt));
    if let Some(seed) = opts.seed {
        app.insert_resource(RngSeed(seed));
    }
    app.insert_resource(RunnerConfigRes(cfg));
    app.add_plugins(GameplayPlugin);
    if opts.autopilot {
        app.add_plugins(AutopilotPlugin);
    }
}

/// Step `frames` frames, stopping early once the run is over (nothing restarts it
/// headless). Returns the number of frames stepped.
pub fn run_frames(app: &mut App, frames: u32) -> u32 {
    for frame in 0..frames {
        app.update();
        let over = app
            .world()
            .get_resource::<TrackState>()
            .is_none_or(|t| t.phase() == RunPhase::GameOver);
        if over {
            return frame + 1;
        }
    }
    frames
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub phase: RunPhase,
    pub distance: f32,
    pub lane: Option<Lane>,
    pub live: usize,
    pub pool_slots: usize,
    pub stats: TrackStats,
    pub runs_started: u32,
    pub hazard_hits: u32,
    pub warnings: u64,
    pub dispatch_errors: u64,
    pub notifications: u64,
}

impl RunSummary {
    /// `None` when the track was never built.
    pub fn collect(world: &mut World) -> Option<Self> {
        let distance = player_position(world).map(|(_, f)| f).unwrap_or(0.0);
        let diag = world.get_resource::<RunDiagnostics>().copied().unwrap_or_default();
        let notifications = world
            .get_resource::<RunnerBus>()
            .map(|b| b.published())
            .unwrap_or(0);
        let track = world.get_resource::<TrackState>()?;
        Some(Self {
            phase: track.phase(),
            distance,
            lane: track.lane(),
            live: track.live_count(),
            pool_slots: track.platform_pool().len(),
            stats: track.stats(),
            runs_started: diag.runs_started,
            hazard_hits: diag.hazard_hits,
            warnings: diag.warnings,
            dispatch_errors: diag.dispatch_errors,
            notifications,
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at {:.1} ({}), live {} / {} slots, spawned {}, recycled {}, evicted {}, fire moved {}x, {} notifications, {} warnings, {} dispatch errors",
            self.phase,
            self.distance,
            self.lane.map(Lane::name).unwrap_or("no lane"),
            self.live,
            self.pool_slots,
            self.stats.spawned,
            self.stats.recycled,
            self.stats.evictions,
            self.stats.hazard_repositions,
            self.notifications,
            self.warnings,
            self.dispatch_errors,
        )
    }
}
