//! Track manager: owns the platform pool, the live queue, the generator and the hazard
//! conveyor, and sequences them for each notification.

use lr_config::RunnerConfig;

use crate::{
    chooser::{LaneChooser, RandomLaneChooser},
    error::{PoolError, TrackError, TrackWarning},
    generator::{GeneratorState, Spawned, TrackGenerator},
    hazard::HazardConveyor,
    lane::Lane,
    live::LiveSegments,
    params::TrackParams,
    pool::SegmentPool,
    recycler,
    segment::{Segment, SegmentHandle, SegmentKind},
    trigger,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackStats {
    pub spawned: u64,
    pub recycled: u64,
    pub evictions: u64,
    pub skipped_spawns: u64,
    pub hazard_repositions: u64,
}

/// Outcome of one advance event: spawn first, then the recycle check.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Advance {
    pub spawned: Option<SegmentHandle>,
    pub recycled: Option<SegmentHandle>,
    pub warnings: Vec<TrackWarning>,
}

pub struct Track {
    params: TrackParams,
    platforms: SegmentPool,
    live: LiveSegments,
    generator: TrackGenerator,
    hazards: Option<HazardConveyor>,
    phase: RunPhase,
    stats: TrackStats,
}

impl Track {
    pub fn new(params: TrackParams, chooser: Box<dyn LaneChooser + Send + Sync>) -> Self {
        let hazards = params.hazard.map(|h| {
            let width = params.lane_distance * 2.0 + params.segment_width;
            HazardConveyor::new(h, width)
        });
        Self {
            platforms: SegmentPool::new(
                SegmentKind::Platform,
                params.pool_initial,
                params.pool_max,
            ),
            live: LiveSegments::new(),
            generator: TrackGenerator::new(chooser),
            hazards,
            phase: RunPhase::Idle,
            stats: TrackStats::default(),
            params,
        }
    }

    /// Checked config plus a lane chooser seeded from `cfg.seed`.
    pub fn from_config(cfg: &RunnerConfig) -> Result<Self, TrackError> {
        let params = TrackParams::from_config(cfg)?;
        Ok(Self::new(params, Box::new(RandomLaneChooser::seeded(cfg.seed))))
    }

    /// Clear everything, lay the origin platform and the hazard strips, enter `Playing`.
    pub fn start_run(&mut self) -> Result<Vec<TrackWarning>, TrackError> {
        self.clear_live();
        self.generator.reset();
        if let Some(h) = self.hazards.as_mut() {
            h.reset()?;
        }
        let origin = self.spawn(|g, p, pool, live| g.spawn_origin(p, pool, live))?;
        self.phase = RunPhase::Playing;
        Ok(origin.warnings)
    }

    fn clear_live(&mut self) {
        for h in self.live.drain() {
            self.platforms.release(h);
        }
    }

    /// Mirror the runner's lane into the generator.
    pub fn set_lane(&mut self, lane: Lane) {
        self.generator.set_lane(lane);
    }

    pub fn lane(&self) -> Option<Lane> {
        self.generator.state().lane
    }

    fn spawn<F>(&mut self, f: F) -> Result<Spawned, TrackError>
    where
        F: FnOnce(
            &mut TrackGenerator,
            &TrackParams,
            &mut SegmentPool,
            &mut LiveSegments,
        ) -> Result<Spawned, PoolError>,
    {
        match f(
            &mut self.generator,
            &self.params,
            &mut self.platforms,
            &mut self.live,
        ) {
            Ok(spawned) => {
                self.stats.spawned += 1;
                let evictions = spawned
                    .warnings
                    .iter()
                    .filter(|w| matches!(w, TrackWarning::PoolExhausted { .. }))
                    .count();
                self.stats.evictions += evictions as u64;
                Ok(spawned)
            }
            Err(e) => {
                self.stats.skipped_spawns += 1;
                Err(e.into())
            }
        }
    }

    /// Place the next platform from the mirrored lane.
    pub fn spawn_next(&mut self) -> Result<Spawned, TrackError> {
        self.spawn(|g, p, pool, live| g.spawn_next(p, pool, live))
    }

    /// One advance event: spawn the next platform, then give the recycler one look at the
    /// oldest live segment. A failed spawn skips straight to the recycle check.
    pub fn advance(&mut self, player_forward: f32) -> Result<Advance, TrackError> {
        let spawned = self.spawn_next();
        let recycled = self.maybe_recycle(player_forward);
        let spawned = spawned?;
        Ok(Advance {
            spawned: Some(spawned.handle),
            recycled,
            warnings: spawned.warnings,
        })
    }

    /// Reaction to a midpoint notification. Ignored unless a run is in progress with
    /// something live; a trigger from a segment that is no longer live is reported and
    /// dropped.
    pub fn on_midpoint(
        &mut self,
        segment: SegmentHandle,
        player_forward: f32,
    ) -> Result<Advance, TrackError> {
        if self.phase != RunPhase::Playing || self.live.is_empty() {
            return Ok(Advance::default());
        }
        if !self.live.contains(segment) {
            return Ok(Advance {
                warnings: vec![TrackWarning::StaleTrigger { segment }],
                ..Advance::default()
            });
        }
        self.advance(player_forward)
    }

    pub fn maybe_recycle(&mut self, player_forward: f32) -> Option<SegmentHandle> {
        let recycled = recycler::maybe_recycle(
            &mut self.live,
            &mut self.platforms,
            player_forward,
            self.params.recycle_margin,
        );
        if recycled.is_some() {
            self.stats.recycled += 1;
        }
        recycled
    }

    /// Per-frame variant of the recycle check; only runs while playing.
    pub fn poll_recycle(&mut self, player_forward: f32) -> Option<SegmentHandle> {
        if self.phase != RunPhase::Playing {
            return None;
        }
        self.maybe_recycle(player_forward)
    }

    /// Newly crossed midpoint triggers for a runner step `prev -> cur` at `lateral`.
    pub fn detect_crossings(&mut self, prev: f32, cur: f32, lateral: f32) -> Vec<SegmentHandle> {
        if self.phase != RunPhase::Playing {
            return Vec::new();
        }
        trigger::detect(&self.live, &mut self.platforms, prev, cur, lateral)
    }

    /// Advance the fire-ground conveyor; returns the strip moved this call, if any.
    pub fn update_hazards(&mut self, player_forward: f32) -> Option<SegmentHandle> {
        let moved = self.hazards.as_mut()?.update(player_forward);
        if moved.is_some() {
            self.stats.hazard_repositions += 1;
        }
        moved
    }

    /// True when a live platform lies under `(lateral, forward)`.
    pub fn supports(&self, lateral: f32, forward: f32) -> bool {
        self.live_segments().any(|(_, s)| s.covers(lateral, forward))
    }

    pub fn over_hazard(&self, forward: f32) -> bool {
        self.hazards.as_ref().is_some_and(|h| h.covers(forward))
    }

    /// Ends a run in progress. `false` when not playing.
    pub fn hazard_hit(&mut self) -> bool {
        if self.phase != RunPhase::Playing {
            return false;
        }
        self.phase = RunPhase::GameOver;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != RunPhase::Playing {
            return false;
        }
        self.phase = RunPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != RunPhase::Paused {
            return false;
        }
        self.phase = RunPhase::Playing;
        true
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Live platforms, oldest first.
    pub fn live_segments(&self) -> impl Iterator<Item = (SegmentHandle, &Segment)> {
        let pool = &self.platforms;
        self.live
            .iter()
            .filter_map(move |h| pool.get(h).map(|s| (h, s)))
    }

    pub fn live_handles(&self) -> Vec<SegmentHandle> {
        self.live.iter().collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn segment(&self, handle: SegmentHandle) -> Option<&Segment> {
        self.platforms.get(handle)
    }

    pub fn platform_pool(&self) -> &SegmentPool {
        &self.platforms
    }

    pub fn hazard_segments(&self) -> impl Iterator<Item = (SegmentHandle, &Segment)> {
        self.hazards.iter().flat_map(|h| h.segments())
    }

    pub fn hazard_pool(&self) -> Option<&SegmentPool> {
        self.hazards.as_ref().map(|h| h.pool())
    }

    pub fn generator_state(&self) -> &GeneratorState {
        self.generator.state()
    }

    pub fn replace_chooser(&mut self, chooser: Box<dyn LaneChooser + Send + Sync>) {
        self.generator.replace_chooser(chooser);
    }

    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    pub fn stats(&self) -> TrackStats {
        self.stats
    }
}
