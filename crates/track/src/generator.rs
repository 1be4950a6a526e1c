//! Next-platform placement.
//!
//! The generator mirrors the runner's lane (it never owns it), asks the lane chooser for the
//! next platform's lane and derives the forward gap: continuing in the same lane leaves a
//! full gap, stepping to a neighbour leaves half of one so the platforms overlap.

use crate::{
    chooser::LaneChooser,
    error::{PoolError, TrackWarning},
    lane::Lane,
    live::LiveSegments,
    params::TrackParams,
    pool::SegmentPool,
    segment::{Placement, SegmentHandle},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorState {
    /// Forward coordinate of the newest platform.
    pub last_forward: f32,
    /// Last lane reported by the runner; `None` until the first report or run start.
    pub lane: Option<Lane>,
    /// Platforms placed since the last reset.
    pub spawned: u64,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            last_forward: 0.0,
            lane: None,
            spawned: 0,
        }
    }
}

/// Where the next platform goes, before a pool slot is assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextPlacement {
    pub lane: Lane,
    pub lateral: f32,
    pub gap: f32,
    pub forward: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spawned {
    pub handle: SegmentHandle,
    pub placement: Placement,
    pub lane: Lane,
    pub warnings: Vec<TrackWarning>,
}

pub struct TrackGenerator {
    state: GeneratorState,
    chooser: Box<dyn LaneChooser + Send + Sync>,
}

impl TrackGenerator {
    pub fn new(chooser: Box<dyn LaneChooser + Send + Sync>) -> Self {
        Self {
            state: GeneratorState::default(),
            chooser,
        }
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    pub fn set_lane(&mut self, lane: Lane) {
        self.state.lane = Some(lane);
    }

    /// Back to the start line: middle lane, nothing placed.
    pub fn reset(&mut self) {
        self.state = GeneratorState {
            lane: Some(Lane::Middle),
            ..GeneratorState::default()
        };
    }

    pub fn replace_chooser(&mut self, chooser: Box<dyn LaneChooser + Send + Sync>) {
        self.chooser = chooser;
    }

    /// Decide the next platform's lane and forward position. Consumes one chooser answer
    /// when the runner's lane is known.
    pub fn plan(
        &mut self,
        params: &TrackParams,
        warnings: &mut Vec<TrackWarning>,
    ) -> NextPlacement {
        let Some(current) = self.state.lane else {
            warnings.push(TrackWarning::UnknownLane);
            return NextPlacement {
                lane: Lane::Middle,
                lateral: 0.0,
                gap: params.full_gap,
                forward: self.state.last_forward + params.full_gap,
            };
        };
        let mut lane = self.chooser.choose(current);
        if !current.reaches(lane) {
            warnings.push(TrackWarning::IllegalLaneChoice {
                from: current,
                to: lane,
            });
            lane = current;
        }
        let gap = if lane == current {
            params.full_gap
        } else {
            params.half_gap
        };
        NextPlacement {
            lane,
            lateral: lane.offset(params.lane_distance),
            gap,
            forward: self.state.last_forward + gap,
        }
    }

    /// The first platform of a run, at the origin.
    pub fn spawn_origin(
        &mut self,
        params: &TrackParams,
        pool: &mut SegmentPool,
        live: &mut LiveSegments,
    ) -> Result<Spawned, PoolError> {
        let origin = NextPlacement {
            lane: Lane::Middle,
            lateral: 0.0,
            gap: 0.0,
            forward: 0.0,
        };
        self.place(params, pool, live, origin, Vec::new())
    }

    pub fn spawn_next(
        &mut self,
        params: &TrackParams,
        pool: &mut SegmentPool,
        live: &mut LiveSegments,
    ) -> Result<Spawned, PoolError> {
        let mut warnings = Vec::new();
        let next = self.plan(params, &mut warnings);
        self.place(params, pool, live, next, warnings)
    }

    fn place(
        &mut self,
        params: &TrackParams,
        pool: &mut SegmentPool,
        live: &mut LiveSegments,
        next: NextPlacement,
        mut warnings: Vec<TrackWarning>,
    ) -> Result<Spawned, PoolError> {
        let acquired = pool.acquire()?;
        if let Some(evicted) = acquired.evicted {
            live.remove(evicted);
            warnings.push(TrackWarning::PoolExhausted { evicted });
        }
        let placement = Placement::new(next.lateral, params.segment_height, next.forward);
        if let Some(seg) = pool.get_mut(acquired.handle) {
            seg.length = params.segment_length;
            seg.width = params.segment_width;
            seg.lateral_offset = next.lateral;
            seg.placement = placement;
            seg.triggered = false;
        }
        live.push_back(acquired.handle);
        self.state.last_forward = next.forward;
        self.state.spawned += 1;
        Ok(Spawned {
            handle: acquired.handle,
            placement,
            lane: next.lane,
            warnings,
        })
    }
}
