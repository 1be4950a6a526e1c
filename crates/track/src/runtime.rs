//! Engine-free wiring of the track to the notification bus.
//!
//! [`TrackRuntime`] bundles the track with the runner's position source; the handlers below
//! subscribe to the bus and translate notifications into track operations. This is the
//! reference host for the [`PositionSource`] contract: a position is sampled only when a
//! midpoint notification needs one, and a source that has none turns that notification
//! into [`TrackError::MissingCollaborator`]. The Bevy handlers in `lr_gameplay` follow the
//! same mapping with the ECS `World` as context and the player entity as position source.

use crate::{
    error::{TrackError, TrackWarning},
    events::{EventBus, EventHandler, EventKind, EventResult, RunnerEvent, SubscriptionId},
    track::Track,
};

/// Where the runner is along the track, sampled on demand.
pub trait PositionSource {
    fn forward(&self) -> Option<f32>;
}

impl PositionSource for Option<f32> {
    fn forward(&self) -> Option<f32> {
        *self
    }
}

pub struct TrackRuntime<P> {
    pub track: Track,
    pub position: P,
    /// Warnings produced by handlers since the last [`TrackRuntime::take_warnings`].
    pub warnings: Vec<TrackWarning>,
}

impl<P: PositionSource> TrackRuntime<P> {
    pub fn new(track: Track, position: P) -> Self {
        Self {
            track,
            position,
            warnings: Vec::new(),
        }
    }

    pub fn take_warnings(&mut self) -> Vec<TrackWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn player_forward(&self) -> Result<f32, TrackError> {
        self.position
            .forward()
            .ok_or(TrackError::MissingCollaborator("position source"))
    }
}

/// Mirrors lane changes into the generator.
pub struct LaneTracker;

impl<P: PositionSource> EventHandler<TrackRuntime<P>> for LaneTracker {
    fn handle(&mut self, ev: &RunnerEvent, rt: &mut TrackRuntime<P>) -> EventResult {
        match ev {
            RunnerEvent::LaneChanged { lane } => {
                rt.track.set_lane(*lane);
                EventResult::Handled
            }
            _ => EventResult::Ignored,
        }
    }
    fn name(&self) -> &'static str {
        "LaneTracker"
    }
}

/// Midpoint crossed: spawn the next platform, then recycle behind the runner.
pub struct TrackAdvancer;

impl<P: PositionSource> EventHandler<TrackRuntime<P>> for TrackAdvancer {
    fn handle(&mut self, ev: &RunnerEvent, rt: &mut TrackRuntime<P>) -> EventResult {
        let RunnerEvent::MidpointCrossed { segment } = ev else {
            return EventResult::Ignored;
        };
        let forward = match rt.player_forward() {
            Ok(f) => f,
            Err(e) => return EventResult::Error(e.to_string()),
        };
        match rt.track.on_midpoint(*segment, forward) {
            Ok(adv) => {
                let handled = adv.spawned.is_some();
                rt.warnings.extend(adv.warnings);
                if handled {
                    EventResult::Handled
                } else {
                    EventResult::Ignored
                }
            }
            Err(e) => EventResult::Error(e.to_string()),
        }
    }
    fn name(&self) -> &'static str {
        "TrackAdvancer"
    }
}

/// Run start resets the track; a hazard hit ends the run.
pub struct RunLifecycle;

impl<P: PositionSource> EventHandler<TrackRuntime<P>> for RunLifecycle {
    fn handle(&mut self, ev: &RunnerEvent, rt: &mut TrackRuntime<P>) -> EventResult {
        match ev {
            RunnerEvent::RunStarted => match rt.track.start_run() {
                Ok(w) => {
                    rt.warnings.extend(w);
                    EventResult::Handled
                }
                Err(e) => EventResult::Error(e.to_string()),
            },
            RunnerEvent::HazardHit => {
                if rt.track.hazard_hit() {
                    EventResult::Handled
                } else {
                    EventResult::Ignored
                }
            }
            _ => EventResult::Ignored,
        }
    }
    fn name(&self) -> &'static str {
        "RunLifecycle"
    }
}

/// Subscribe the standard handlers; returns their ids in subscription order.
pub fn wire<P: PositionSource + 'static>(
    bus: &mut EventBus<TrackRuntime<P>>,
) -> Vec<(EventKind, SubscriptionId)> {
    vec![
        (
            EventKind::LaneChanged,
            bus.subscribe(EventKind::LaneChanged, LaneTracker),
        ),
        (
            EventKind::MidpointCrossed,
            bus.subscribe(EventKind::MidpointCrossed, TrackAdvancer),
        ),
        (
            EventKind::RunStarted,
            bus.subscribe(EventKind::RunStarted, RunLifecycle),
        ),
        (
            EventKind::HazardHit,
            bus.subscribe(EventKind::HazardHit, RunLifecycle),
        ),
    ]
}
