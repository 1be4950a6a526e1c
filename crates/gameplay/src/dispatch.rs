// Notification dispatch. Systems queue `RunnerEvent`s in `PendingRunnerEvents`; one exclusive
// system drains the queue once per frame and publishes each through the `RunnerBus` with the
// whole `World` as handler context.

use bevy::prelude::*;
use lr_core::{PendingRunnerEvents, RunDiagnostics, RunnerBus, TrackState};
use lr_track::{
    EventBus, EventHandler, EventKind, EventResult, RunPhase, RunnerEvent, SubscriptionId,
    TrackError, TrackWarning,
};

use crate::setup::{player_position, reset_player};

const LOG_TARGET: &str = "lr_gameplay::dispatch";

fn missing_track() -> EventResult {
    EventResult::Error(TrackError::MissingCollaborator("track").to_string())
}

fn report_warnings(world: &mut World, warnings: Vec<TrackWarning>) {
    if warnings.is_empty() {
        return;
    }
    for w in &warnings {
        warn!(target: LOG_TARGET, "{w}");
    }
    if let Some(mut diag) = world.get_resource_mut::<RunDiagnostics>() {
        diag.warnings += warnings.len() as u64;
    }
}

/// Keeps the generator's view of the runner's lane current.
pub struct LaneMirror;

impl EventHandler<World> for LaneMirror {
    fn handle(&mut self, ev: &RunnerEvent, world: &mut World) -> EventResult {
        let RunnerEvent::LaneChanged { lane } = ev else {
            return EventResult::Ignored;
        };
        let Some(mut track) = world.get_resource_mut::<TrackState>() else {
            return missing_track();
        };
        track.set_lane(*lane);
        EventResult::Handled
    }
    fn name(&self) -> &'static str {
        "LaneMirror"
    }
}

/// Spawns the next platform and recycles the oldest one when a midpoint is crossed.
pub struct MidpointAdvance;

impl EventHandler<World> for MidpointAdvance {
    fn handle(&mut self, ev: &RunnerEvent, world: &mut World) -> EventResult {
        let RunnerEvent::MidpointCrossed { segment } = ev else {
            return EventResult::Ignored;
        };
        let Some((_, forward)) = player_position(world) else {
            return EventResult::Error(
                TrackError::MissingCollaborator("player position").to_string(),
            );
        };
        let Some(mut track) = world.get_resource_mut::<TrackState>() else {
            return missing_track();
        };
        let adv = match track.on_midpoint(*segment, forward) {
            Ok(adv) => adv,
            Err(e) => return EventResult::Error(e.to_string()),
        };
        if let Some(spawned) = adv.spawned {
            debug!(target: LOG_TARGET, "Spawned {spawned} at forward {forward:.2}");
        }
        if let Some(recycled) = adv.recycled {
            debug!(target: LOG_TARGET, "Recycled {recycled}");
        }
        let handled = adv.spawned.is_some();
        report_warnings(world, adv.warnings);
        if handled {
            EventResult::Handled
        } else {
            EventResult::Ignored
        }
    }
    fn name(&self) -> &'static str {
        "MidpointAdvance"
    }
}

/// Starts runs (fresh track, runner back on the start line) and ends them on fire contact.
pub struct RunLifecycleHandler;

impl RunLifecycleHandler {
    fn start(world: &mut World) -> EventResult {
        let Some(mut track) = world.get_resource_mut::<TrackState>() else {
            return missing_track();
        };
        let warnings = match track.start_run() {
            Ok(w) => w,
            Err(e) => return EventResult::Error(e.to_string()),
        };
        if !reset_player(world) {
            warn!(target: LOG_TARGET, "Run started without a player entity");
        }
        report_warnings(world, warnings);
        let runs = world.get_resource_mut::<RunDiagnostics>().map(|mut d| {
            d.runs_started += 1;
            d.runs_started
        });
        info!(target: LOG_TARGET, run = runs.unwrap_or(0), "Run started");
        EventResult::Handled
    }

    fn end(world: &mut World) -> EventResult {
        let Some(mut track) = world.get_resource_mut::<TrackState>() else {
            return missing_track();
        };
        if !track.hazard_hit() {
            return EventResult::Ignored;
        }
        let stats = track.stats();
        let distance = player_position(world).map(|(_, f)| f).unwrap_or(0.0);
        if let Some(mut diag) = world.get_resource_mut::<RunDiagnostics>() {
            diag.hazard_hits += 1;
            diag.last_distance = distance;
        }
        info!(
            target: LOG_TARGET,
            distance,
            spawned = stats.spawned,
            recycled = stats.recycled,
            "Run over: fell into the fire"
        );
        EventResult::Handled
    }
}

impl EventHandler<World> for RunLifecycleHandler {
    fn handle(&mut self, ev: &RunnerEvent, world: &mut World) -> EventResult {
        match ev {
            RunnerEvent::RunStarted => Self::start(world),
            RunnerEvent::HazardHit => Self::end(world),
            _ => EventResult::Ignored,
        }
    }
    fn name(&self) -> &'static str {
        "RunLifecycle"
    }
}

pub fn register_runner_handlers(bus: &mut EventBus<World>) -> Vec<(EventKind, SubscriptionId)> {
    vec![
        (
            EventKind::LaneChanged,
            bus.subscribe(EventKind::LaneChanged, LaneMirror),
        ),
        (
            EventKind::MidpointCrossed,
            bus.subscribe(EventKind::MidpointCrossed, MidpointAdvance),
        ),
        (
            EventKind::RunStarted,
            bus.subscribe(EventKind::RunStarted, RunLifecycleHandler),
        ),
        (
            EventKind::HazardHit,
            bus.subscribe(EventKind::HazardHit, RunLifecycleHandler),
        ),
    ]
}

/// Drain the pending queue through the bus. Events raised by handlers during this pass wait
/// for the next frame.
pub fn dispatch_runner_events(world: &mut World) {
    let pending = match world.get_resource_mut::<PendingRunnerEvents>() {
        Some(mut p) => p.take(),
        None => return,
    };
    if pending.is_empty() || !world.contains_resource::<RunnerBus>() {
        return;
    }
    world.resource_scope(|world, mut bus: Mut<RunnerBus>| {
        for ev in &pending {
            // A hazard hit after the run already ended (or a second one this frame) is noise.
            if matches!(ev, RunnerEvent::HazardHit)
                && world
                    .get_resource::<TrackState>()
                    .is_some_and(|t| t.phase() != RunPhase::Playing)
            {
                continue;
            }
            if let EventResult::Error(msg) = bus.publish(ev, world) {
                warn!(target: LOG_TARGET, "Dispatch of {:?} failed: {msg}", ev.kind());
                if let Some(mut diag) = world.get_resource_mut::<RunDiagnostics>() {
                    diag.dispatch_errors += 1;
                }
            }
        }
    });
}
