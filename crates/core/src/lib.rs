// Core ECS vocabulary for the runner: components, resources, the lane-intent event and the
// system set ordering contract. No systems with game logic live here; lr_gameplay owns those.

use bevy::prelude::*;
use lr_track::{EventBus, Lane, MoveIntent, RunnerEvent, Track};

#[derive(Component, Debug)]
pub struct Player;

/// Lateral slide between lane rails. `lane` is authoritative the moment a move is accepted;
/// the transform catches up over `duration` seconds.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LaneMotion {
    pub lane: Lane,
    pub from_x: f32,
    pub to_x: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl Default for LaneMotion {
    fn default() -> Self {
        Self {
            lane: Lane::Middle,
            from_x: 0.0,
            to_x: 0.0,
            elapsed: 0.0,
            duration: 0.0,
        }
    }
}

impl LaneMotion {
    /// Start sliding from wherever the runner currently is towards `lane`'s rail.
    pub fn retarget(&mut self, lane: Lane, lane_distance: f32, duration: f32) {
        self.from_x = self.current_x();
        self.to_x = lane.offset(lane_distance);
        self.lane = lane;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
    }

    pub fn current_x(&self) -> f32 {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return self.to_x;
        }
        let t = self.elapsed / self.duration;
        self.from_x + (self.to_x - self.from_x) * t
    }

    pub fn is_settled(&self) -> bool {
        self.current_x() == self.to_x
    }
}

/// Forward coordinate at the end of the previous motion step; crossings are detected on
/// the `prev_forward -> translation.z` segment.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerProgress {
    pub prev_forward: f32,
}

/// Mirror of one platform pool slot. The transform sits at the segment centre.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SegmentVisual {
    pub slot: u32,
    pub active: bool,
    pub length: f32,
    pub width: f32,
}

/// Mirror of one fire-ground strip.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HazardVisual {
    pub slot: u32,
    pub length: f32,
    pub width: f32,
}

/// Wrapper Bevy resource for the pure-data RunnerConfig (keeps lr_config free of bevy).
#[derive(Resource, Debug, Clone, Default)]
pub struct RunnerConfigRes(pub lr_config::RunnerConfig);

/// Seed for the lane chooser; overrides `RunnerConfig::seed` when present.
#[derive(Resource, Debug, Copy, Clone, Default)]
pub struct RngSeed(pub u64);

#[derive(Resource, Deref, DerefMut)]
pub struct TrackState(pub Track);

/// Notifications raised by systems this frame, published through [`RunnerBus`] by the
/// dispatch system.
#[derive(Resource, Default, Debug)]
pub struct PendingRunnerEvents(Vec<RunnerEvent>);

impl PendingRunnerEvents {
    pub fn push(&mut self, ev: RunnerEvent) {
        self.0.push(ev);
    }
    pub fn take(&mut self) -> Vec<RunnerEvent> {
        std::mem::take(&mut self.0)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Resource, Default, Deref, DerefMut)]
pub struct RunnerBus(pub EventBus<World>);

/// Counters for the current process, for logs and the headless summary.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct RunDiagnostics {
    pub runs_started: u32,
    pub hazard_hits: u32,
    pub warnings: u64,
    pub dispatch_errors: u64,
    /// Forward position when the last run ended.
    pub last_distance: f32,
}

/// Discrete lane-change request from any input source (keys, swipe, autopilot).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneIntent(pub MoveIntent);

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum RunnerSet {
    /// Read devices and emit intents / start requests.
    Input,
    /// Lane changes, lateral slide, forward motion.
    Motion,
    /// Midpoint crossings and hazard contact.
    Detect,
    /// Publish pending notifications through the bus.
    Dispatch,
    /// Mirror track state into entities.
    Sync,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LaneIntent>()
            .init_resource::<PendingRunnerEvents>()
            .init_resource::<RunnerBus>()
            .init_resource::<RunDiagnostics>()
            .configure_sets(
                Update,
                (
                    RunnerSet::Input,
                    RunnerSet::Motion,
                    RunnerSet::Detect,
                    RunnerSet::Dispatch,
                    RunnerSet::Sync,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_adds_sets_and_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(CorePlugin);
        fn dummy() {}
        app.add_systems(Update, dummy.in_set(RunnerSet::Input));
        app.add_systems(Update, dummy.in_set(RunnerSet::Sync));
        app.update();
        assert!(app.world().get_resource::<PendingRunnerEvents>().is_some());
        assert!(app.world().get_resource::<RunnerBus>().is_some());
        assert!(app.world().get_resource::<RunDiagnostics>().is_some());
    }

    #[test]
    fn lane_motion_interpolates() {
        let mut m = LaneMotion::default();
        m.retarget(Lane::Left, 2.0, 0.2);
        assert_eq!(m.current_x(), 0.0);
        m.elapsed = 0.1;
        assert!((m.current_x() + 1.0).abs() < 1e-6);
        m.elapsed = 0.5;
        assert_eq!(m.current_x(), -2.0);
        assert!(m.is_settled());
    }

    #[test]
    fn retarget_mid_slide_starts_from_current_position() {
        let mut m = LaneMotion::default();
        m.retarget(Lane::Right, 2.0, 0.2);
        m.elapsed = 0.1;
        m.retarget(Lane::Middle, 2.0, 0.2);
        assert!((m.from_x - 1.0).abs() < 1e-6);
        assert_eq!(m.to_x, 0.0);
        assert_eq!(m.lane, Lane::Middle);
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut m = LaneMotion::default();
        m.retarget(Lane::Right, 2.0, -1.0);
        assert_eq!(m.current_x(), 2.0);
    }

    #[test]
    fn pending_events_drain() {
        let mut p = PendingRunnerEvents::default();
        p.push(RunnerEvent::RunStarted);
        p.push(RunnerEvent::HazardHit);
        assert_eq!(p.len(), 2);
        assert_eq!(
            p.take(),
            vec![RunnerEvent::RunStarted, RunnerEvent::HazardHit]
        );
        assert!(p.is_empty());
    }
}
