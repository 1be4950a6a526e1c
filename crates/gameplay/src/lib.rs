// Runner gameplay: input, motion, detection, notification dispatch and the entity mirror of
// the track. All track decisions go through the `RunnerBus` handlers in `dispatch`.

use bevy::prelude::*;
use lr_core::{CorePlugin, PendingRunnerEvents, RunnerBus, RunnerSet};

mod autopilot;
mod detect;
mod dispatch;
mod input;
mod motion;
mod setup;
mod sync;

pub use autopilot::{autopilot_steer, AutopilotPlugin};
pub use dispatch::{
    dispatch_runner_events, register_runner_handlers, LaneMirror, MidpointAdvance,
    RunLifecycleHandler,
};
pub use input::swipe_intent;
pub use setup::{player_position, reset_player};
pub use sync::VisualSlots;

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<CorePlugin>() {
            app.add_plugins(CorePlugin);
        }
        app.init_resource::<PendingRunnerEvents>()
            .init_resource::<RunnerBus>()
            .init_resource::<VisualSlots>();
        register_runner_handlers(&mut app.world_mut().resource_mut::<RunnerBus>());

        app.add_systems(Startup, (setup::setup_track, setup::spawn_player).chain());
        app.add_systems(
            Update,
            (
                input::keyboard_lane_intents,
                input::swipe_lane_intents,
                input::request_run_start,
                input::toggle_pause,
            )
                .in_set(RunnerSet::Input),
        );
        app.add_systems(
            Update,
            (
                motion::apply_lane_intents,
                motion::slide_lanes,
                motion::advance_player,
            )
                .chain()
                .in_set(RunnerSet::Motion),
        );
        app.add_systems(
            Update,
            (detect::detect_midpoints, detect::hazard_contact)
                .chain()
                .in_set(RunnerSet::Detect),
        );
        app.add_systems(Update, dispatch_runner_events.in_set(RunnerSet::Dispatch));
        app.add_systems(Update, sync::sync_segment_visuals.in_set(RunnerSet::Sync));
    }
}
