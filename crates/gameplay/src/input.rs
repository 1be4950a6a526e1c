// Input collaborators: keyboard and touch swipes become `LaneIntent`s; the start key (or
// `auto_start`) raises RunStarted. Device resources are optional so the same plugin runs
// headless under MinimalPlugins.

use bevy::input::touch::Touches;
use bevy::prelude::*;
use lr_core::{LaneIntent, PendingRunnerEvents, RunnerConfigRes, TrackState};
use lr_track::{MoveIntent, RunPhase, RunnerEvent};

const LOG_TARGET: &str = "lr_gameplay::input";

/// Horizontal swipe of `dx` pixels; `None` when it doesn't clear the threshold.
pub fn swipe_intent(dx: f32, threshold: f32) -> Option<MoveIntent> {
    if dx.abs() <= threshold.max(0.0) {
        return None;
    }
    Some(if dx < 0.0 {
        MoveIntent::Left
    } else {
        MoveIntent::Right
    })
}

pub fn keyboard_lane_intents(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut out: EventWriter<LaneIntent>,
) {
    let Some(keys) = keys else { return };
    if keys.any_just_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        out.write(LaneIntent(MoveIntent::Left));
    }
    if keys.any_just_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        out.write(LaneIntent(MoveIntent::Right));
    }
}

pub fn swipe_lane_intents(
    touches: Option<Res<Touches>>,
    cfg: Option<Res<RunnerConfigRes>>,
    mut out: EventWriter<LaneIntent>,
) {
    let Some(touches) = touches else { return };
    let threshold = cfg
        .map(|c| c.0.player.swipe_threshold)
        .unwrap_or(lr_config::PlayerConfig::default().swipe_threshold);
    for touch in touches.iter_just_released() {
        let dx = touch.position().x - touch.start_position().x;
        if let Some(intent) = swipe_intent(dx, threshold) {
            out.write(LaneIntent(intent));
        }
    }
}

/// Raise RunStarted on the first frame (auto start) or on Space / Enter after a run ended.
pub fn request_run_start(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    cfg: Option<Res<RunnerConfigRes>>,
    track: Option<Res<TrackState>>,
    mut pending: ResMut<PendingRunnerEvents>,
) {
    let Some(track) = track else { return };
    let phase = track.phase();
    let auto = phase == RunPhase::Idle && cfg.map(|c| c.0.auto_start).unwrap_or(true);
    let pressed = matches!(phase, RunPhase::Idle | RunPhase::GameOver)
        && keys.is_some_and(|k| k.any_just_pressed([KeyCode::Space, KeyCode::Enter]));
    if auto || pressed {
        info!(target: LOG_TARGET, "Run start requested ({phase:?})");
        pending.push(RunnerEvent::RunStarted);
    }
}

/// P / Escape toggles pause while a run is in progress.
pub fn toggle_pause(keys: Option<Res<ButtonInput<KeyCode>>>, track: Option<ResMut<TrackState>>) {
    let (Some(keys), Some(mut track)) = (keys, track) else {
        return;
    };
    if !keys.any_just_pressed([KeyCode::KeyP, KeyCode::Escape]) {
        return;
    }
    if track.pause() {
        info!(target: LOG_TARGET, "Paused");
    } else if track.resume() {
        info!(target: LOG_TARGET, "Resumed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr_core::CorePlugin;

    #[test]
    fn swipe_threshold() {
        assert_eq!(swipe_intent(-60.0, 50.0), Some(MoveIntent::Left));
        assert_eq!(swipe_intent(51.0, 50.0), Some(MoveIntent::Right));
        assert_eq!(swipe_intent(50.0, 50.0), None);
        assert_eq!(swipe_intent(-10.0, 50.0), None);
    }

    #[derive(Resource, Default)]
    struct Seen(Vec<LaneIntent>);

    fn collect(mut r: EventReader<LaneIntent>, mut seen: ResMut<Seen>) {
        seen.0.extend(r.read().copied());
    }

    #[test]
    fn keys_map_to_intents() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(CorePlugin);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<Seen>();
        app.add_systems(Update, (keyboard_lane_intents, collect).chain());
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowLeft);
        app.update();
        assert_eq!(app.world().resource::<Seen>().0, vec![LaneIntent(MoveIntent::Left)]);
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.press(KeyCode::KeyD);
        }
        app.update();
        assert_eq!(
            app.world().resource::<Seen>().0,
            vec![LaneIntent(MoveIntent::Left), LaneIntent(MoveIntent::Right)]
        );
    }

    #[test]
    fn auto_start_only_when_idle() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(CorePlugin);
        app.insert_resource(RunnerConfigRes::default());
        app.insert_resource(TrackState(
            lr_track::Track::from_config(&lr_config::RunnerConfig::default()).unwrap(),
        ));
        app.add_systems(Update, request_run_start);
        app.update();
        assert_eq!(
            app.world_mut().resource_mut::<PendingRunnerEvents>().take(),
            vec![RunnerEvent::RunStarted]
        );
        app.world_mut().resource_mut::<TrackState>().start_run().unwrap();
        app.update();
        assert!(app.world().resource::<PendingRunnerEvents>().is_empty());
    }
}
