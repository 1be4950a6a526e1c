// Player motion: lane changes, lateral slide and constant forward speed along +Z.

use bevy::prelude::*;
use lr_core::{
    LaneIntent, LaneMotion, PendingRunnerEvents, Player, PlayerProgress, RunnerConfigRes,
    TrackState,
};
use lr_track::{RunPhase, RunnerEvent};

const LOG_TARGET: &str = "lr_gameplay::motion";

fn is_playing(track: &Option<Res<TrackState>>) -> bool {
    track.as_ref().is_some_and(|t| t.phase() == RunPhase::Playing)
}

/// Apply lane intents to the runner. Accepted moves retarget the slide and are reported as
/// LaneChanged; moves off the edge of the track are dropped silently.
pub fn apply_lane_intents(
    mut intents: EventReader<LaneIntent>,
    track: Option<Res<TrackState>>,
    cfg: Option<Res<RunnerConfigRes>>,
    mut q: Query<&mut LaneMotion, With<Player>>,
    mut pending: ResMut<PendingRunnerEvents>,
) {
    if !is_playing(&track) {
        intents.clear();
        return;
    }
    let Some(mut motion) = q.iter_mut().next() else {
        intents.clear();
        return;
    };
    let cfg = cfg.map(|c| c.0.clone()).unwrap_or_default();
    for LaneIntent(intent) in intents.read() {
        let t = motion.lane.apply(*intent);
        if !t.changed {
            continue;
        }
        motion.retarget(
            t.lane,
            cfg.track.lane_distance,
            cfg.player.lane_switch_duration,
        );
        debug!(target: LOG_TARGET, "Lane -> {}", t.lane.name());
        pending.push(RunnerEvent::LaneChanged { lane: t.lane });
    }
}

pub fn slide_lanes(time: Res<Time>, mut q: Query<(&mut LaneMotion, &mut Transform), With<Player>>) {
    let dt = time.delta_secs();
    for (mut motion, mut tf) in q.iter_mut() {
        if !motion.is_settled() {
            motion.elapsed += dt;
        }
        tf.translation.x = motion.current_x();
    }
}

/// Move forward while playing. `prev_forward` is refreshed every frame so a paused or
/// finished run never reports a stale step.
pub fn advance_player(
    time: Res<Time>,
    track: Option<Res<TrackState>>,
    cfg: Option<Res<RunnerConfigRes>>,
    mut q: Query<(&mut Transform, &mut PlayerProgress), With<Player>>,
) {
    let playing = is_playing(&track);
    let speed = cfg
        .map(|c| c.0.player.forward_speed)
        .unwrap_or(lr_config::PlayerConfig::default().forward_speed);
    for (mut tf, mut progress) in q.iter_mut() {
        progress.prev_forward = tf.translation.z;
        if playing {
            tf.translation.z += speed * time.delta_secs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use lr_core::CorePlugin;
    use lr_track::{Lane, MoveIntent};
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(CorePlugin);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(RunnerConfigRes::default());
        let mut track = lr_track::Track::from_config(&lr_config::RunnerConfig::default()).unwrap();
        track.start_run().unwrap();
        app.insert_resource(TrackState(track));
        app.world_mut().spawn((
            Player,
            LaneMotion::default(),
            PlayerProgress::default(),
            Transform::default(),
        ));
        app.add_systems(
            Update,
            (apply_lane_intents, slide_lanes, advance_player)
                .chain()
                .in_set(lr_core::RunnerSet::Motion),
        );
        app
    }

    fn player(app: &mut App) -> (LaneMotion, Transform, PlayerProgress) {
        let world = app.world_mut();
        let mut q = world.query::<(&LaneMotion, &Transform, &PlayerProgress)>();
        let (m, t, p) = q.iter(world).next().expect("player");
        (*m, *t, *p)
    }

    #[test]
    fn forward_motion_accumulates() {
        let mut app = app();
        app.update();
        app.update();
        app.update();
        let (_, tf, progress) = player(&mut app);
        assert!(tf.translation.z > 0.0);
        assert!(progress.prev_forward < tf.translation.z);
    }

    #[test]
    fn intents_change_lane_and_report() {
        let mut app = app();
        app.world_mut().send_event(LaneIntent(MoveIntent::Left));
        app.world_mut().send_event(LaneIntent(MoveIntent::Left));
        app.update();
        let (motion, _, _) = player(&mut app);
        assert_eq!(motion.lane, Lane::Left);
        let pending = app.world_mut().resource_mut::<PendingRunnerEvents>().take();
        assert_eq!(pending, vec![RunnerEvent::LaneChanged { lane: Lane::Left }]);
        for _ in 0..5 {
            app.update();
        }
        let (_, tf, _) = player(&mut app);
        assert_eq!(tf.translation.x, -2.0);
    }

    #[test]
    fn no_motion_when_not_playing() {
        let mut app = app();
        app.world_mut().resource_mut::<TrackState>().hazard_hit();
        app.world_mut().send_event(LaneIntent(MoveIntent::Right));
        app.update();
        app.update();
        let (motion, tf, _) = player(&mut app);
        assert_eq!(motion.lane, Lane::Middle);
        assert_eq!(tf.translation.z, 0.0);
        assert!(app.world().resource::<PendingRunnerEvents>().is_empty());
    }
}
