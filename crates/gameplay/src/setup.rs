// Startup: build the track from config and spawn the runner.
// A config that fails `check` leaves the app running without a track; every system that
// needs one returns early.

use bevy::prelude::*;
use lr_core::{LaneMotion, Player, PlayerProgress, RngSeed, RunnerConfigRes, TrackState};
use lr_track::Track;

const LOG_TARGET: &str = "lr_gameplay::setup";

pub fn setup_track(
    mut commands: Commands,
    cfg: Option<Res<RunnerConfigRes>>,
    seed: Option<Res<RngSeed>>,
) {
    let mut cfg = cfg.map(|c| c.0.clone()).unwrap_or_default();
    if let Some(seed) = seed {
        cfg.seed = seed.0;
    }
    for w in cfg.validate() {
        warn!(target: LOG_TARGET, "CONFIG WARNING: {w}");
    }
    match Track::from_config(&cfg) {
        Ok(track) => {
            info!(
                target: LOG_TARGET,
                seed = cfg.seed,
                pool_max = cfg.pool.max_size,
                peak_live = cfg.peak_live_estimate(),
                hazards = cfg.hazard.enabled,
                "Track ready"
            );
            commands.insert_resource(TrackState(track));
        }
        Err(e) => error!(target: LOG_TARGET, "Track not built: {e}"),
    }
}

pub fn spawn_player(mut commands: Commands, existing: Query<(), With<Player>>) {
    if !existing.is_empty() {
        return;
    }
    commands.spawn((
        Player,
        LaneMotion::default(),
        PlayerProgress::default(),
        Transform::default(),
    ));
}

/// Put the runner back on the start line in the middle lane.
pub fn reset_player(world: &mut World) -> bool {
    let mut q = world
        .query_filtered::<(&mut Transform, &mut LaneMotion, &mut PlayerProgress), With<Player>>();
    let Some((mut tf, mut motion, mut progress)) = q.iter_mut(world).next() else {
        return false;
    };
    tf.translation = Vec3::ZERO;
    *motion = LaneMotion::default();
    progress.prev_forward = 0.0;
    true
}

/// Runner position as `(lateral, forward)`.
pub fn player_position(world: &mut World) -> Option<(f32, f32)> {
    let mut q = world.query_filtered::<&Transform, With<Player>>();
    q.iter(world)
        .next()
        .map(|tf| (tf.translation.x, tf.translation.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr_config::RunnerConfig;

    #[test]
    fn bad_config_leaves_no_track() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let mut cfg = RunnerConfig::default();
        cfg.pool.max_size = 0;
        app.insert_resource(RunnerConfigRes(cfg));
        app.add_systems(Startup, setup_track);
        app.update();
        assert!(app.world().get_resource::<TrackState>().is_none());
    }

    #[test]
    fn seed_resource_overrides_config() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(RunnerConfigRes::default());
        app.insert_resource(RngSeed(77));
        app.add_systems(Startup, (setup_track, spawn_player));
        app.update();
        let world = app.world_mut();
        let mut q = world.query::<&Player>();
        assert_eq!(q.iter(world).count(), 1);

        fn layout(track: &mut Track) -> Vec<(f32, f32)> {
            track.start_run().unwrap();
            (0..24)
                .map(|_| {
                    let placed = track.spawn_next().unwrap().placement;
                    (placed.lateral, placed.forward)
                })
                .collect()
        }
        let built = layout(&mut app.world_mut().resource_mut::<TrackState>());
        let mut seeded = RunnerConfig::default();
        seeded.seed = 77;
        let expected = layout(&mut Track::from_config(&seeded).unwrap());
        let unseeded = layout(&mut Track::from_config(&RunnerConfig::default()).unwrap());
        assert_eq!(built, expected);
        assert_ne!(built, unseeded);
    }

    #[test]
    fn reset_moves_player_to_origin() {
        let mut world = World::new();
        world.spawn((
            Player,
            LaneMotion::default(),
            PlayerProgress { prev_forward: 40.0 },
            Transform::from_xyz(-2.0, 0.0, 41.0),
        ));
        assert!(reset_player(&mut world));
        assert_eq!(player_position(&mut world), Some((0.0, 0.0)));
    }
}
