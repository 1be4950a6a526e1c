// Detection: midpoint crossings and fire-ground contact. Both only raise notifications;
// the track reacts when they are dispatched.

use bevy::prelude::*;
use lr_core::{PendingRunnerEvents, Player, PlayerProgress, TrackState};
use lr_track::{RunPhase, RunnerEvent};

const LOG_TARGET: &str = "lr_gameplay::detect";

pub fn detect_midpoints(
    track: Option<ResMut<TrackState>>,
    q: Query<(&Transform, &PlayerProgress), With<Player>>,
    mut pending: ResMut<PendingRunnerEvents>,
) {
    let Some(mut track) = track else { return };
    let Some((tf, progress)) = q.iter().next() else {
        return;
    };
    let crossed =
        track.detect_crossings(progress.prev_forward, tf.translation.z, tf.translation.x);
    for segment in crossed {
        debug!(target: LOG_TARGET, "Midpoint crossed on {segment}");
        pending.push(RunnerEvent::MidpointCrossed { segment });
    }
}

/// Leapfrog the fire ground, then report contact when the runner is over it with no
/// platform underneath.
pub fn hazard_contact(
    track: Option<ResMut<TrackState>>,
    q: Query<&Transform, With<Player>>,
    mut pending: ResMut<PendingRunnerEvents>,
) {
    let Some(mut track) = track else { return };
    if track.phase() != RunPhase::Playing {
        return;
    }
    let Some(tf) = q.iter().next() else { return };
    let (lateral, forward) = (tf.translation.x, tf.translation.z);
    if let Some(strip) = track.update_hazards(forward) {
        debug!(target: LOG_TARGET, "Fire ground {strip} moved ahead");
    }
    if track.over_hazard(forward) && !track.supports(lateral, forward) {
        pending.push(RunnerEvent::HazardHit);
    }
}
