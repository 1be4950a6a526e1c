// Headless steering: follow the newest platform's lane. A new platform always starts at the
// midpoint the runner just crossed, so switching as soon as it appears keeps the runner
// supported through the slide.

use bevy::prelude::*;
use lr_core::{LaneIntent, LaneMotion, Player, RunnerSet, TrackState};
use lr_track::{Lane, MoveIntent, RunPhase};

/// One step from `from` towards `to`, or `None` when already there.
pub fn step_towards(from: Lane, to: Lane) -> Option<MoveIntent> {
    let (a, b) = (from.offset(1.0), to.offset(1.0));
    if b < a {
        Some(MoveIntent::Left)
    } else if b > a {
        Some(MoveIntent::Right)
    } else {
        None
    }
}

pub fn autopilot_steer(
    track: Option<Res<TrackState>>,
    q: Query<&LaneMotion, With<Player>>,
    mut out: EventWriter<LaneIntent>,
) {
    let Some(track) = track else { return };
    if track.phase() != RunPhase::Playing {
        return;
    }
    let Some(motion) = q.iter().next() else { return };
    let Some((_, newest)) = track.live_segments().last() else {
        return;
    };
    let target = Lane::nearest(newest.placement.lateral, track.params().lane_distance);
    if let Some(intent) = step_towards(motion.lane, target) {
        out.write(LaneIntent(intent));
    }
}

pub struct AutopilotPlugin;

impl Plugin for AutopilotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, autopilot_steer.in_set(RunnerSet::Input));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_one_lane_at_a_time() {
        assert_eq!(step_towards(Lane::Middle, Lane::Left), Some(MoveIntent::Left));
        assert_eq!(step_towards(Lane::Left, Lane::Right), Some(MoveIntent::Right));
        assert_eq!(step_towards(Lane::Right, Lane::Right), None);
    }
}
