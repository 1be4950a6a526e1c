//! Three-lane state machine.
//!
//! Lanes are a plain enum; a move is a pure function of `(lane, intent)`. Moving off the
//! edge of the track is not an error, the lane simply stays where it is.

/// One of the three lateral rails the runner can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lane {
    Left,
    #[default]
    Middle,
    Right,
}

/// Discrete directional intent delivered by input (key press, swipe, autopilot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveIntent {
    Left,
    Right,
}

/// Result of applying an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneTransition {
    pub lane: Lane,
    pub changed: bool,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Middle, Lane::Right];

    /// Lane reached by `intent`; edges absorb moves that would leave the track.
    pub fn apply(self, intent: MoveIntent) -> LaneTransition {
        let lane = match (self, intent) {
            (Lane::Left, MoveIntent::Left) => Lane::Left,
            (Lane::Left, MoveIntent::Right) => Lane::Middle,
            (Lane::Middle, MoveIntent::Left) => Lane::Left,
            (Lane::Middle, MoveIntent::Right) => Lane::Right,
            (Lane::Right, MoveIntent::Left) => Lane::Middle,
            (Lane::Right, MoveIntent::Right) => Lane::Right,
        };
        LaneTransition {
            lane,
            changed: lane != self,
        }
    }

    /// Signed lateral offset from the track centreline.
    pub fn offset(self, lane_distance: f32) -> f32 {
        match self {
            Lane::Left => -lane_distance,
            Lane::Middle => 0.0,
            Lane::Right => lane_distance,
        }
    }

    pub fn can_move(self, intent: MoveIntent) -> bool {
        self.apply(intent).changed
    }

    /// True when `other` is this lane or a direct neighbour.
    pub fn reaches(self, other: Lane) -> bool {
        (self.index() as i8 - other.index() as i8).abs() <= 1
    }

    /// Nearest lane to a lateral position.
    pub fn nearest(lateral: f32, lane_distance: f32) -> Lane {
        if lateral <= -lane_distance * 0.5 {
            Lane::Left
        } else if lateral >= lane_distance * 0.5 {
            Lane::Right
        } else {
            Lane::Middle
        }
    }

    fn index(self) -> u8 {
        match self {
            Lane::Left => 0,
            Lane::Middle => 1,
            Lane::Right => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Lane::Left => "Left",
            Lane::Middle => "Middle",
            Lane::Right => "Right",
        }
    }
}

/// Free-function form of [`Lane::apply`]: `(new_lane, changed)`.
pub fn apply(state: Lane, intent: MoveIntent) -> (Lane, bool) {
    let t = state.apply(intent);
    (t.lane, t.changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        assert_eq!(apply(Lane::Left, MoveIntent::Left), (Lane::Left, false));
        assert_eq!(apply(Lane::Left, MoveIntent::Right), (Lane::Middle, true));
        assert_eq!(apply(Lane::Middle, MoveIntent::Left), (Lane::Left, true));
        assert_eq!(apply(Lane::Middle, MoveIntent::Right), (Lane::Right, true));
        assert_eq!(apply(Lane::Right, MoveIntent::Left), (Lane::Middle, true));
        assert_eq!(apply(Lane::Right, MoveIntent::Right), (Lane::Right, false));
    }

    #[test]
    fn offsets_are_symmetric() {
        assert_eq!(Lane::Left.offset(2.0), -2.0);
        assert_eq!(Lane::Middle.offset(2.0), 0.0);
        assert_eq!(Lane::Right.offset(2.0), 2.0);
    }

    #[test]
    fn edge_lanes_block_outward_moves() {
        assert!(!Lane::Left.can_move(MoveIntent::Left));
        assert!(!Lane::Right.can_move(MoveIntent::Right));
        assert!(Lane::Middle.can_move(MoveIntent::Left));
        assert!(Lane::Middle.can_move(MoveIntent::Right));
    }

    #[test]
    fn reachability() {
        assert!(Lane::Middle.reaches(Lane::Left));
        assert!(Lane::Middle.reaches(Lane::Right));
        assert!(Lane::Left.reaches(Lane::Left));
        assert!(!Lane::Left.reaches(Lane::Right));
        assert!(!Lane::Right.reaches(Lane::Left));
    }

    #[test]
    fn nearest_lane_rounds_to_rail() {
        assert_eq!(Lane::nearest(-1.9, 2.0), Lane::Left);
        assert_eq!(Lane::nearest(-0.9, 2.0), Lane::Middle);
        assert_eq!(Lane::nearest(0.9, 2.0), Lane::Middle);
        assert_eq!(Lane::nearest(1.0, 2.0), Lane::Right);
    }

    #[test]
    fn default_lane_is_middle() {
        assert_eq!(Lane::default(), Lane::Middle);
    }
}
