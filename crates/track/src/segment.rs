//! Track segments: the unit the pools hand out and the generator places.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Walkable platform in one lane.
    Platform,
    /// Fire-ground strip under the whole track.
    Hazard,
}

/// World placement. `forward` is the segment's near edge along +Z; it spans
/// `forward..forward + length`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub lateral: f32,
    pub height: f32,
    pub forward: f32,
}

impl Placement {
    pub const REST: Placement = Placement {
        lateral: 0.0,
        height: 0.0,
        forward: 0.0,
    };

    pub fn new(lateral: f32, height: f32, forward: f32) -> Self {
        Self {
            lateral,
            height,
            forward,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.lateral, self.height, self.forward]
    }
}

/// Reference to a pool slot. The generation changes every time the slot is activated,
/// so a handle kept past a release or a forced reclaim no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentHandle {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for SegmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub length: f32,
    pub width: f32,
    pub lateral_offset: f32,
    pub placement: Placement,
    pub active: bool,
    /// Midpoint trigger already fired for this activation.
    pub triggered: bool,
}

impl Segment {
    pub fn inactive(kind: SegmentKind) -> Self {
        Self {
            kind,
            length: 0.0,
            width: 0.0,
            lateral_offset: 0.0,
            placement: Placement::REST,
            active: false,
            triggered: false,
        }
    }

    pub fn forward(&self) -> f32 {
        self.placement.forward
    }

    pub fn far_edge(&self) -> f32 {
        self.placement.forward + self.length
    }

    pub fn midpoint(&self) -> f32 {
        self.placement.forward + self.length * 0.5
    }

    /// True when `(lateral, forward)` lies on this segment's footprint.
    pub fn covers(&self, lateral: f32, forward: f32) -> bool {
        let half_w = self.width * 0.5;
        (lateral - self.placement.lateral).abs() <= half_w
            && forward >= self.placement.forward
            && forward <= self.far_edge()
    }

    pub(crate) fn reset(&mut self) {
        self.length = 0.0;
        self.width = 0.0;
        self.lateral_offset = 0.0;
        self.placement = Placement::REST;
        self.active = false;
        self.triggered = false;
    }
}
