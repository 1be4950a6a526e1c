//! Midpoint advance triggers.
//!
//! Each live platform carries a trigger zone at `forward + length / 2`, as wide as the
//! platform. A crossing is a step that starts before the midpoint and ends on or past it
//! while the runner is laterally inside the zone. Triggers fire once per activation.

use crate::{live::LiveSegments, pool::SegmentPool, segment::Segment, segment::SegmentHandle};

/// Pure crossing test, ignoring the fired flag.
pub fn crosses(segment: &Segment, prev_forward: f32, cur_forward: f32, lateral: f32) -> bool {
    let mid = segment.midpoint();
    prev_forward < mid
        && cur_forward >= mid
        && (lateral - segment.placement.lateral).abs() <= segment.width * 0.5
}

/// Marks and returns every live segment whose trigger was crossed by this step.
pub fn detect(
    live: &LiveSegments,
    pool: &mut SegmentPool,
    prev_forward: f32,
    cur_forward: f32,
    lateral: f32,
) -> Vec<SegmentHandle> {
    let mut fired = Vec::new();
    for handle in live.iter() {
        let Some(seg) = pool.get_mut(handle) else {
            continue;
        };
        if seg.triggered || !crosses(seg, prev_forward, cur_forward, lateral) {
            continue;
        }
        seg.triggered = true;
        fired.push(handle);
    }
    fired
}
