use crate::{live::LiveSegments, pool::SegmentPool, segment::SegmentHandle};

/// Release the oldest live segment once the runner is more than `margin` past its start.
///
/// Only the front is ever considered and at most one segment is recycled per call. A front
/// handle the pool no longer recognises is dropped from the queue without counting as a
/// recycle.
pub fn maybe_recycle(
    live: &mut LiveSegments,
    pool: &mut SegmentPool,
    player_forward: f32,
    margin: f32,
) -> Option<SegmentHandle> {
    let front = live.front()?;
    let Some(seg) = pool.get(front) else {
        live.pop_front();
        return None;
    };
    if player_forward > seg.forward() + margin {
        live.pop_front();
        pool.release(front);
        Some(front)
    } else {
        None
    }
}
