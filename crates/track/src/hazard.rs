//! Fire-ground conveyor.
//!
//! A fixed set of long hazard strips lies end to end under the track. When the runner is a
//! full strip length past the oldest strip's start, that strip jumps to the front of the
//! line. Strips are moved, never released, so the pool only churns on reset.

use crate::{
    error::PoolError,
    live::LiveSegments,
    params::HazardParams,
    pool::SegmentPool,
    segment::{Placement, Segment, SegmentHandle, SegmentKind},
};

#[derive(Debug, Clone)]
pub struct HazardConveyor {
    params: HazardParams,
    /// Strips are as wide as the three lanes plus one platform width.
    width: f32,
    pool: SegmentPool,
    strips: LiveSegments,
    last_forward: f32,
}

impl HazardConveyor {
    pub fn new(params: HazardParams, width: f32) -> Self {
        Self {
            params,
            width,
            pool: SegmentPool::new(SegmentKind::Hazard, params.strip_count, params.strip_count),
            strips: LiveSegments::new(),
            last_forward: 0.0,
        }
    }

    /// Lay out the strips from the origin: `0, L, 2L, ...`.
    pub fn reset(&mut self) -> Result<(), PoolError> {
        for h in self.strips.drain() {
            self.pool.release(h);
        }
        let len = self.params.strip_length;
        for i in 0..self.params.strip_count {
            let acquired = self.pool.acquire()?;
            let forward = i as f32 * len;
            if let Some(seg) = self.pool.get_mut(acquired.handle) {
                seg.length = len;
                seg.width = self.width;
                seg.placement = Placement::new(0.0, self.params.height, forward);
            }
            self.strips.push_back(acquired.handle);
            self.last_forward = forward;
        }
        Ok(())
    }

    /// Leapfrog the oldest strip if the runner has left it behind. Returns the moved strip.
    pub fn update(&mut self, player_forward: f32) -> Option<SegmentHandle> {
        let front = self.strips.front()?;
        let len = self.params.strip_length;
        let seg = self.pool.get_mut(front)?;
        if player_forward <= seg.forward() + len {
            return None;
        }
        self.last_forward += len;
        seg.placement.forward = self.last_forward;
        self.strips.pop_front();
        self.strips.push_back(front);
        Some(front)
    }

    /// True when some strip lies under `forward`.
    pub fn covers(&self, forward: f32) -> bool {
        self.segments()
            .any(|(_, s)| forward >= s.forward() && forward <= s.far_edge())
    }

    pub fn segments(&self) -> impl Iterator<Item = (SegmentHandle, &Segment)> {
        let pool = &self.pool;
        self.strips
            .iter()
            .filter_map(move |h| pool.get(h).map(|s| (h, s)))
    }

    pub fn pool(&self) -> &SegmentPool {
        &self.pool
    }

    pub fn last_forward(&self) -> f32 {
        self.last_forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conveyor() -> HazardConveyor {
        let mut c = HazardConveyor::new(
            HazardParams {
                strip_length: 100.0,
                height: -0.5,
                strip_count: 2,
            },
            6.0,
        );
        c.reset().unwrap();
        c
    }

    fn forwards(c: &HazardConveyor) -> Vec<f32> {
        c.segments().map(|(_, s)| s.forward()).collect()
    }

    #[test]
    fn reset_lays_strips_end_to_end() {
        let c = conveyor();
        assert_eq!(forwards(&c), vec![0.0, 100.0]);
        assert_eq!(c.last_forward(), 100.0);
        assert!(c.segments().all(|(_, s)| s.placement.height == -0.5));
    }

    #[test]
    fn oldest_strip_leapfrogs() {
        let mut c = conveyor();
        assert!(c.update(100.0).is_none());
        let moved = c.update(100.5).unwrap();
        assert_eq!(forwards(&c), vec![100.0, 200.0]);
        assert_eq!(c.segments().last().map(|(h, _)| h), Some(moved));
        assert!(c.update(150.0).is_none());
        assert!(c.update(201.0).is_some());
        assert_eq!(forwards(&c), vec![200.0, 300.0]);
    }

    #[test]
    fn coverage_follows_strips() {
        let mut c = conveyor();
        assert!(c.covers(0.0));
        assert!(c.covers(199.0));
        assert!(!c.covers(250.0));
        c.update(120.0);
        assert!(c.covers(250.0));
        assert!(!c.covers(50.0));
    }

    #[test]
    fn reset_after_travel_returns_to_origin() {
        let mut c = conveyor();
        c.update(150.0);
        c.reset().unwrap();
        assert_eq!(forwards(&c), vec![0.0, 100.0]);
        assert_eq!(c.pool().len(), 2);
    }
}
