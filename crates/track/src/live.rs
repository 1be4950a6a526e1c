use std::collections::VecDeque;

use crate::segment::SegmentHandle;

/// FIFO of live segment handles in spawn order. Spawns only ever move forward, so front to
/// back is also nearest to farthest.
#[derive(Debug, Clone, Default)]
pub struct LiveSegments {
    queue: VecDeque<SegmentHandle>,
}

impl LiveSegments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, handle: SegmentHandle) {
        self.queue.push_back(handle);
    }

    pub fn front(&self) -> Option<SegmentHandle> {
        self.queue.front().copied()
    }

    pub fn back(&self) -> Option<SegmentHandle> {
        self.queue.back().copied()
    }

    pub fn pop_front(&mut self) -> Option<SegmentHandle> {
        self.queue.pop_front()
    }

    /// Drops a handle from anywhere in the queue (forced pool reclaim).
    pub fn remove(&mut self, handle: SegmentHandle) -> bool {
        match self.queue.iter().position(|h| *h == handle) {
            Some(pos) => {
                self.queue.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, handle: SegmentHandle) -> bool {
        self.queue.contains(&handle)
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SegmentHandle> + '_ {
        self.queue.drain(..)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = SegmentHandle> + '_ {
        self.queue.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(index: u32) -> SegmentHandle {
        SegmentHandle {
            index,
            generation: 1,
        }
    }

    #[test]
    fn fifo_order() {
        let mut live = LiveSegments::new();
        live.push_back(h(0));
        live.push_back(h(1));
        live.push_back(h(2));
        assert_eq!(live.front(), Some(h(0)));
        assert_eq!(live.back(), Some(h(2)));
        assert_eq!(live.pop_front(), Some(h(0)));
        assert_eq!(live.iter().collect::<Vec<_>>(), vec![h(1), h(2)]);
    }

    #[test]
    fn remove_from_middle() {
        let mut live = LiveSegments::new();
        for i in 0..3 {
            live.push_back(h(i));
        }
        assert!(live.remove(h(1)));
        assert!(!live.remove(h(1)));
        assert_eq!(live.iter().collect::<Vec<_>>(), vec![h(0), h(2)]);
    }
}
