//! Bounded segment arena.
//!
//! Slots are created up to `max_size` and never destroyed; released slots go onto a FIFO
//! free list and are handed out again before any new slot is built. Each activation bumps
//! the slot generation so that handles from a previous life stop resolving.

use std::collections::VecDeque;

use crate::{
    error::PoolError,
    segment::{Segment, SegmentHandle, SegmentKind},
};

#[derive(Debug, Clone)]
struct Slot {
    segment: Segment,
    generation: u32,
}

/// Result of [`SegmentPool::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired {
    pub handle: SegmentHandle,
    /// Set when the pool was full and a live segment had to be reclaimed.
    pub evicted: Option<SegmentHandle>,
}

#[derive(Debug, Clone)]
pub struct SegmentPool {
    kind: SegmentKind,
    slots: Vec<Slot>,
    free: VecDeque<u32>,
    max_size: usize,
}

impl SegmentPool {
    /// Pre-warms `min(initial_size, max_size)` inactive slots.
    pub fn new(kind: SegmentKind, initial_size: usize, max_size: usize) -> Self {
        let warm = initial_size.min(max_size);
        let mut pool = Self {
            kind,
            slots: Vec::with_capacity(max_size),
            free: VecDeque::with_capacity(max_size),
            max_size,
        };
        for _ in 0..warm {
            let index = pool.push_slot();
            pool.free.push_back(index);
        }
        pool
    }

    fn push_slot(&mut self) -> u32 {
        self.slots.push(Slot {
            segment: Segment::inactive(self.kind),
            generation: 0,
        });
        (self.slots.len() - 1) as u32
    }

    fn activate(&mut self, index: u32) -> SegmentHandle {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.segment.reset();
        slot.segment.active = true;
        SegmentHandle {
            index,
            generation: slot.generation,
        }
    }

    pub fn acquire(&mut self) -> Result<Acquired, PoolError> {
        if let Some(index) = self.free.pop_front() {
            return Ok(Acquired {
                handle: self.activate(index),
                evicted: None,
            });
        }
        if self.slots.len() < self.max_size {
            let index = self.push_slot();
            return Ok(Acquired {
                handle: self.activate(index),
                evicted: None,
            });
        }
        if self.slots.is_empty() {
            return Err(PoolError::ZeroCapacity);
        }
        // Full and nothing free: every slot is live. Reclaim the first one.
        let evicted = SegmentHandle {
            index: 0,
            generation: self.slots[0].generation,
        };
        Ok(Acquired {
            handle: self.activate(0),
            evicted: Some(evicted),
        })
    }

    /// Returns the slot to the free list. `false` for stale or already released handles.
    pub fn release(&mut self, handle: SegmentHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if slot.generation != handle.generation || !slot.segment.active {
            return false;
        }
        slot.segment.reset();
        self.free.push_back(handle.index);
        true
    }

    pub fn get(&self, handle: SegmentHandle) -> Option<&Segment> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.segment.active)
            .map(|s| &s.segment)
    }

    pub fn get_mut(&mut self, handle: SegmentHandle) -> Option<&mut Segment> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.segment.active)
            .map(|s| &mut s.segment)
    }

    /// Every slot ever built, active or not, with its current handle.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentHandle, &Segment)> {
        self.slots.iter().enumerate().map(|(i, s)| {
            (
                SegmentHandle {
                    index: i as u32,
                    generation: s.generation,
                },
                &s.segment,
            )
        })
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    pub fn max_size(&self) -> usize {
        self.max_size
    }
    pub fn available(&self) -> usize {
        self.free.len()
    }
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.segment.active).count()
    }
}
