//! Typed notification bus.
//!
//! Handlers subscribe to one [`EventKind`] and are called synchronously, in subscription
//! order, from [`EventBus::publish`]. They act on a caller-supplied context `C` (a plain
//! struct in tests and the headless runtime, the ECS `World` in the game). The first handler
//! error stops delivery and becomes the publish result. Every publish is journaled in a
//! bounded ring for diagnostics.

use std::collections::VecDeque;

use crate::{lane::Lane, segment::SegmentHandle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunnerEvent {
    /// The runner's lane changed; carries the new lane.
    LaneChanged { lane: Lane },
    /// The runner crossed a platform's midpoint trigger.
    MidpointCrossed { segment: SegmentHandle },
    RunStarted,
    HazardHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LaneChanged,
    MidpointCrossed,
    RunStarted,
    HazardHit,
}

impl RunnerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LaneChanged { .. } => EventKind::LaneChanged,
            Self::MidpointCrossed { .. } => EventKind::MidpointCrossed,
            Self::RunStarted => EventKind::RunStarted,
            Self::HazardHit => EventKind::HazardHit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    Handled,
    Ignored,
    Error(String),
}

pub trait EventHandler<C: ?Sized>: Send + Sync {
    fn handle(&mut self, ev: &RunnerEvent, ctx: &mut C) -> EventResult;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription<C: ?Sized> {
    id: SubscriptionId,
    kind: EventKind,
    handler: Box<dyn EventHandler<C>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub event: RunnerEvent,
    pub result: EventResult,
    /// Monotonic publish sequence number.
    pub seq: u64,
}

pub struct EventBus<C: ?Sized> {
    subscriptions: Vec<Subscription<C>>,
    next_id: u64,
    journal: VecDeque<JournalEntry>,
    journal_capacity: usize,
    published: u64,
}

impl<C: ?Sized> Default for EventBus<C> {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}

impl<C: ?Sized> EventBus<C> {
    pub fn with_capacity(journal_capacity: usize) -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
            journal: VecDeque::new(),
            journal_capacity,
            published: 0,
        }
    }

    pub fn subscribe<H: EventHandler<C> + 'static>(
        &mut self,
        kind: EventKind,
        handler: H,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// `false` when `id` is not subscribed to `kind` (already removed, or never was).
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| !(s.id == id && s.kind == kind));
        self.subscriptions.len() != before
    }

    pub fn publish(&mut self, ev: &RunnerEvent, ctx: &mut C) -> EventResult {
        let kind = ev.kind();
        let mut any = false;
        let mut result = None;
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            match sub.handler.handle(ev, ctx) {
                EventResult::Handled => any = true,
                EventResult::Ignored => {}
                e @ EventResult::Error(_) => {
                    result = Some(e);
                    break;
                }
            }
        }
        let result = result.unwrap_or(if any {
            EventResult::Handled
        } else {
            EventResult::Ignored
        });
        self.push_journal(*ev, result.clone());
        result
    }

    fn push_journal(&mut self, event: RunnerEvent, result: EventResult) {
        self.published += 1;
        if self.journal_capacity == 0 {
            return;
        }
        if self.journal.len() == self.journal_capacity {
            self.journal.pop_front();
        }
        self.journal.push_back(JournalEntry {
            event,
            result,
            seq: self.published,
        });
    }

    pub fn journal(&self) -> impl DoubleEndedIterator<Item = &JournalEntry> {
        self.journal.iter()
    }

    pub fn set_journal_capacity(&mut self, cap: usize) {
        self.journal_capacity = cap;
        while self.journal.len() > cap {
            self.journal.pop_front();
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }

    /// Handler names for `kind`, in delivery order.
    pub fn subscribers(&self, kind: EventKind) -> Vec<&'static str> {
        self.subscriptions
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.handler.name())
            .collect()
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    struct Recorder(&'static str);
    impl EventHandler<Log> for Recorder {
        fn handle(&mut self, ev: &RunnerEvent, ctx: &mut Log) -> EventResult {
            ctx.0.push(format!("{}:{:?}", self.0, ev.kind()));
            EventResult::Handled
        }
        fn name(&self) -> &'static str {
            self.0
        }
    }

    struct Failing;
    impl EventHandler<Log> for Failing {
        fn handle(&mut self, _ev: &RunnerEvent, _ctx: &mut Log) -> EventResult {
            EventResult::Error("boom".into())
        }
        fn name(&self) -> &'static str {
            "Failing"
        }
    }

    #[test]
    fn delivers_in_subscription_order_to_matching_kind() {
        let mut bus = EventBus::<Log>::default();
        bus.subscribe(EventKind::RunStarted, Recorder("a"));
        bus.subscribe(EventKind::HazardHit, Recorder("x"));
        bus.subscribe(EventKind::RunStarted, Recorder("b"));
        let mut log = Log::default();
        assert_eq!(bus.publish(&RunnerEvent::RunStarted, &mut log), EventResult::Handled);
        assert_eq!(log.0, vec!["a:RunStarted", "b:RunStarted"]);
        assert_eq!(bus.subscribers(EventKind::RunStarted), vec!["a", "b"]);
    }

    #[test]
    fn no_subscribers_is_ignored() {
        let mut bus = EventBus::<Log>::default();
        let mut log = Log::default();
        assert_eq!(bus.publish(&RunnerEvent::HazardHit, &mut log), EventResult::Ignored);
        assert!(log.0.is_empty());
    }

    #[test]
    fn unsubscribe_by_kind_and_id() {
        let mut bus = EventBus::<Log>::default();
        let id = bus.subscribe(EventKind::LaneChanged, Recorder("a"));
        assert!(!bus.unsubscribe(EventKind::HazardHit, id));
        assert!(bus.unsubscribe(EventKind::LaneChanged, id));
        assert!(!bus.unsubscribe(EventKind::LaneChanged, id));
        assert_eq!(bus.subscriber_count(EventKind::LaneChanged), 0);
    }

    #[test]
    fn error_stops_delivery() {
        let mut bus = EventBus::<Log>::default();
        bus.subscribe(EventKind::HazardHit, Failing);
        bus.subscribe(EventKind::HazardHit, Recorder("after"));
        let mut log = Log::default();
        assert_eq!(
            bus.publish(&RunnerEvent::HazardHit, &mut log),
            EventResult::Error("boom".into())
        );
        assert!(log.0.is_empty());
    }

    #[test]
    fn journal_is_bounded() {
        let mut bus = EventBus::<Log>::with_capacity(2);
        let mut log = Log::default();
        bus.publish(&RunnerEvent::RunStarted, &mut log);
        bus.publish(&RunnerEvent::LaneChanged { lane: Lane::Left }, &mut log);
        bus.publish(&RunnerEvent::HazardHit, &mut log);
        let entries: Vec<_> = bus.journal().map(|e| (e.seq, e.event.kind())).collect();
        assert_eq!(
            entries,
            vec![(2, EventKind::LaneChanged), (3, EventKind::HazardHit)]
        );
        assert_eq!(bus.published(), 3);
        bus.set_journal_capacity(1);
        assert_eq!(bus.journal().count(), 1);
    }
}
