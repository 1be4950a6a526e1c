//! Procedural track engine for a three-lane endless runner.
//!
//! Engine-free: platforms are pool slots addressed by generation-checked handles, the live
//! set is a FIFO in spawn order, and every decision is a plain function of the state handed
//! in. Hosts feed it lane reports, midpoint crossings and the runner's forward position,
//! either directly through [`Track`] or through the [`EventBus`].

pub mod chooser;
pub mod error;
pub mod events;
pub mod generator;
pub mod hazard;
pub mod lane;
pub mod live;
pub mod params;
pub mod pool;
pub mod recycler;
pub mod runtime;
pub mod segment;
pub mod track;
pub mod trigger;

pub use chooser::{LaneChooser, RandomLaneChooser, ScriptedLaneChooser};
pub use error::{PoolError, TrackError, TrackWarning};
pub use events::{
    EventBus, EventHandler, EventKind, EventResult, JournalEntry, RunnerEvent, SubscriptionId,
};
pub use generator::{GeneratorState, NextPlacement, Spawned, TrackGenerator};
pub use hazard::HazardConveyor;
pub use lane::{Lane, LaneTransition, MoveIntent};
pub use live::LiveSegments;
pub use params::{HazardParams, TrackParams};
pub use pool::{Acquired, SegmentPool};
pub use runtime::{PositionSource, TrackRuntime};
pub use segment::{Placement, Segment, SegmentHandle, SegmentKind};
pub use track::{Advance, RunPhase, Track, TrackStats};
