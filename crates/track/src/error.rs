use std::fmt;

use lr_config::ConfigError;

use crate::{lane::Lane, segment::SegmentHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// `max_size` is 0: the pool can never produce a segment.
    ZeroCapacity,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "segment pool has max_size 0"),
        }
    }
}

impl std::error::Error for PoolError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    Config(ConfigError),
    Pool(PoolError),
    /// A collaborator needed at call time (position source, track, player) is absent.
    MissingCollaborator(&'static str),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid track config: {e}"),
            Self::Pool(e) => write!(f, "spawn skipped: {e}"),
            Self::MissingCollaborator(name) => write!(f, "missing collaborator: {name}"),
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pool(e) => Some(e),
            Self::MissingCollaborator(_) => None,
        }
    }
}

impl From<ConfigError> for TrackError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PoolError> for TrackError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

/// Recoverable degradations. The engine carries on; callers decide how loudly to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackWarning {
    /// No lane notification arrived before a spawn; placed in the middle lane.
    UnknownLane,
    /// The lane chooser answered with a lane not adjacent to the current one.
    IllegalLaneChoice { from: Lane, to: Lane },
    /// Pool was at `max_size` with nothing free; a live segment was force-reclaimed.
    PoolExhausted { evicted: SegmentHandle },
    /// A midpoint notification named a segment that is no longer live.
    StaleTrigger { segment: SegmentHandle },
}

impl fmt::Display for TrackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLane => write!(f, "player lane unknown; spawning in the middle lane"),
            Self::IllegalLaneChoice { from, to } => write!(
                f,
                "lane chooser picked {} from {}; keeping {}",
                to.name(),
                from.name(),
                from.name()
            ),
            Self::PoolExhausted { evicted } => {
                write!(f, "platform pool exhausted; evicted live segment {evicted}")
            }
            Self::StaleTrigger { segment } => {
                write!(f, "midpoint trigger from recycled segment {segment} ignored")
            }
        }
    }
}
