// Pure configuration crate (no Bevy dependency).
// Provides: data structures, layered RON loading, non-fatal validation warnings and a
// fatal `check` used by the track engine before it builds anything.

use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// World units per second along +Z.
    pub forward_speed: f32,
    /// Seconds taken by the lateral slide between two lanes.
    pub lane_switch_duration: f32,
    /// Minimum horizontal swipe distance (pixels) that counts as a lane change.
    pub swipe_threshold: f32,
}
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            forward_speed: 5.0,
            lane_switch_duration: 0.2,
            swipe_threshold: 50.0,
        }
    }
}

/// Which distance the recycler waits for past the oldest live segment's start.
///
/// Written as a string in RON (`recycle_margin: "SegmentLength"`) so it survives the
/// `ron::Value` merge in [`RunnerConfig::load_layered`], which keeps no variant names.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum RecycleMargin {
    #[default]
    FullGap,
    SegmentLength,
}

impl RecycleMargin {
    pub fn name(self) -> &'static str {
        match self {
            Self::FullGap => "FullGap",
            Self::SegmentLength => "SegmentLength",
        }
    }
}

impl From<RecycleMargin> for String {
    fn from(m: RecycleMargin) -> Self {
        m.name().to_string()
    }
}

impl TryFrom<String> for RecycleMargin {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "FullGap" | "full_gap" => Ok(Self::FullGap),
            "SegmentLength" | "segment_length" => Ok(Self::SegmentLength),
            other => Err(format!(
                "unknown recycle_margin {other:?}; expected \"FullGap\" or \"SegmentLength\""
            )),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrackConfig {
    pub lane_distance: f32,
    pub segment_length: f32,
    pub segment_width: f32,
    /// Fixed Y of every platform.
    pub segment_height: f32,
    /// Forward gap used when the next platform continues in the same lane.
    pub full_gap: f32,
    /// Forward gap used when the next platform sits in a neighbouring lane.
    pub half_gap: f32,
    pub recycle_margin: RecycleMargin,
}
impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            lane_distance: 2.0,
            segment_length: 10.0,
            segment_width: 2.0,
            segment_height: 0.0,
            full_gap: 10.0,
            half_gap: 5.0,
            recycle_margin: RecycleMargin::FullGap,
        }
    }
}

impl TrackConfig {
    /// Distance past a segment's start after which it may be recycled.
    pub fn recycle_distance(&self) -> f32 {
        match self.recycle_margin {
            RecycleMargin::FullGap => self.full_gap,
            RecycleMargin::SegmentLength => self.segment_length,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    pub initial_size: usize,
    pub max_size: usize,
}
impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 5,
            max_size: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HazardConfig {
    pub enabled: bool,
    pub strip_length: f32,
    pub height: f32,
    pub strip_count: usize,
}
impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strip_length: 112.5,
            height: -0.5,
            strip_count: 2,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub player: PlayerConfig,
    pub track: TrackConfig,
    pub pool: PoolConfig,
    pub hazard: HazardConfig,
    /// Seed for the lane-choice RNG.
    pub seed: u64,
    /// Start a run on the first frame instead of waiting for the start key.
    pub auto_start: bool,
}
impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            player: Default::default(),
            track: Default::default(),
            pool: Default::default(),
            hazard: Default::default(),
            seed: 12345,
            auto_start: true,
        }
    }
}

/// Fatal configuration problems. The component that needed the config refuses to build.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Read(String),
    Parse(String),
    NonPositive { field: &'static str, value: f32 },
    GapOrder { half_gap: f32, full_gap: f32 },
    EmptyPool,
    PoolOrder { initial_size: usize, max_size: usize },
    PoolTooSmall { max_size: usize, peak_live: usize },
    NoHazardStrips,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read config: {e}"),
            Self::Parse(e) => write!(f, "parse RON: {e}"),
            Self::NonPositive { field, value } => write!(f, "{field} must be > 0 (got {value})"),
            Self::GapOrder { half_gap, full_gap } => write!(
                f,
                "track.half_gap ({half_gap}) must be smaller than track.full_gap ({full_gap})"
            ),
            Self::EmptyPool => write!(f, "pool.max_size is 0; no segment can ever spawn"),
            Self::PoolOrder {
                initial_size,
                max_size,
            } => write!(
                f,
                "pool.initial_size ({initial_size}) exceeds pool.max_size ({max_size})"
            ),
            Self::PoolTooSmall {
                max_size,
                peak_live,
            } => write!(
                f,
                "pool.max_size ({max_size}) below peak live segment estimate ({peak_live}); \
                 live platforms would be evicted"
            ),
            Self::NoHazardStrips => write!(f, "hazard.strip_count is 0 while hazards are enabled"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RunnerConfig {
    /// Load from a single RON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(&path).map_err(|e| ConfigError::Read(e.to_string()))?;
        ron::from_str(&data).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load file; on failure returns default config plus the error.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple layers; later overrides earlier (deep merge).
    /// Skips missing files; returns (config, used_paths, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        match merged {
            Some(val) => match val.into_rust::<RunnerConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (RunnerConfig::default(), used, errors)
                }
            },
            None => (RunnerConfig::default(), used, errors),
        }
    }

    /// Upper bound on simultaneously live platforms under event-driven recycling:
    /// everything between the recycle point behind the player and the spawn frontier
    /// ahead of it, packed at the tightest (half) gap, plus the frontier and the
    /// segment being crossed.
    pub fn peak_live_estimate(&self) -> usize {
        let t = &self.track;
        if t.half_gap <= 0.0 {
            return usize::MAX;
        }
        let window = t.recycle_distance() + t.segment_length;
        (window / t.half_gap).ceil() as usize + 2
    }

    /// Fatal problems; the first one found is returned.
    pub fn check(&self) -> Result<(), ConfigError> {
        let t = &self.track;
        for (field, value) in [
            ("track.lane_distance", t.lane_distance),
            ("track.segment_length", t.segment_length),
            ("track.segment_width", t.segment_width),
            ("track.full_gap", t.full_gap),
            ("track.half_gap", t.half_gap),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if t.half_gap >= t.full_gap {
            return Err(ConfigError::GapOrder {
                half_gap: t.half_gap,
                full_gap: t.full_gap,
            });
        }
        if self.pool.max_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.pool.initial_size > self.pool.max_size {
            return Err(ConfigError::PoolOrder {
                initial_size: self.pool.initial_size,
                max_size: self.pool.max_size,
            });
        }
        let peak_live = self.peak_live_estimate();
        if self.pool.max_size < peak_live {
            return Err(ConfigError::PoolTooSmall {
                max_size: self.pool.max_size,
                peak_live,
            });
        }
        if self.hazard.enabled {
            if self.hazard.strip_count == 0 {
                return Err(ConfigError::NoHazardStrips);
            }
            if self.hazard.strip_length <= 0.0 || !self.hazard.strip_length.is_finite() {
                return Err(ConfigError::NonPositive {
                    field: "hazard.strip_length",
                    value: self.hazard.strip_length,
                });
            }
        }
        if self.player.forward_speed < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "player.forward_speed",
                value: self.player.forward_speed,
            });
        }
        Ok(())
    }

    /// Produce validation warnings (non-fatal) for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let t = &self.track;
        if t.segment_width > t.lane_distance * 1.5 {
            w.push(format!(
                "track.segment_width {} much wider than lane_distance {}; neighbouring lanes overlap",
                t.segment_width, t.lane_distance
            ));
        }
        if t.segment_width < t.lane_distance * 0.5 {
            w.push(format!(
                "track.segment_width {} narrow relative to lane_distance {}; lane changes may miss triggers",
                t.segment_width, t.lane_distance
            ));
        }
        if t.full_gap > t.segment_length {
            w.push(format!(
                "track.full_gap {} exceeds segment_length {}; same-lane platforms leave holes",
                t.full_gap, t.segment_length
            ));
        }
        if t.half_gap > t.segment_length * 0.5 {
            w.push(format!(
                "track.half_gap {} beyond segment midpoint ({}); lane-change platform starts after the trigger",
                t.half_gap,
                t.segment_length * 0.5
            ));
        }
        if self.pool.initial_size == 0 {
            w.push("pool.initial_size is 0; every early spawn allocates".into());
        }
        if self.player.forward_speed == 0.0 {
            w.push("player.forward_speed is 0; the runner never advances".into());
        }
        if self.player.forward_speed > 100.0 {
            w.push(format!(
                "player.forward_speed {} very high; midpoints may be skipped between frames",
                self.player.forward_speed
            ));
        }
        if self.player.lane_switch_duration < 0.0 {
            w.push("player.lane_switch_duration negative -> treated as instant".into());
        }
        if self.player.swipe_threshold <= 0.0 {
            w.push("player.swipe_threshold <= 0; every touch becomes a lane change".into());
        }
        if self.hazard.enabled && self.hazard.height > t.segment_height {
            w.push(format!(
                "hazard.height {} above segment_height {}; fire ground covers the platforms",
                self.hazard.height, t.segment_height
            ));
        }
        if self.hazard.enabled && self.hazard.strip_count == 1 {
            w.push("hazard.strip_count is 1; fire ground will gap while it leapfrogs".into());
        }
        w
    }
}
