use lr_config::{ConfigError, RunnerConfig};

/// Geometry and sizing the track engine runs with, resolved from a checked
/// [`RunnerConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackParams {
    pub lane_distance: f32,
    pub segment_length: f32,
    pub segment_width: f32,
    pub segment_height: f32,
    pub full_gap: f32,
    pub half_gap: f32,
    /// Distance past the oldest segment's start before it is recycled.
    pub recycle_margin: f32,
    pub pool_initial: usize,
    pub pool_max: usize,
    pub hazard: Option<HazardParams>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardParams {
    pub strip_length: f32,
    pub height: f32,
    pub strip_count: usize,
}

impl TrackParams {
    pub fn from_config(cfg: &RunnerConfig) -> Result<Self, ConfigError> {
        cfg.check()?;
        let t = &cfg.track;
        Ok(Self {
            lane_distance: t.lane_distance,
            segment_length: t.segment_length,
            segment_width: t.segment_width,
            segment_height: t.segment_height,
            full_gap: t.full_gap,
            half_gap: t.half_gap,
            recycle_margin: t.recycle_distance(),
            pool_initial: cfg.pool.initial_size,
            pool_max: cfg.pool.max_size,
            hazard: cfg.hazard.enabled.then_some(HazardParams {
                strip_length: cfg.hazard.strip_length,
                height: cfg.hazard.height,
                strip_count: cfg.hazard.strip_count,
            }),
        })
    }
}

impl Default for TrackParams {
    fn default() -> Self {
        let cfg = RunnerConfig::default();
        let t = &cfg.track;
        Self {
            lane_distance: t.lane_distance,
            segment_length: t.segment_length,
            segment_width: t.segment_width,
            segment_height: t.segment_height,
            full_gap: t.full_gap,
            half_gap: t.half_gap,
            recycle_margin: t.recycle_distance(),
            pool_initial: cfg.pool.initial_size,
            pool_max: cfg.pool.max_size,
            hazard: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr_config::RecycleMargin;

    #[test]
    fn from_default_config() {
        let p = TrackParams::from_config(&RunnerConfig::default()).unwrap();
        assert_eq!(p.full_gap, 10.0);
        assert_eq!(p.half_gap, 5.0);
        assert_eq!(p.recycle_margin, 10.0);
        assert_eq!((p.pool_initial, p.pool_max), (5, 10));
        let h = p.hazard.unwrap();
        assert_eq!(h.strip_count, 2);
        assert_eq!(h.strip_length, 112.5);
    }

    #[test]
    fn margin_follows_config_choice() {
        let mut cfg = RunnerConfig::default();
        cfg.track.segment_length = 12.0;
        cfg.track.recycle_margin = RecycleMargin::SegmentLength;
        let p = TrackParams::from_config(&cfg).unwrap();
        assert_eq!(p.recycle_margin, 12.0);
    }

    #[test]
    fn rejects_bad_config() {
        let mut cfg = RunnerConfig::default();
        cfg.track.half_gap = 20.0;
        assert!(matches!(
            TrackParams::from_config(&cfg),
            Err(ConfigError::GapOrder { .. })
        ));
    }

    #[test]
    fn disabled_hazards_have_no_params() {
        let mut cfg = RunnerConfig::default();
        cfg.hazard.enabled = false;
        assert!(TrackParams::from_config(&cfg).unwrap().hazard.is_none());
    }
}
