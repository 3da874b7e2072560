use tracing::trace;

use crate::config::TrackerConfig;
use crate::detection::Detection;

/// Per-frame false-positive suppression applied before association
#[derive(Debug, Clone, Copy)]
pub struct FrameCleaner {
    xlim: f64,
    ylim: f64,
    min_dist: f64,
}

impl FrameCleaner {
    pub fn new(xlim: f64, ylim: f64, min_dist: f64) -> Self {
        Self {
            xlim,
            ylim,
            min_dist,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.xlim, config.ylim, config.min_dist)
    }

    /// `xlim = ylim = 0` switches the zone off; a single zero half-extent still excludes its axis line
    #[inline]
    pub fn ego_zone_enabled(&self) -> bool {
        self.xlim > 0.0 || self.ylim > 0.0
    }

    #[inline]
    pub fn in_ego_zone(&self, det: &Detection) -> bool {
        self.ego_zone_enabled() && det.x.abs() <= self.xlim && det.y.abs() <= self.ylim
    }

    pub fn remove_ego<'a>(&self, dets: &'a [Detection]) -> Vec<&'a Detection> {
        dets.iter().filter(|d| !self.in_ego_zone(d)).collect()
    }

    /// Greedy left-to-right pass: classified detections seed the accepted list,
    /// each `Other` is dropped if it lies closer than `min_dist` to anything accepted so far,
    /// otherwise it is accepted and suppresses later `Other`s too.
    pub fn suppress_other<'a>(&self, dets: Vec<&'a Detection>) -> Vec<&'a Detection> {
        let (mut accepted, others): (Vec<_>, Vec<_>) =
            dets.into_iter().partition(|d| !d.category.is_other());

        // nothing classified to compare against
        if accepted.is_empty() {
            return others;
        }

        for det in others {
            let nearest = accepted
                .iter()
                .map(|a| a.distance(det))
                .fold(f64::INFINITY, f64::min);

            if nearest >= self.min_dist {
                accepted.push(det);
            }
        }

        accepted
    }

    pub fn clean<'a>(&self, dets: &'a [Detection]) -> Vec<&'a Detection> {
        let outside = self.remove_ego(dets);
        let ego_dropped = dets.len() - outside.len();

        let cleaned = self.suppress_other(outside);

        trace!(
            total = dets.len(),
            ego_dropped,
            kept = cleaned.len(),
            "frame cleaned"
        );

        cleaned
    }
}

impl Default for FrameCleaner {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}
