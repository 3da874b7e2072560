use tracing::debug;

use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::track::Track;

/// Result of greedy nearest-neighbour association for one frame.
///
/// `matched` holds `(track index, detection index, distance)` in detection order,
/// `missed` holds indexes of detections that spawn new tracks.
#[derive(Debug)]
pub struct DetectionsMapping<'a> {
    pub timestamp: f64,
    pub detections: &'a [&'a Detection],
    pub matched: Vec<(usize, usize, f64)>,
    pub missed: Vec<usize>,
}

/// Owns live and archived tracks for one tracking run
#[derive(Debug)]
pub struct TrackRegistry {
    tracking: Vec<Track>,
    archived: Vec<Track>,
    next_id: u64,
    min_dist: f64,
    max_inactive: f64,
    track_scores: bool,
}

impl TrackRegistry {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            tracking: Vec::with_capacity(64),
            archived: Vec::new(),
            next_id: 0,
            min_dist: config.min_dist,
            max_inactive: config.max_inactive,
            track_scores: config.track_scores,
        }
    }

    /// Start-of-frame sweep: clears `matched` and deactivates tracks unmatched for longer than `max_inactive`
    pub fn update_time(&mut self, ts_sec: f64) {
        for t in &mut self.tracking {
            t.matched = false;

            if t.time_since_update(ts_sec) > self.max_inactive {
                t.active = false;
            }
        }
    }

    /// Assigns every detection, in order, to the nearest active track not yet claimed in this frame.
    /// Ties go to the earliest live track. Detections with no candidate within `min_dist` are missed.
    pub fn map_detections<'a>(
        &self,
        ts_sec: f64,
        detections: &'a [&'a Detection],
    ) -> DetectionsMapping<'a> {
        let mut claimed = vec![false; self.tracking.len()];
        let mut matched = Vec::new();
        let mut missed = Vec::new();

        for (j, det) in detections.iter().enumerate() {
            let mut nearest: Option<(usize, f64)> = None;

            for (i, t) in self.tracking.iter().enumerate() {
                if claimed[i] || !t.is_candidate() {
                    continue;
                }

                let dist = t.distance(det);
                if nearest.map_or(true, |(_, best)| dist < best) {
                    nearest = Some((i, dist));
                }
            }

            match nearest {
                Some((i, dist)) if dist < self.min_dist => {
                    claimed[i] = true;
                    matched.push((i, j, dist));
                }
                _ => missed.push(j),
            }
        }

        DetectionsMapping {
            timestamp: ts_sec,
            detections,
            matched,
            missed,
        }
    }

    pub fn update(&mut self, mapping: DetectionsMapping<'_>) {
        let dets = mapping.detections;

        for (i, j, _) in mapping.matched {
            let track = &mut self.tracking[i];
            debug_assert!(!track.matched, "track {} matched twice in one frame", track.id);

            track.update(dets[j], self.track_scores);
        }

        for j in mapping.missed {
            let track = Track::new(self.next_id, dets[j], self.track_scores);
            self.next_id += 1;

            debug!(
                id = track.id,
                category = %track.category,
                time = mapping.timestamp,
                x = track.position.x,
                y = track.position.y,
                "track created"
            );

            self.tracking.push(track);
        }
    }

    /// Moves deactivated tracks to the archive, preserving their live order
    pub fn archive_inactive(&mut self) -> usize {
        if self.tracking.iter().all(|t| t.active) {
            return 0;
        }

        let (live, stale): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tracking).into_iter().partition(|t| t.active);

        self.tracking = live;
        self.archive(stale)
    }

    /// Archives every remaining live track regardless of its state
    pub fn flush(&mut self) -> usize {
        let remaining = std::mem::take(&mut self.tracking);
        self.archive(remaining)
    }

    fn archive(&mut self, tracks: Vec<Track>) -> usize {
        let count = tracks.len();

        for t in &tracks {
            debug!(
                id = t.id,
                category = %t.category,
                registered = t.registration_time,
                last_seen = t.current_time,
                samples = t.history.len(),
                "track archived"
            );
        }

        self.archived.extend(tracks);
        count
    }

    #[inline]
    pub fn tracking(&self) -> &[Track] {
        &self.tracking
    }

    #[inline]
    pub fn archived(&self) -> &[Track] {
        &self.archived
    }

    #[inline]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn into_archived(self) -> Vec<Track> {
        self.archived
    }
}
