use tracing::{info, trace};

use crate::cleaner::FrameCleaner;
use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::error::{Error, Result};
use crate::frame::{Frame, Frames};
use crate::registry::TrackRegistry;
use crate::track::Track;

/// Greedy nearest-neighbour tracking loop.
///
/// Each frame runs staleness sweep, cleaning, association and archival in that order.
/// Frames must arrive with strictly increasing timestamps.
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    cleaner: FrameCleaner,
    registry: TrackRegistry,
    last_timestamp: Option<f64>,
    frames: usize,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            cleaner: FrameCleaner::from_config(&config),
            registry: TrackRegistry::new(&config),
            config,
            last_timestamp: None,
            frames: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[inline]
    pub fn frames_processed(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn live(&self) -> &[Track] {
        self.registry.tracking()
    }

    #[inline]
    pub fn archived(&self) -> &[Track] {
        self.registry.archived()
    }

    pub fn update(&mut self, frame: &Frame) -> Result<()> {
        let ts = frame.timestamp;

        let previous = self.last_timestamp.unwrap_or(f64::NEG_INFINITY);
        if !ts.is_finite() || ts <= previous {
            return Err(Error::MalformedStream {
                index: self.frames,
                previous,
                current: ts,
            });
        }

        self.registry.update_time(ts);

        let cleaned = self.cleaner.clean(&frame.detections);
        let mapping = self.registry.map_detections(ts, &cleaned);
        let (matched, created) = (mapping.matched.len(), mapping.missed.len());
        self.registry.update(mapping);

        let archived = self.registry.archive_inactive();

        trace!(
            time = ts,
            detections = frame.len(),
            matched,
            created,
            archived,
            live = self.registry.tracking().len(),
            "frame processed"
        );

        self.last_timestamp = Some(ts);
        self.frames += 1;

        Ok(())
    }

    /// Flushes every live track into the archive and returns it in archival order
    pub fn finish(mut self) -> Vec<Track> {
        self.registry.flush();

        info!(
            frames = self.frames,
            tracks = self.registry.archived().len(),
            "tracking finished"
        );

        self.registry.into_archived()
    }
}

impl crate::Tracking for Tracker {
    #[inline]
    fn update(&mut self, frame: &Frame) -> Result<()> {
        Tracker::update(self, frame)
    }

    #[inline]
    fn archived(&self) -> &[Track] {
        Tracker::archived(self)
    }

    #[inline]
    fn finish(self) -> Vec<Track> {
        Tracker::finish(self)
    }
}

/// Groups `detections` into frames, tracks them and returns the archived tracks
pub fn track_stream<I>(config: TrackerConfig, detections: I) -> Result<Vec<Track>>
where
    I: IntoIterator<Item = Detection>,
{
    let mut tracker = Tracker::new(config)?;

    for frame in Frames::new(detections) {
        tracker.update(&frame?)?;
    }

    Ok(tracker.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Category;

    fn config() -> TrackerConfig {
        TrackerConfig {
            xlim: 0.0,
            ylim: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_non_increasing_frames() {
        let mut tracker = Tracker::new(config()).unwrap();

        tracker.update(&Frame::new(1.0, vec![])).unwrap();
        let err = tracker.update(&Frame::new(1.0, vec![])).unwrap_err();

        assert!(matches!(err, Error::MalformedStream { index: 1, .. }));
        assert_eq!(tracker.frames_processed(), 1);
    }

    #[test]
    fn test_rejects_non_finite_frame_after_first() {
        let mut tracker = Tracker::new(config()).unwrap();
        tracker
            .update(&Frame::new(0.0, vec![Detection::new(0.0, 5.0, 5.0, Category::Car)]))
            .unwrap();

        let frame = Frame::new(
            f64::INFINITY,
            vec![Detection::new(f64::INFINITY, 5.0, 5.0, Category::Car)],
        );
        let err = tracker.update(&frame).unwrap_err();

        assert!(matches!(err, Error::MalformedStream { index: 1, .. }));
        assert!(tracker.update(&Frame::new(f64::NAN, vec![])).is_err());

        // the rejected frames left the live track untouched
        assert_eq!(tracker.live().len(), 1);
        assert!(tracker.archived().is_empty());
        assert!(tracker.update(&Frame::new(1.0, vec![])).is_ok());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TrackerConfig {
            min_dist: -2.0,
            ..Default::default()
        };

        assert!(matches!(Tracker::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_stream_is_empty_archive() {
        let tracks = track_stream(config(), Vec::<Detection>::new()).unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_duplicate_other_never_reaches_registry() {
        let mut tracker = Tracker::new(config()).unwrap();
        let frame = Frame::new(
            0.0,
            vec![
                Detection::new(0.0, 10.0, 10.0, Category::Car),
                Detection::new(0.0, 10.5, 10.5, Category::Other),
            ],
        );

        tracker.update(&frame).unwrap();

        assert_eq!(tracker.live().len(), 1);
        assert_eq!(tracker.live()[0].category, Category::Car);
    }

    #[test]
    fn test_finish_flushes_live_tracks() {
        let mut tracker = Tracker::new(config()).unwrap();
        tracker
            .update(&Frame::new(0.0, vec![Detection::new(0.0, 5.0, 5.0, Category::Bike)]))
            .unwrap();

        assert!(tracker.archived().is_empty());

        let tracks = tracker.finish();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].category, Category::Bike);
    }
}
