use serde_derive::{Deserialize, Serialize};

use nalgebra as na;

use crate::detection::{Category, Detection};

/// One history entry: position and time of an associated detection
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u64,
    pub category: Category,
    pub position: na::Point2<f64>,
    pub current_time: f64,
    pub registration_time: f64,
    pub history: Vec<Sample>,
    pub active: bool,

    // reset at the start of every frame
    pub matched: bool,

    // running maximum, None when scores are not tracked
    pub best_score: Option<f64>,
}

impl Track {
    pub fn new(id: u64, det: &Detection, track_scores: bool) -> Self {
        let mut track = Self {
            id,
            category: det.category,
            position: det.position(),
            current_time: det.timestamp,
            registration_time: det.timestamp,
            history: Vec::with_capacity(16),
            active: true,
            matched: false,
            best_score: None,
        };

        track.update(det, track_scores);
        track
    }

    /// Appends the detection to the history and marks the track as matched for this frame.
    /// The category is never touched after creation.
    pub fn update(&mut self, det: &Detection, track_scores: bool) {
        self.position = det.position();
        self.current_time = det.timestamp;
        self.history.push(Sample {
            x: det.x,
            y: det.y,
            time: det.timestamp,
        });
        self.matched = true;

        if track_scores {
            if let Some(score) = det.score {
                self.best_score = Some(self.best_score.map_or(score, |best| best.max(score)));
            }
        }
    }

    #[inline]
    pub fn distance(&self, det: &Detection) -> f64 {
        na::distance(&self.position, &det.position())
    }

    #[inline]
    pub fn is_candidate(&self) -> bool {
        self.active && !self.matched
    }

    #[inline]
    pub fn time_since_update(&self, ts: f64) -> f64 {
        ts - self.current_time
    }

    #[inline]
    pub fn last_time(&self) -> f64 {
        self.current_time
    }
}
