use std::iter::Peekable;

use crate::detection::Detection;
use crate::error::{Error, Result};

/// All detections sharing one timestamp, in stream order
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestamp: f64, // in seconds
    pub detections: Vec<Detection>,
}

impl Frame {
    #[inline]
    pub fn new(timestamp: f64, detections: Vec<Detection>) -> Self {
        Self {
            timestamp,
            detections,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Lazily groups a timestamp-ordered detection stream into frames.
///
/// Timestamps are grouped by exact value equality, no tolerance is applied.
/// A timestamp lower than its predecessor (or a non-finite one) yields
/// `Error::MalformedStream` and ends the iteration.
pub struct Frames<I: Iterator<Item = Detection>> {
    inner: Peekable<I>,
    index: usize,
    previous: Option<f64>,
    failed: bool,
}

impl<I: Iterator<Item = Detection>> Frames<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(detections: T) -> Self {
        Self {
            inner: detections.into_iter().peekable(),
            index: 0,
            previous: None,
            failed: false,
        }
    }

    fn check(&mut self, ts: f64) -> Result<()> {
        let previous = self.previous.unwrap_or(f64::NEG_INFINITY);

        if !ts.is_finite() || ts < previous {
            self.failed = true;

            return Err(Error::MalformedStream {
                index: self.index,
                previous,
                current: ts,
            });
        }

        self.previous = Some(ts);
        self.index += 1;

        Ok(())
    }
}

impl<I: Iterator<Item = Detection>> Iterator for Frames<I> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let first = self.inner.next()?;
        if let Err(err) = self.check(first.timestamp) {
            return Some(Err(err));
        }

        let timestamp = first.timestamp;
        let mut detections = vec![first];

        while let Some(det) = self.inner.next_if(|d| d.timestamp == timestamp) {
            self.index += 1;
            detections.push(det);
        }

        Some(Ok(Frame::new(timestamp, detections)))
    }
}
