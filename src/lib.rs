pub mod cleaner;
pub mod config;
pub mod detection;
pub mod error;
pub mod export;
pub mod frame;
pub mod input;
pub mod registry;
pub mod tracker;

mod track;

pub use cleaner::FrameCleaner;
pub use config::TrackerConfig;
pub use detection::{Category, Detection};
pub use error::{Error, Result};
pub use export::{CsvExporter, Exporter, JsonExporter};
pub use frame::{Frame, Frames};
pub use track::{Sample, Track};
pub use tracker::{track_stream, Tracker};

/// Frame-by-frame tracking run. Frames must be fed in strictly increasing time order;
/// `finish` flushes every live track and hands back the archive.
pub trait Tracking {
    fn update(&mut self, frame: &Frame) -> Result<()>;
    fn archived(&self) -> &[Track];
    fn finish(self) -> Vec<Track>
    where
        Self: Sized;
}
