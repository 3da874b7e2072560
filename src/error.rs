use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Timestamp out of order or not finite.
    ///
    /// `index` is the detection's position in the stream when raised by `Frames`,
    /// and the frame ordinal when raised by `Tracker::update`.
    #[error("Malformed stream at #{index}: timestamp {current} follows {previous}")]
    MalformedStream {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}
