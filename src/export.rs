use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::detection::Category;
use crate::error::Result;
use crate::track::{Sample, Track};

pub const FORMAT_VERSION: u32 = 1;

pub trait Exporter {
    fn export(&mut self, tracks: &[Track]) -> Result<()>;
}

/// Flat row, one per history sample
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub time: f64,
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub category: Category,
    pub score: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub id: u64,
    pub category: Category,
    pub registration_time: f64,
    pub last_time: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub best_score: Option<f64>,
    pub history: Vec<Sample>,
}

impl From<&Track> for TrackRecord {
    fn from(t: &Track) -> TrackRecord {
        TrackRecord {
            id: t.id,
            category: t.category,
            registration_time: t.registration_time,
            last_time: t.last_time(),
            best_score: t.best_score,
            history: t.history.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackDocument {
    pub version: u32,
    pub tracks: BTreeMap<u64, TrackRecord>,
}

/// Rows for every history sample, stably ordered by time; equal times keep archive order
pub fn rows(tracks: &[Track]) -> Vec<TrackRow> {
    let mut rows: Vec<TrackRow> = tracks
        .iter()
        .flat_map(|t| {
            t.history.iter().map(move |s| TrackRow {
                time: s.time,
                id: t.id,
                x: s.x,
                y: s.y,
                category: t.category,
                score: t.best_score,
            })
        })
        .collect();

    rows.sort_by(|a, b| a.time.total_cmp(&b.time));
    rows
}

pub fn document(tracks: &[Track]) -> TrackDocument {
    TrackDocument {
        version: FORMAT_VERSION,
        tracks: tracks.iter().map(|t| (t.id, t.into())).collect(),
    }
}

pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}

impl<W: Write> Exporter for CsvExporter<W> {
    fn export(&mut self, tracks: &[Track]) -> Result<()> {
        for row in rows(tracks) {
            self.writer.serialize(row)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

pub struct JsonExporter<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export(&mut self, tracks: &[Track]) -> Result<()> {
        let doc = document(tracks);

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &doc)?;
        } else {
            serde_json::to_writer(&mut self.writer, &doc)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
