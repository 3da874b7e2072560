use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use lidar_track::{input, CsvExporter, Exporter, JsonExporter, TrackerConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// Track lidar object detections over time
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input CSV file with detections
    csv: PathBuf,

    /// Half-extent of the ego-exclusion box along x
    #[arg(short = 'x', long = "x")]
    xlim: Option<f64>,

    /// Half-extent of the ego-exclusion box along y
    #[arg(short = 'y', long = "y")]
    ylim: Option<f64>,

    /// Minimum distance between objects
    #[arg(short = 'd', long = "dist")]
    min_dist: Option<f64>,

    /// Maximum acceptable inactive time, seconds
    #[arg(long = "inactive-time")]
    max_inactive: Option<f64>,

    /// JSON config file, flags above override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, defaults to `<input>.processed`
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Do not aggregate detection scores
    #[arg(long)]
    no_score: bool,

    /// Sort detections by time before tracking instead of rejecting unsorted input
    #[arg(long)]
    sort_input: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn tracker_config(&self) -> Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::from_json(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => TrackerConfig::default(),
        };

        if let Some(xlim) = self.xlim {
            config.xlim = xlim;
        }
        if let Some(ylim) = self.ylim {
            config.ylim = ylim;
        }
        if let Some(min_dist) = self.min_dist {
            config.min_dist = min_dist;
        }
        if let Some(max_inactive) = self.max_inactive {
            config.max_inactive = max_inactive;
        }
        if self.no_score {
            config.track_scores = false;
        }

        Ok(config)
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut name = self.csv.clone().into_os_string();
            name.push(".processed");
            name.into()
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let config = args.tracker_config()?;

    info!("Reading detections from {}", args.csv.display());
    let mut detections = input::read_detections_path(&args.csv)
        .with_context(|| format!("failed to read {}", args.csv.display()))?;

    if args.sort_input {
        input::sort_by_time(&mut detections);
    }

    if let (Some(first), Some(last)) = (detections.first(), detections.last()) {
        info!(
            "{} detections, recording duration: {:.2}s",
            detections.len(),
            last.timestamp - first.timestamp
        );
    }

    let started = Instant::now();
    let tracks = lidar_track::track_stream(config, detections).context("tracking failed")?;
    info!(
        "Tracked {} objects in {:.2}s",
        tracks.len(),
        started.elapsed().as_secs_f64()
    );

    let output = args.output_path();
    let file = std::io::BufWriter::new(
        std::fs::File::create(&output)
            .with_context(|| format!("failed to create {}", output.display()))?,
    );

    match args.format {
        Format::Csv => CsvExporter::new(file).export(&tracks)?,
        Format::Json => JsonExporter::new(file).pretty().export(&tracks)?,
    }

    info!("Result saved to {}", output.display());

    Ok(())
}
