use serde_derive::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::detection::{Category, Detection};
use crate::error::{Error, Result};

/// Raw row of a detection CSV. Time is either `time`, or `time_sec` + `time_nsec`.
#[derive(Deserialize, Debug, Clone)]
struct DetectionRecord {
    time: Option<f64>,
    time_sec: Option<f64>,
    time_nsec: Option<f64>,
    x: f64,
    y: f64,
    label: Option<String>,
    score: Option<f64>,
}

impl DetectionRecord {
    fn timestamp(&self) -> Option<f64> {
        match (self.time, self.time_sec) {
            (Some(time), _) => Some(time),
            (None, Some(sec)) => Some(sec + self.time_nsec.unwrap_or(0.0) / 1e9),
            (None, None) => None,
        }
    }

    fn into_detection(self, line: u64) -> Result<Detection> {
        let timestamp = self.timestamp().ok_or_else(|| Error::MalformedRecord {
            line,
            reason: "expected `time` or `time_sec` column".into(),
        })?;

        let fields = [
            ("time", Some(timestamp)),
            ("x", Some(self.x)),
            ("y", Some(self.y)),
            ("score", self.score),
        ];

        for (name, value) in fields {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(Error::MalformedRecord {
                    line,
                    reason: format!("`{}` must be finite, got {}", name, value),
                });
            }
        }

        let category = self
            .label
            .as_deref()
            .map(Category::from_label)
            .unwrap_or_default();

        Ok(Detection {
            x: self.x,
            y: self.y,
            timestamp,
            category,
            score: self.score,
        })
    }
}

pub fn read_detections<R: Read>(reader: R) -> Result<Vec<Detection>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut raw = csv::StringRecord::new();
    let mut detections = Vec::new();

    while reader.read_record(&mut raw)? {
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let record: DetectionRecord =
            raw.deserialize(Some(&headers))
                .map_err(|err| Error::MalformedRecord {
                    line,
                    reason: err.to_string(),
                })?;

        detections.push(record.into_detection(line)?);
    }

    Ok(detections)
}

pub fn read_detections_path<P: AsRef<Path>>(path: P) -> Result<Vec<Detection>> {
    let file = std::fs::File::open(path)?;
    read_detections(std::io::BufReader::new(file))
}

/// Stable sort by timestamp, equal timestamps keep file order
pub fn sort_by_time(detections: &mut [Detection]) {
    detections.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_split_time_columns() {
        let data = "\
time_sec,time_nsec,x,y,z,label,score
10,500000000,12.5,-3.0,0.2,car,0.91
10,500000000,20.0,4.0,0.1,Pedestrian,
11,0,7.0,7.0,0.0,unknown,0.3
";
        let dets = read_detections(data.as_bytes()).unwrap();

        assert_eq!(dets.len(), 3);
        assert_eq!(dets[0].timestamp, 10.5);
        assert_eq!(dets[0].category, Category::Car);
        assert_eq!(dets[0].score, Some(0.91));
        assert_eq!(dets[1].category, Category::Pedestrian);
        assert_eq!(dets[1].score, None);
        assert_eq!(dets[2].timestamp, 11.0);
        assert_eq!(dets[2].category, Category::Other);
    }

    #[test]
    fn test_reads_time_column_without_label() {
        let data = "time,x,y\n0.25,1.0,2.0\n";
        let dets = read_detections(data.as_bytes()).unwrap();

        assert_eq!(dets, vec![Detection::new(0.25, 1.0, 2.0, Category::Other)]);
    }

    #[test]
    fn test_missing_time_is_malformed() {
        let data = "x,y,label\n1.0,2.0,car\n";

        assert!(matches!(
            read_detections(data.as_bytes()),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let data = "time,x,y\n0.0,abc,2.0\n";

        assert!(matches!(
            read_detections(data.as_bytes()),
            Err(Error::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_values_are_malformed() {
        let cases = [
            "time,x,y,label\n0,NaN,5,car\n1,NaN,5,car\n",
            "time,x,y,label\n0,1.0,inf,car\n",
            "time,x,y,label,score\n0,1.0,2.0,car,NaN\n",
            "time,x,y\n0,1.0,2.0\ninf,1.0,2.0\n",
        ];

        for data in cases {
            assert!(
                matches!(
                    read_detections(data.as_bytes()),
                    Err(Error::MalformedRecord { .. })
                ),
                "accepted {:?}",
                data
            );
        }

        assert!(matches!(
            read_detections("time,x,y\n0,1.0,2.0\n1,-inf,2.0\n".as_bytes()),
            Err(Error::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut dets = vec![
            Detection::new(2.0, 1.0, 0.0, Category::Car),
            Detection::new(1.0, 2.0, 0.0, Category::Car),
            Detection::new(2.0, 3.0, 0.0, Category::Car),
        ];
        sort_by_time(&mut dets);

        let xs: Vec<f64> = dets.iter().map(|d| d.x).collect();
        assert_eq!(xs, vec![2.0, 1.0, 3.0]);
    }
}
