use serde_derive::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Half-extent of the ego-exclusion box along x
    pub xlim: f64,
    /// Half-extent of the ego-exclusion box along y
    pub ylim: f64,
    /// Gating distance for both duplicate suppression and association
    pub min_dist: f64,
    /// Seconds a track may go unmatched before it is archived
    pub max_inactive: f64,
    /// Keep the running maximum of detection scores on each track
    pub track_scores: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            xlim: 3.0,
            ylim: 2.0,
            min_dist: 2.0,
            max_inactive: 2.0,
            track_scores: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("xlim", self.xlim),
            ("ylim", self.ylim),
            ("min_dist", self.min_dist),
            ("max_inactive", self.max_inactive),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "`{}` must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();

        assert_eq!(config.xlim, 3.0);
        assert_eq!(config.ylim, 2.0);
        assert_eq!(config.min_dist, 2.0);
        assert_eq!(config.max_inactive, 2.0);
        assert!(config.track_scores);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrackerConfig = serde_json::from_str(r#"{"min_dist": 0.5}"#).unwrap();

        assert_eq!(config.min_dist, 0.5);
        assert_eq!(config.xlim, 3.0);
        assert_eq!(config.max_inactive, 2.0);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let config = TrackerConfig {
            min_dist: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = TrackerConfig {
            max_inactive: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
