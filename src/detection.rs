use serde_derive::{Deserialize, Serialize};
use std::fmt;

use nalgebra as na;

/// Object class reported by the sensor, collapsed to the four kinds the tracker knows about
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Car,
    Pedestrian,
    Bike,
    #[default]
    Other,
}

impl Category {
    /// Maps a free-text label by substring: "car", "pedestrian", "bike", anything else is `Other`
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();

        if label.contains("car") {
            Category::Car
        } else if label.contains("pedestrian") {
            Category::Pedestrian
        } else if label.contains("bike") {
            Category::Bike
        } else {
            Category::Other
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Car => "car",
            Category::Pedestrian => "pedestrian",
            Category::Bike => "bike",
            Category::Other => "other",
        }
    }

    #[inline]
    pub fn is_other(&self) -> bool {
        matches!(self, Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single sensor observation: position in the sensor frame, time in seconds
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "time")]
    pub timestamp: f64,
    pub category: Category,
    pub score: Option<f64>,
}

impl Detection {
    #[inline]
    pub fn new(timestamp: f64, x: f64, y: f64, category: Category) -> Self {
        Self {
            x,
            y,
            timestamp,
            category,
            score: None,
        }
    }

    #[inline]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    #[inline(always)]
    pub fn position(&self) -> na::Point2<f64> {
        na::Point2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(&self, other: &Detection) -> f64 {
        na::distance(&self.position(), &other.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("car"), Category::Car);
        assert_eq!(Category::from_label("Car"), Category::Car);
        assert_eq!(Category::from_label("small_car"), Category::Car);
        assert_eq!(Category::from_label("pedestrian"), Category::Pedestrian);
        assert_eq!(Category::from_label("bike"), Category::Bike);
        assert_eq!(Category::from_label("motorbike"), Category::Bike);
        assert_eq!(Category::from_label("truck"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
    }

    #[test]
    fn test_distance() {
        let a = Detection::new(0.0, 0.0, 0.0, Category::Car);
        let b = Detection::new(0.0, 3.0, 4.0, Category::Other);

        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance(&a) - 5.0).abs() < 1e-12);
    }
}
