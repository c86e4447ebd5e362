use geo::{Distance, Euclidean};
use serde::{Deserialize, Serialize};

/// A point on the editor canvas.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self {
            point: geo::Point::new(x, y),
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        Euclidean.distance(&self.point, &to.point)
    }

    /// Point at `fraction` of the way from `self` to `to`. A fraction of 0
    /// yields `self`, 1 yields `to`.
    pub fn lerp(&self, to: &Location, fraction: f64) -> Location {
        Location {
            point: self.point + (to.point - self.point) * fraction,
        }
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}

impl From<(f64, f64)> for Location {
    fn from((x, y): (f64, f64)) -> Self {
        Location::from_cartesian(x, y)
    }
}
