//! Planar geographic points.
//!
//! Distances here are measured directly on latitude/longitude degrees. That is
//! only meaningful for "is this click on that marker" tests over a small area,
//! which is all the viewer needs.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A finite latitude/longitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Returns `None` unless both coordinates are finite.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }

    /// Builds a point from possibly-missing coordinates.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        Self::new(lat?, lon?)
    }

    /// Euclidean distance in degree units (no great-circle correction).
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }
}

/// Deterministic total ordering for distances.
///
/// `-0.0` compares equal to `0.0` and every NaN compares equal to every other
/// NaN (and greater than all numbers).
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical(a).total_cmp(&canonical(b))
}

fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}
