//! Straight-line jump distance between two systems
//!
//! EVE uses its own light-year of 9.46 × 10^15 m for jump drive range, which is
//! slightly shorter than the physical light-year. Only that value is used here.

use crate::types::Coordinates;
use serde::Serialize;

/// Meters in one in-game light-year
pub const LIGHTYEAR_IN_METERS: f64 = 9_460_000_000_000_000.0;

/// Distance between two positions in both supported units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distance {
    pub meters: f64,
    pub light_years: f64,
}

/// Euclidean distance between `a` and `b`.
///
/// Each axis difference is squared before summing, so swapping the arguments
/// only flips signs that the square discards and the result is bit-identical.
pub fn distance(a: &Coordinates, b: &Coordinates) -> Distance {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;

    let meters = (dx * dx + dy * dy + dz * dz).sqrt();

    Distance {
        meters,
        light_years: meters / LIGHTYEAR_IN_METERS,
    }
}

impl Coordinates {
    /// Distance from this position to `other`
    pub fn distance_to(&self, other: &Coordinates) -> Distance {
        distance(self, other)
    }
}
