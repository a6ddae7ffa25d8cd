use std::fmt::{Display, Formatter};
use thiserror::Error;

pub const MIN_RADIUS_M: u32 = 100;
pub const MAX_RADIUS_M: u32 = 30_000;
pub const DEFAULT_RADIUS_M: u32 = 5_000;

/// Search radius in meters, bounded by the map slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchRadius(u32);

impl SearchRadius {
    pub fn new(meters: u32) -> Result<Self, SearchRadiusError> {
        if !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&meters) {
            return Err(SearchRadiusError::OutOfRange(meters));
        }
        Ok(SearchRadius(meters))
    }

    pub fn clamped(meters: u32) -> Self {
        SearchRadius(meters.clamp(MIN_RADIUS_M, MAX_RADIUS_M))
    }

    pub fn meters(&self) -> u32 {
        self.0
    }

    /// Inclusive: an entity exactly on the circle is inside.
    pub fn contains_km(&self, distance_km: f64) -> bool {
        distance_km * 1000.0 <= f64::from(self.0)
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        SearchRadius(DEFAULT_RADIUS_M)
    }
}

impl Display for SearchRadius {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 < 1000 {
            write!(f, "{} m", self.0)
        } else {
            write!(f, "{:.1} km", f64::from(self.0) / 1000.0)
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SearchRadiusError {
    #[error("radius {0} m is outside {MIN_RADIUS_M}..={MAX_RADIUS_M} m")]
    OutOfRange(u32),
}
