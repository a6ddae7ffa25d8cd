use crate::domain::GeoPoint;

/// Anything that may be placed on the map. Entities without a location never take part in proximity searches.
pub trait Locatable {
    fn location(&self) -> Option<GeoPoint>;
}

impl Locatable for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}
