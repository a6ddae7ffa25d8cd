//! Serde adapter for points kept in history files.
//!
//! Stored points are read back as they were written. Range checks only apply to configured points, so a
//! history entry can never make its own file unreadable.

use crate::domain::GeoPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Non-finite coordinates are written as `null` by `serde_json` and read back as `NaN`.
#[derive(Serialize, Deserialize)]
struct StoredPoint {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<&GeoPoint> for StoredPoint {
    fn from(point: &GeoPoint) -> Self {
        StoredPoint {
            latitude: Some(point.lat),
            longitude: Some(point.lng),
        }
    }
}

impl From<StoredPoint> for GeoPoint {
    fn from(point: StoredPoint) -> Self {
        GeoPoint::new(point.latitude.unwrap_or(f64::NAN), point.longitude.unwrap_or(f64::NAN))
    }
}

pub fn serialize<S: Serializer>(point: &GeoPoint, serializer: S) -> Result<S::Ok, S::Error> {
    StoredPoint::from(point).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GeoPoint, D::Error> {
    StoredPoint::deserialize(deserializer).map(GeoPoint::from)
}

pub mod option {
    use super::StoredPoint;
    use crate::domain::GeoPoint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(point: &Option<GeoPoint>, serializer: S) -> Result<S::Ok, S::Error> {
        point.as_ref().map(StoredPoint::from).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GeoPoint>, D::Error> {
        Ok(Option::<StoredPoint>::deserialize(deserializer)?.map(GeoPoint::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Stored {
        #[serde(with = "crate::history::stored_point")]
        point: GeoPoint,
        #[serde(default, with = "crate::history::stored_point::option")]
        maybe: Option<GeoPoint>,
    }

    #[test]
    fn reads_back_out_of_range_points() -> Result<(), serde_json::Error> {
        let stored = Stored {
            point: GeoPoint::new(-20.3, -248.3),
            maybe: Some(GeoPoint::new(95.0, -48.0)),
        };

        let read: Stored = serde_json::from_str(&serde_json::to_string(&stored)?)?;

        assert_eq!(read.point, GeoPoint::new(-20.3, -248.3));
        assert_eq!(read.maybe, Some(GeoPoint::new(95.0, -48.0)));
        Ok(())
    }

    #[test]
    fn reads_a_missing_optional_point_as_none() -> Result<(), serde_json::Error> {
        let read: Stored = serde_json::from_value(json!({ "point": { "latitude": 1.0, "longitude": 2.0 } }))?;

        assert_eq!(read.maybe, None);
        Ok(())
    }

    #[test]
    fn reads_nan_coordinates_back_as_nan() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&Stored {
            point: GeoPoint::new(f64::NAN, -48.3),
            maybe: None,
        })?;

        let read: Stored = serde_json::from_str(&json)?;

        assert!(read.point.lat.is_nan());
        assert_eq!(read.point.lng, -48.3);
        Ok(())
    }
}
