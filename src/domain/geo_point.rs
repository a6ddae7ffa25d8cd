use serde::Serialize;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Coordinates closer than this on both axes are treated as the same place.
const SAME_PLACE_EPSILON_DEG: f64 = 0.0001;

/// A WGS84 coordinate in decimal degrees. Ranges are only checked when read from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    #[serde(rename = "latitude")]
    pub lat: f64,
    #[serde(rename = "longitude")]
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    /// Great-circle distance in kilometers using the haversine formula.
    ///
    /// Invalid input is not rejected: a `NaN` coordinate yields a `NaN` distance.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.lat - other.lat).abs() < SAME_PLACE_EPSILON_DEG && (self.lng - other.lng).abs() < SAME_PLACE_EPSILON_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPSILON: f64 = 1e-9;

    #[rstest]
    #[case(GeoPoint::new(-20.3197, -48.3118))]
    #[case(GeoPoint::new(0.0, 0.0))]
    #[case(GeoPoint::new(89.9, 179.9))]
    fn distance_to_itself_is_zero(#[case] point: GeoPoint) {
        assert!(point.distance_km(&point).abs() < EPSILON);
    }

    #[rstest]
    #[case(GeoPoint::new(-20.3197, -48.3118), GeoPoint::new(-20.3186, -48.3103))]
    #[case(GeoPoint::new(-6.2088, 106.8456), GeoPoint::new(-6.9175, 107.6191))]
    #[case(GeoPoint::new(51.8615, 4.3580), GeoPoint::new(-33.8688, 151.2093))]
    fn distance_is_symmetric(#[case] a: GeoPoint, #[case] b: GeoPoint) {
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < EPSILON);
    }

    #[test]
    fn distance_within_the_city() {
        let center = GeoPoint::new(-20.3197, -48.3118);

        let near = center.distance_km(&GeoPoint::new(-20.3186, -48.3103));
        let far = center.distance_km(&GeoPoint::new(-20.5000, -48.5000));

        assert!(near > 0.15 && near < 0.25, "near was {near}");
        assert!(far > 27.0 && far < 28.5, "far was {far}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let distance = GeoPoint::new(0.0, 0.0).distance_km(&GeoPoint::new(1.0, 0.0));

        assert!((distance - 111.19).abs() < 0.01, "distance was {distance}");
    }

    #[test]
    fn nan_coordinates_propagate() {
        let distance = GeoPoint::new(f64::NAN, 0.0).distance_km(&GeoPoint::new(0.0, 0.0));

        assert!(distance.is_nan());
    }

    #[rstest]
    #[case(GeoPoint::new(-20.31860, -48.31030), true)]
    #[case(GeoPoint::new(-20.31869, -48.31021), true)]
    #[case(GeoPoint::new(-20.31880, -48.31030), false)]
    #[case(GeoPoint::new(-20.31860, -48.31045), false)]
    fn approx_eq_uses_a_small_tolerance(#[case] other: GeoPoint, #[case] expected: bool) {
        assert_eq!(GeoPoint::new(-20.3186, -48.3103).approx_eq(&other), expected);
    }
}
