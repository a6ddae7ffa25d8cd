/// An entity paired with its distance to the current center. Recomputed whenever the center or radius changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Nearby<T> {
    pub entity: T,
    pub distance_km: f64,
}

impl<T> Nearby<T> {
    pub fn distance_m(&self) -> f64 {
        self.distance_km * 1000.0
    }
}
