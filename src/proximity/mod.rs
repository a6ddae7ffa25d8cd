mod radius;
mod search;

pub use radius::{DEFAULT_RADIUS_M, MAX_RADIUS_M, MIN_RADIUS_M, SearchRadius, SearchRadiusError};
pub use search::{sort_by_distance, within_radius};
