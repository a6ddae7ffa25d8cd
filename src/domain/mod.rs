mod business;
mod category;
mod geo_point;
mod locatable;
mod nearby;
mod tourist_spot;

pub use business::{Business, BusinessStatus};
pub use category::Category;
pub use geo_point::GeoPoint;
pub use locatable::Locatable;
pub use nearby::Nearby;
pub use tourist_spot::{TouristSpot, TouristSpotStatus};
