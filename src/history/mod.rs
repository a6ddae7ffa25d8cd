mod business_favorites;
mod location_history;
mod persistence;
mod place;
mod stored_point;

pub use business_favorites::{BusinessFavorites, FavoriteBusiness};
pub use location_history::LocationHistory;
pub use persistence::HistoryError;
pub use place::{FavoriteKind, FavoriteLocation, Place, RecentDestination, RouteInfo, RouteMode, SavedLocation};
