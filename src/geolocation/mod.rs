mod center;
mod provider;

pub use center::{CenterResolver, CenterState};
pub use provider::{FixedPositionProvider, GeolocationError, PositionProvider};
