use crate::domain::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    #[serde(with = "crate::history::stored_point")]
    pub point: GeoPoint,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    Driving,
    Walking,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub mode: RouteMode,
    pub travel_time: String,
    pub distance: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentDestination {
    pub id: String,
    pub place: Place,
    pub visited_at: DateTime<Utc>,
    pub visit_count: u32,
    #[serde(default)]
    pub route: Option<RouteInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub id: String,
    pub place: Place,
    pub saved_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub usage_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Home,
    Work,
    Frequent,
    #[default]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub location: SavedLocation,
    pub kind: FavoriteKind,
}

impl SavedLocation {
    pub(crate) fn matches(&self, query: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(query);

        contains(&self.place.name)
            || contains(&self.place.address)
            || self.tags.iter().any(|tag| contains(tag.as_str()))
            || contains(&self.notes)
    }
}
