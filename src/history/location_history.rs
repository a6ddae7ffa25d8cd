use crate::history::persistence::{self, HistoryError};
use crate::history::{FavoriteKind, FavoriteLocation, Place, RecentDestination, RouteInfo, SavedLocation};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const MAX_RECENT: usize = 20;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryData {
    #[serde(default)]
    recent: Vec<RecentDestination>,
    #[serde(default)]
    favorites: Vec<FavoriteLocation>,
    #[serde(default)]
    saved: Vec<SavedLocation>,
}

/// Recent destinations, favorite places and saved places of the local user.
///
/// Hydrated from its file once on [`LocationHistory::load`] and written back after every change. Views receive
/// this object explicitly; nothing else touches the file.
#[derive(Debug)]
pub struct LocationHistory {
    path: PathBuf,
    data: HistoryData,
}

impl LocationHistory {
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, HistoryError> {
        let data: HistoryData = persistence::read_or_default(path).await?;
        info!(
            "💾 Loaded location history: {} recent, {} favorite(s), {} saved",
            data.recent.len(),
            data.favorites.len(),
            data.saved.len()
        );

        Ok(LocationHistory {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Like [`LocationHistory::load`], but an unreadable file leaves the user with an empty history.
    pub async fn load_or_empty(path: &Path) -> Self {
        match LocationHistory::load(path).await {
            Ok(history) => history,
            Err(e) => {
                warn!("⚠️ Starting with an empty location history: {}", e);
                LocationHistory {
                    path: path.to_path_buf(),
                    data: HistoryData::default(),
                }
            }
        }
    }

    pub fn recent(&self) -> &[RecentDestination] {
        &self.data.recent
    }

    pub fn favorites(&self) -> &[FavoriteLocation] {
        &self.data.favorites
    }

    pub fn saved(&self) -> &[SavedLocation] {
        &self.data.saved
    }

    /// Records a visit. Visiting the same place again bumps its count instead of adding a new entry.
    pub async fn add_recent(&mut self, place: Place, route: Option<RouteInfo>) -> Result<String, HistoryError> {
        let now = Utc::now();

        let id = match self.data.recent.iter_mut().find(|r| r.place.point.approx_eq(&place.point)) {
            Some(existing) => {
                existing.visited_at = now;
                existing.visit_count += 1;
                existing.place.name = place.name;
                existing.place.address = place.address;
                if route.is_some() {
                    existing.route = route;
                }
                existing.id.clone()
            }
            None => {
                let id = new_id("recent");
                self.data.recent.insert(
                    0,
                    RecentDestination {
                        id: id.clone(),
                        place,
                        visited_at: now,
                        visit_count: 1,
                        route,
                    },
                );
                self.data.recent.truncate(MAX_RECENT);
                id
            }
        };

        self.persist().await?;
        Ok(id)
    }

    /// Returns the id of the new favorite, or of the favorite already at that place.
    pub async fn add_favorite(&mut self, place: Place, kind: FavoriteKind) -> Result<String, HistoryError> {
        if let Some(existing) = self.data.favorites.iter().find(|f| f.location.place.point.approx_eq(&place.point)) {
            debug!("💾 '{}' is already a favorite", existing.location.place.name);
            return Ok(existing.location.id.clone());
        }

        let now = Utc::now();
        let id = new_id("favorite");
        self.data.favorites.insert(
            0,
            FavoriteLocation {
                location: SavedLocation {
                    id: id.clone(),
                    place,
                    saved_at: now,
                    last_used: now,
                    usage_count: 0,
                    tags: Vec::new(),
                    notes: String::new(),
                },
                kind,
            },
        );

        self.persist().await?;
        Ok(id)
    }

    pub async fn remove_favorite(&mut self, id: &str) -> Result<(), HistoryError> {
        self.data.favorites.retain(|f| f.location.id != id);
        self.persist().await
    }

    /// Saves a place. Saving the same place again counts as a use and replaces tags and notes when given.
    pub async fn save_location(&mut self, place: Place, tags: Option<Vec<String>>, notes: Option<String>) -> Result<String, HistoryError> {
        let now = Utc::now();

        let id = match self.data.saved.iter_mut().find(|s| s.place.point.approx_eq(&place.point)) {
            Some(existing) => {
                existing.last_used = now;
                existing.usage_count += 1;
                existing.place.name = place.name;
                existing.place.address = place.address;
                if let Some(tags) = tags {
                    existing.tags = tags;
                }
                if let Some(notes) = notes.filter(|n| !n.is_empty()) {
                    existing.notes = notes;
                }
                existing.id.clone()
            }
            None => {
                let id = new_id("saved");
                self.data.saved.insert(
                    0,
                    SavedLocation {
                        id: id.clone(),
                        place,
                        saved_at: now,
                        last_used: now,
                        usage_count: 1,
                        tags: tags.unwrap_or_default(),
                        notes: notes.unwrap_or_default(),
                    },
                );
                id
            }
        };

        self.persist().await?;
        Ok(id)
    }

    pub async fn remove_saved(&mut self, id: &str) -> Result<(), HistoryError> {
        self.data.saved.retain(|s| s.id != id);
        self.persist().await
    }

    pub async fn update_notes(&mut self, id: &str, notes: &str) -> Result<(), HistoryError> {
        for location in self.locations_mut().filter(|l| l.id == id) {
            location.notes = notes.to_string();
        }
        self.persist().await
    }

    pub async fn update_tags(&mut self, id: &str, tags: &[String]) -> Result<(), HistoryError> {
        for location in self.locations_mut().filter(|l| l.id == id) {
            location.tags = tags.to_vec();
        }
        self.persist().await
    }

    pub async fn clear_recent(&mut self) -> Result<(), HistoryError> {
        self.data.recent.clear();
        self.persist().await
    }

    /// Favorites first, then saved places, matching name, address, tags or notes.
    pub fn search(&self, query: &str) -> Vec<&SavedLocation> {
        let query = query.to_lowercase();

        self.data
            .favorites
            .iter()
            .map(|f| &f.location)
            .chain(self.data.saved.iter())
            .filter(|location| location.matches(&query))
            .collect()
    }

    fn locations_mut(&mut self) -> impl Iterator<Item = &mut SavedLocation> {
        self.data.saved.iter_mut().chain(self.data.favorites.iter_mut().map(|f| &mut f.location))
    }

    async fn persist(&self) -> Result<(), HistoryError> {
        persistence::write(&self.path, &self.data).await
    }
}

fn new_id(kind: &str) -> String {
    format!("{}_{}", kind, Uuid::new_v4())
}
