use crate::domain::{Business, GeoPoint, Locatable};
use crate::history::persistence::{self, HistoryError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FavoriteBusiness {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, with = "crate::history::stored_point::option")]
    pub coordinates: Option<GeoPoint>,
    pub added_at: DateTime<Utc>,
}

impl From<&Business> for FavoriteBusiness {
    fn from(business: &Business) -> Self {
        FavoriteBusiness {
            id: business.id.clone(),
            name: business.name.clone(),
            address: business.address.clone(),
            neighborhood: business.neighborhood.clone(),
            phone: business.phone.clone(),
            whatsapp: business.whatsapp.clone(),
            categories: business.category_name.iter().chain(business.subcategories.iter()).cloned().collect(),
            coordinates: business.location(),
            added_at: Utc::now(),
        }
    }
}

/// Businesses the local user starred, newest first. Persisted like [`crate::history::LocationHistory`].
#[derive(Debug)]
pub struct BusinessFavorites {
    path: PathBuf,
    favorites: Vec<FavoriteBusiness>,
}

impl BusinessFavorites {
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, HistoryError> {
        let favorites: Vec<FavoriteBusiness> = persistence::read_or_default(path).await?;
        info!("💾 Loaded {} favorite business(es)", favorites.len());

        Ok(BusinessFavorites {
            path: path.to_path_buf(),
            favorites,
        })
    }

    /// Like [`BusinessFavorites::load`], but an unreadable file leaves the user without favorites.
    pub async fn load_or_empty(path: &Path) -> Self {
        match BusinessFavorites::load(path).await {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!("⚠️ Starting without favorite businesses: {}", e);
                BusinessFavorites {
                    path: path.to_path_buf(),
                    favorites: Vec::new(),
                }
            }
        }
    }

    pub fn all(&self) -> &[FavoriteBusiness] {
        &self.favorites
    }

    pub fn is_favorite(&self, business_id: &str) -> bool {
        self.favorites.iter().any(|f| f.id == business_id)
    }

    /// Ignores businesses that are already favorites.
    pub async fn add(&mut self, business: &Business) -> Result<(), HistoryError> {
        if self.is_favorite(&business.id) {
            return Ok(());
        }

        self.favorites.insert(0, FavoriteBusiness::from(business));
        persistence::write(&self.path, &self.favorites).await
    }

    pub async fn remove(&mut self, business_id: &str) -> Result<(), HistoryError> {
        self.favorites.retain(|f| f.id != business_id);
        persistence::write(&self.path, &self.favorites).await
    }

    /// Favorites grouped by each of their categories. A business appears under every category it carries.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&FavoriteBusiness>> {
        let mut grouped: BTreeMap<&str, Vec<&FavoriteBusiness>> = BTreeMap::new();
        for favorite in &self.favorites {
            for category in &favorite.categories {
                grouped.entry(category.as_str()).or_default().push(favorite);
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env::temp_dir;
    use test_log::test;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        temp_dir().join(format!("business_favorites_{}.json", Uuid::new_v4()))
    }

    fn bakery() -> Business {
        let mut business = Business::named("padaria", "Padaria Central").at(-20.3192, -48.3105).in_category("Alimentação");
        business.subcategories = vec!["Confeitaria".to_string()];
        business
    }

    #[test(tokio::test)]
    async fn adding_twice_keeps_a_single_entry() -> Result<(), HistoryError> {
        let mut favorites = BusinessFavorites::load(&temp_path()).await?;

        favorites.add(&bakery()).await?;
        favorites.add(&bakery()).await?;

        assert_eq!(favorites.all().len(), 1);
        assert!(favorites.is_favorite("padaria"));
        assert_eq!(favorites.all()[0].coordinates, Some(GeoPoint::new(-20.3192, -48.3105)));
        Ok(())
    }

    #[test(tokio::test)]
    async fn removed_favorites_stay_removed_after_reload() -> Result<(), HistoryError> {
        let path = temp_path();
        let mut favorites = BusinessFavorites::load(&path).await?;
        favorites.add(&bakery()).await?;
        favorites.add(&Business::named("oficina", "Oficina do Zé")).await?;

        favorites.remove("padaria").await?;
        let reloaded = BusinessFavorites::load(&path).await?;

        assert!(!reloaded.is_favorite("padaria"));
        assert!(reloaded.is_favorite("oficina"));
        Ok(())
    }

    #[test(tokio::test)]
    async fn out_of_range_coordinates_do_not_break_the_next_load() -> Result<(), HistoryError> {
        let path = temp_path();
        let mut favorites = BusinessFavorites::load(&path).await?;
        favorites.add(&Business::named("b", "Sem mapa").at(95.0, -48.0)).await?;

        let reloaded = BusinessFavorites::load(&path).await?;

        assert_eq!(reloaded.all()[0].coordinates, Some(GeoPoint::new(95.0, -48.0)));
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_corrupt_file_falls_back_to_no_favorites() -> Result<(), Box<dyn std::error::Error>> {
        let path = temp_path();
        tokio::fs::write(&path, "[{").await?;

        let favorites = BusinessFavorites::load_or_empty(&path).await;

        assert!(favorites.all().is_empty());
        Ok(())
    }

    #[test(tokio::test)]
    async fn groups_by_every_category() -> Result<(), HistoryError> {
        let mut favorites = BusinessFavorites::load(&temp_path()).await?;
        favorites.add(&bakery()).await?;
        favorites.add(&Business::named("mercado", "Mercado Bom Preço").in_category("Alimentação")).await?;

        let grouped = favorites.by_category();
        let names = |category: &str| grouped[category].iter().map(|f| f.name.as_str()).collect::<Vec<_>>();

        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec!["Alimentação", "Confeitaria"]);
        assert_eq!(names("Alimentação"), vec!["Mercado Bom Preço", "Padaria Central"]);
        assert_eq!(names("Confeitaria"), vec!["Padaria Central"]);
        Ok(())
    }
}
