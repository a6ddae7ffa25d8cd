use crate::domain::GeoPoint;
use config::{Config, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    backend: Backend,
    search: Search,
    geolocation: Geolocation,
    postal: Postal,
    history: History,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn geolocation(&self) -> &Geolocation {
        &self.geolocation
    }

    pub fn postal(&self) -> &Postal {
        &self.postal
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    store_buffer_size: usize,
}

impl Core {
    pub fn store_buffer_size(&self) -> usize {
        self.store_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Backend {
    url: String,
    anon_key: String,
    business_limit: usize,
}

impl Backend {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub fn business_limit(&self) -> usize {
        self.business_limit
    }
}

#[derive(Debug, Deserialize)]
pub struct Search {
    default_radius_m: u32,
    #[serde(with = "humantime_serde")]
    debounce: Duration,
    page_size: usize,
}

impl Search {
    pub fn default_radius_m(&self) -> u32 {
        self.default_radius_m
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Geolocation {
    #[serde(with = "humantime_serde")]
    timeout: Duration,
    fallback_center: GeoPoint,
    /// Position reported by the device, absent when the user did not grant access.
    #[serde(default)]
    device_position: Option<GeoPoint>,
}

impl Geolocation {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fallback_center(&self) -> GeoPoint {
        self.fallback_center
    }

    pub fn device_position(&self) -> Option<GeoPoint> {
        self.device_position
    }
}

#[derive(Debug, Deserialize)]
pub struct Postal {
    url: String,
    city_cep: String,
}

impl Postal {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// CEP describing the city as a whole, shown when the device position is unknown.
    pub fn city_cep(&self) -> &str {
        &self.city_cep
    }
}

#[derive(Debug, Deserialize)]
pub struct History {
    path: String,
    favorites_path: String,
}

impl History {
    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn favorites_path(&self) -> &Path {
        Path::new(&self.favorites_path)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core { store_buffer_size: 8 },
                backend: Backend {
                    url: "https://backend.url".to_string(),
                    anon_key: "anon-key".to_string(),
                    business_limit: 500,
                },
                search: Search {
                    default_radius_m: 5000,
                    debounce: Duration::from_millis(300),
                    page_size: 12,
                },
                geolocation: Geolocation {
                    timeout: Duration::from_secs(8),
                    fallback_center: GeoPoint::new(-20.3197, -48.3118),
                    device_position: None,
                },
                postal: Postal {
                    url: "https://viacep.com.br".to_string(),
                    city_cep: "14790-000".to_string(),
                },
                history: History {
                    path: "location_history.json".to_string(),
                    favorites_path: "business_favorites.json".to_string(),
                },
            },
        }
    }

    pub fn backend_url(mut self, url: String) -> Self {
        self.config.backend.url = url;
        self
    }

    pub fn business_limit(mut self, limit: usize) -> Self {
        self.config.backend.business_limit = limit;
        self
    }

    pub fn postal_url(mut self, url: String) -> Self {
        self.config.postal.url = url;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use pretty_assertions::assert_eq;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn parses_durations_and_fallback_center() -> Result<(), ConfigError> {
        let config = from_toml(include_str!("../config.toml"))?;

        assert_eq!(config.search().debounce(), Duration::from_millis(300));
        assert_eq!(config.geolocation().timeout(), Duration::from_secs(8));
        assert_eq!(config.geolocation().fallback_center(), GeoPoint::new(-20.3197, -48.3118));
        assert_eq!(config.geolocation().device_position(), None);
        assert_eq!(config.backend().business_limit(), 500);
        Ok(())
    }

    #[test]
    fn rejects_an_out_of_range_fallback_center() {
        let toml = include_str!("../config.toml").replace("latitude = -20.3197", "latitude = -120.0");

        let result = from_toml(&toml);

        assert!(result.is_err());
    }
}
