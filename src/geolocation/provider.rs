use crate::app_config::Geolocation;
use crate::domain::GeoPoint;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// Source of the device position, permission gated on the device side.
#[async_trait]
pub trait PositionProvider: Debug + Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("permission to read the device position was denied")]
    PermissionDenied,
    #[error("device position unavailable: {0}")]
    Unavailable(String),
    #[error("timed out waiting for the device position")]
    Timeout,
}

/// Provider that always answers with the same outcome.
#[derive(Debug, Clone)]
pub struct FixedPositionProvider {
    outcome: Result<GeoPoint, GeolocationError>,
}

impl FixedPositionProvider {
    pub fn new(outcome: Result<GeoPoint, GeolocationError>) -> Self {
        FixedPositionProvider { outcome }
    }

    /// Uses the configured device position, or behaves as if access was denied when there is none.
    pub fn from_config(config: &Geolocation) -> Self {
        FixedPositionProvider::new(config.device_position().ok_or(GeolocationError::PermissionDenied))
    }
}

#[async_trait]
impl PositionProvider for FixedPositionProvider {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        self.outcome.clone()
    }
}
