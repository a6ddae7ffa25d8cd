use crate::domain::GeoPoint;
use crate::geolocation::{GeolocationError, PositionProvider};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Debug, PartialEq)]
pub enum CenterState {
    Unresolved,
    Resolving,
    Resolved(GeoPoint),
    Failed { fallback: GeoPoint, reason: GeolocationError },
}

impl CenterState {
    /// The point searches should be measured from, if any.
    pub fn center(&self) -> Option<GeoPoint> {
        match self {
            CenterState::Resolved(point) => Some(*point),
            CenterState::Failed { fallback, .. } => Some(*fallback),
            CenterState::Unresolved | CenterState::Resolving => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, CenterState::Resolved(_) | CenterState::Failed { .. })
    }
}

/// Owns the search center of a single view.
///
/// Every request to the provider is tagged with a generation. A request that finishes after a newer request
/// (or a manual pick) has started is dropped, so a slow answer never overwrites a fresher center.
#[derive(Debug)]
pub struct CenterResolver {
    fallback: GeoPoint,
    timeout: Duration,
    generation: AtomicU64,
    tx: watch::Sender<CenterState>,
}

impl CenterResolver {
    pub fn new(fallback: GeoPoint, timeout: Duration) -> Self {
        let (tx, _) = watch::channel(CenterState::Unresolved);
        CenterResolver {
            fallback,
            timeout,
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CenterState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> CenterState {
        self.tx.borrow().clone()
    }

    /// Asks the provider for the device position. Calling this again is the "try again" action.
    #[instrument(skip_all)]
    pub async fn resolve(&self, provider: &dyn PositionProvider) -> CenterState {
        let mut generation = 0;
        self.tx.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = CenterState::Resolving;
        });
        debug!(generation, "📍 Resolving center...");

        let outcome = match timeout(self.timeout, provider.current_position()).await {
            Ok(Ok(point)) => CenterState::Resolved(point),
            Ok(Err(reason)) => CenterState::Failed {
                fallback: self.fallback,
                reason,
            },
            Err(_) => CenterState::Failed {
                fallback: self.fallback,
                reason: GeolocationError::Timeout,
            },
        };

        let published = self.tx.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = outcome.clone();
            true
        });

        if !published {
            debug!(generation, "📍 Resolving center... superseded, result dropped");
            return self.state();
        }

        match &outcome {
            CenterState::Resolved(point) => info!(lat = point.lat, lng = point.lng, "📍 Resolving center... OK"),
            CenterState::Failed { fallback, reason } => {
                warn!(lat = fallback.lat, lng = fallback.lng, "⚠️ Resolving center... failed, using fallback: {}", reason)
            }
            _ => {}
        }
        outcome
    }

    /// A center picked on the map. Supersedes any request still in flight.
    pub fn set_manual(&self, point: GeoPoint) {
        self.tx.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = CenterState::Resolved(point);
        });
        info!(lat = point.lat, lng = point.lng, "📍 Center moved manually");
    }
}
