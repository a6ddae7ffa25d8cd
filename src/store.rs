use crate::domain::{Business, GeoPoint, Nearby};
use crate::geolocation::CenterState;
use crate::proximity::{SearchRadius, within_radius};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub enum Event {
    BusinessesLoaded(Vec<Business>),
    CenterChanged(Option<GeoPoint>),
    RadiusChanged(SearchRadius),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchSnapshot {
    pub center: Option<GeoPoint>,
    pub radius: SearchRadius,
    pub results: Vec<Nearby<Business>>,
}

/// State of the map search view. Owns its copy of the fetched businesses and republishes the radius
/// search after every event.
#[derive(Debug)]
pub struct Store {
    businesses: Vec<Business>,
    center: Option<GeoPoint>,
    radius: SearchRadius,
    rx: Receiver<Event>,
    notifier_tx: WatchSender<SearchSnapshot>,
    notifier_rx: WatchReceiver<SearchSnapshot>,
}

impl Store {
    pub fn new(rx: Receiver<Event>, radius: SearchRadius) -> Self {
        let (notifier_tx, notifier_rx) = watch::channel(SearchSnapshot {
            radius,
            ..SearchSnapshot::default()
        });

        Store {
            businesses: Vec::new(),
            center: None,
            radius,
            rx,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<SearchSnapshot> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            match event {
                Event::BusinessesLoaded(businesses) => {
                    info!("🔵 Loaded {} business(es)", businesses.len());
                    self.businesses = businesses;
                }
                Event::CenterChanged(center) => {
                    debug!("🔵 Center changed to {:?}", center);
                    self.center = center;
                }
                Event::RadiusChanged(radius) => {
                    debug!("🔵 Radius changed to {}", radius);
                    self.radius = radius;
                }
            }
            self.publish();
        }
        debug!("🔵 Event channel closed, store stopped");
    }

    fn publish(&self) {
        let results = within_radius(self.center, self.businesses.iter().cloned(), self.radius);
        debug!("🔵 {} of {} business(es) within {}", results.len(), self.businesses.len(), self.radius);

        self.notifier_tx.send_replace(SearchSnapshot {
            center: self.center,
            radius: self.radius,
            results,
        });
    }
}

/// Feeds center changes from the resolver into the store until either side goes away.
#[instrument(skip_all)]
pub async fn forward_center(mut center_rx: WatchReceiver<CenterState>, tx: Sender<Event>) {
    loop {
        let center = center_rx.borrow_and_update().center();
        if tx.send(Event::CenterChanged(center)).await.is_err() {
            warn!("⚠️ Store is gone, no longer forwarding center changes");
            return;
        }
        if center_rx.changed().await.is_err() {
            return;
        }
    }
}
