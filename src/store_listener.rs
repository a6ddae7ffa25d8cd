use crate::store::SearchSnapshot;
use tokio::sync::watch::Receiver;
use tracing::{info, instrument};

#[instrument(skip_all)]
pub async fn store_listener(mut rx: Receiver<SearchSnapshot>) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        let Some(center) = snapshot.center else {
            continue;
        };

        info!(
            lat = center.lat,
            lng = center.lng,
            "🗺️ {} business(es) within {}",
            snapshot.results.len(),
            snapshot.radius
        );
        for nearby in &snapshot.results {
            info!(business_id = nearby.entity.id, "  {:>6.0} m  {}", nearby.distance_m(), nearby.entity.name);
        }
    }
}
