use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument};

/// Emits a value only once `delay` has passed without a newer one. Superseded values are dropped.
///
/// Ends when the input channel closes, after flushing the pending value.
#[instrument(skip_all)]
pub async fn debounce<T>(mut rx: Receiver<T>, tx: Sender<T>, delay: Duration)
where
    T: Debug + Send,
{
    let mut pending: Option<(T, Instant)> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);
        tokio::select! {
            received = rx.recv() => match received {
                Some(value) => {
                    if let Some((superseded, _)) = pending.take() {
                        debug!("⌨️ Dropping superseded input {:?}", superseded);
                    }
                    pending = Some((value, Instant::now() + delay));
                }
                None => {
                    if let Some((value, _)) = pending.take() {
                        let _ = tx.send(value).await;
                    }
                    return;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((value, _)) = pending.take() {
                    if tx.send(value).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// Runs `search` for every debounced term and forwards its results.
///
/// A search still running when a newer term settles is aborted, so results always belong to the latest term.
#[instrument(skip_all)]
pub async fn debounced_search<T, R, F, Fut>(rx: Receiver<T>, results_tx: Sender<(T, R)>, delay: Duration, search: F)
where
    T: Clone + Debug + Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let (settled_tx, mut settled_rx) = tokio::sync::mpsc::channel::<T>(1);
    let debouncer = tokio::spawn(debounce(rx, settled_tx, delay));

    let mut in_flight: Option<JoinHandle<()>> = None;
    while let Some(term) = settled_rx.recv().await {
        if let Some(handle) = in_flight.take() {
            if !handle.is_finished() {
                debug!("⌨️ Cancelling search superseded by {:?}", term);
                handle.abort();
            }
        }

        debug!("⌨️ Searching for {:?}...", term);
        let results_tx = results_tx.clone();
        let query = search(term.clone());
        in_flight = Some(tokio::spawn(async move {
            let results = query.await;
            let _ = results_tx.send((term, results)).await;
        }));
    }

    if let Some(handle) = in_flight {
        let _ = handle.await;
    }
    let _ = debouncer.await;
}
