//! Live item feed: one bulk read plus one broker subscription
//!
//! All mutations go through a single driver task so updates are applied in
//! arrival order. The driver also owns every delta expiry deadline, which
//! means aborting it is enough to cancel all pending timers.

use super::deltas::DeltaBoard;
use super::snapshot::{FeedSnapshot, UpdateOutcome};
use super::types::{ConnectionStatus, FeedView};
use crate::backend::Backend;
use crate::config::{CollectionConfig, Config};
use crate::item::{parse_items, Item, ItemError};
use crate::stomp::{StompConfig, StompEvent, StompSubscriber};
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};
use crate::ws::WsConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Everything a feed needs besides the backend
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Collection name, also the REST path segment
    pub collection: String,
    /// Identifier precedence for this collection's items
    pub identifier_keys: Vec<String>,
    pub price_window: Duration,
    pub position_window: Duration,
    pub stomp: StompConfig,
}

impl FeedOptions {
    /// Build options for one configured collection
    pub fn from_config(config: &Config, collection: &CollectionConfig) -> Self {
        let ws = WsConfig::new(&config.backend.ws_url)
            .max_reconnects(config.feed.max_reconnect_attempts)
            .reconnect_delay(config.feed.reconnect_delay())
            .ping_interval(config.feed.ping_interval());

        Self {
            collection: collection.name.clone(),
            identifier_keys: collection.identifier_keys.clone(),
            price_window: config.feed.price_delta_window(),
            position_window: config.feed.position_delta_window(),
            stomp: StompConfig::new(ws, &collection.topic),
        }
    }
}

struct FeedState {
    snapshot: FeedSnapshot,
    deltas: DeltaBoard,
    status: ConnectionStatus,
}

struct FeedShared {
    collection: String,
    keys: Vec<String>,
    backend: Arc<dyn Backend>,
    state: RwLock<FeedState>,
    view_tx: watch::Sender<FeedView>,
}

/// Keeps a ranked snapshot of one collection in sync with the backend
pub struct FeedClient {
    shared: Arc<FeedShared>,
    stomp: StompConfig,
    task: Option<JoinHandle<()>>,
}

impl FeedClient {
    pub fn new(options: FeedOptions, backend: Arc<dyn Backend>) -> Self {
        let (view_tx, _) = watch::channel(FeedView::default());
        let state = FeedState {
            snapshot: FeedSnapshot::new(),
            deltas: DeltaBoard::new(options.price_window, options.position_window),
            status: ConnectionStatus::Connecting,
        };

        Self {
            shared: Arc::new(FeedShared {
                collection: options.collection,
                keys: options.identifier_keys,
                backend,
                state: RwLock::new(state),
                view_tx,
            }),
            stomp: options.stomp,
            task: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.shared.collection
    }

    /// Replace the snapshot with a fresh bulk read
    ///
    /// Failures are logged and leave the current snapshot in place.
    pub async fn initialize(&self) {
        self.shared.initialize().await;
    }

    /// Apply one update payload from the broker
    pub async fn on_update(&self, payload: &str) -> Result<UpdateOutcome, ItemError> {
        self.shared.on_update(payload).await
    }

    /// Subscribe to the collection's broker topic and start applying updates
    pub fn connect(&mut self) {
        let events = StompSubscriber::new(self.stomp.clone()).subscribe();
        self.connect_with(events);
    }

    /// Drive the feed from an existing event stream
    pub fn connect_with(&mut self, events: mpsc::Receiver<StompEvent>) {
        self.teardown();
        let shared = Arc::clone(&self.shared);
        self.task = Some(tokio::spawn(drive(shared, events)));
    }

    pub fn is_connected(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Close the subscription and cancel every pending expiry
    ///
    /// Safe to call before `connect` and more than once.
    pub fn teardown(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!(collection = %self.shared.collection, "Tearing down feed");
            task.abort();
        }
    }

    /// Latest published view
    pub fn view(&self) -> FeedView {
        self.shared.view_tx.borrow().clone()
    }

    /// Receiver that yields a new view after every mutation
    pub fn subscribe_view(&self) -> watch::Receiver<FeedView> {
        self.shared.view_tx.subscribe()
    }
}

impl Drop for FeedClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl FeedShared {
    async fn initialize(&self) {
        let values = match self.backend.fetch_items(&self.collection).await {
            Ok(values) => values,
            Err(e) => {
                tracing::error!(collection = %self.collection, error = %e, "Bulk read failed, keeping current snapshot");
                return;
            }
        };
        let items = parse_items(values, &self.keys);

        let mut state = self.state.write().await;
        state.snapshot.replace_all(items);
        increment(CounterMetric::FeedResyncs);
        set_gauge(GaugeMetric::SnapshotSize, state.snapshot.len() as f64);
        tracing::info!(collection = %self.collection, items = state.snapshot.len(), "Snapshot loaded");
        self.publish(&state);
    }

    async fn on_update(&self, payload: &str) -> Result<UpdateOutcome, ItemError> {
        let item = Item::from_json(payload, &self.keys).map_err(|e| {
            tracing::warn!(collection = %self.collection, error = %e, "Dropping malformed update");
            increment(CounterMetric::FeedRejectedUpdates);
            e
        })?;
        let identifier = item.identifier().to_string();
        let now = Instant::now();

        let mut state = self.state.write().await;
        let outcome = state.snapshot.apply(item);
        if let Some(direction) = outcome.price_direction {
            state.deltas.record_price(identifier.clone(), direction, now);
        }
        state
            .deltas
            .record_positions(outcome.position_deltas.clone(), now);

        increment(CounterMetric::FeedUpdates);
        set_gauge(GaugeMetric::SnapshotSize, state.snapshot.len() as f64);
        tracing::trace!(
            identifier = %identifier,
            inserted = outcome.inserted,
            moved = outcome.position_deltas.len(),
            "Applied update"
        );
        self.publish(&state);
        Ok(outcome)
    }

    async fn set_status(&self, status: ConnectionStatus) {
        let mut state = self.state.write().await;
        if state.status != status {
            tracing::info!(collection = %self.collection, ?status, "Feed status changed");
            state.status = status;
            self.publish(&state);
        }
    }

    async fn expire_deltas(&self, now: Instant) {
        let mut state = self.state.write().await;
        if state.deltas.expire(now) {
            self.publish(&state);
        }
    }

    async fn next_expiry(&self) -> Option<Instant> {
        self.state.read().await.deltas.next_expiry()
    }

    async fn handle_event(&self, event: StompEvent) {
        match event {
            StompEvent::Connected => {
                self.set_status(ConnectionStatus::Connected).await;
                self.initialize().await;
            }
            StompEvent::Message { body, .. } => {
                // Malformed payloads are already logged and counted
                let _ = self.on_update(&body).await;
            }
            StompEvent::Error { message } => {
                tracing::error!(collection = %self.collection, %message, "Broker error");
                self.set_status(ConnectionStatus::Error).await;
            }
            StompEvent::Reconnecting { attempt } => {
                tracing::warn!(collection = %self.collection, attempt, "Broker connection lost, reconnecting");
                self.set_status(ConnectionStatus::Connecting).await;
            }
            StompEvent::Disconnected => {
                tracing::warn!(collection = %self.collection, "Broker connection closed");
                self.set_status(ConnectionStatus::Error).await;
            }
        }
    }

    fn publish(&self, state: &FeedState) {
        self.view_tx.send_replace(FeedView {
            items: state.snapshot.items().to_vec(),
            status: state.status,
            price_deltas: state.deltas.price_deltas(),
            position_deltas: state.deltas.position_deltas(),
        });
    }
}

/// Driver loop: apply events in order and fire delta expiries
///
/// Keeps running after the event stream ends until the last delta expired.
async fn drive(shared: Arc<FeedShared>, mut events: mpsc::Receiver<StompEvent>) {
    let mut events_open = true;

    loop {
        let next_expiry = shared.next_expiry().await;
        if !events_open && next_expiry.is_none() {
            break;
        }

        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => shared.handle_event(event).await,
                None => {
                    tracing::warn!(collection = %shared.collection, "Feed event stream ended");
                    events_open = false;
                    // No further updates can arrive
                    shared.set_status(ConnectionStatus::Error).await;
                }
            },

            _ = sleep_until_deadline(next_expiry) => {
                shared.expire_deltas(Instant::now()).await;
            }
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
