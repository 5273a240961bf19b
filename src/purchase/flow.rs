//! Purchase screen state machine

use super::form::{FieldErrors, OrderStyle, PurchaseForm};
use crate::backend::{Backend, BackendError};
use crate::config::{CollectionConfig, Config};
use crate::item::{Item, ItemError};
use crate::router::Route;
use crate::telemetry::{increment, CounterMetric};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Notification shown when the backend rejects an order
pub const SUBMIT_FAILED: &str = "Order submission failed. Please try again.";

/// Purchase flow errors
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The item has not loaded, could not be loaded, or was already ordered
    #[error("Purchase screen is not ready ({0})")]
    NotReady(&'static str),
    /// An earlier submission never reported back
    #[error("An order is already being submitted")]
    InProgress,
    #[error("Invalid order: {0}")]
    Invalid(FieldErrors),
    #[error("Order submission failed: {0}")]
    Submission(#[source] BackendError),
}

/// Where the purchase screen is
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseState {
    Loading,
    Ready,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
    Unavailable { message: String },
}

impl PurchaseState {
    pub fn name(&self) -> &'static str {
        match self {
            PurchaseState::Loading => "loading",
            PurchaseState::Ready => "ready",
            PurchaseState::Submitting => "submitting",
            PurchaseState::Succeeded { .. } => "success",
            PurchaseState::Failed { .. } => "failed",
            PurchaseState::Unavailable { .. } => "unavailable",
        }
    }
}

/// Settings for one purchase screen
#[derive(Debug, Clone)]
pub struct PurchaseOptions {
    pub collection: String,
    pub identifier: String,
    pub identifier_keys: Vec<String>,
    /// Unit word in notifications, e.g. `pints`
    pub unit: String,
    pub submit_delay: Duration,
    pub load_timeout: Duration,
}

impl PurchaseOptions {
    pub fn from_config(
        config: &Config,
        collection: &CollectionConfig,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.name.clone(),
            identifier: identifier.into(),
            identifier_keys: collection.identifier_keys.clone(),
            unit: collection.unit.clone(),
            submit_delay: config.purchase.submit_delay(),
            load_timeout: config.purchase.load_timeout(),
        }
    }
}

/// Loads one item and places a single order for it
pub struct PurchaseFlow {
    backend: Arc<dyn Backend>,
    options: PurchaseOptions,
    state: PurchaseState,
    item: Option<Item>,
    form: Option<PurchaseForm>,
}

impl PurchaseFlow {
    pub fn new(backend: Arc<dyn Backend>, options: PurchaseOptions) -> Self {
        Self {
            backend,
            options,
            state: PurchaseState::Loading,
            item: None,
            form: None,
        }
    }

    pub fn state(&self) -> &PurchaseState {
        &self.state
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn form(&self) -> Option<&PurchaseForm> {
        self.form.as_ref()
    }

    pub fn options(&self) -> &PurchaseOptions {
        &self.options
    }

    /// The form, while it accepts edits
    pub fn form_mut(&mut self) -> Option<&mut PurchaseForm> {
        match self.state {
            PurchaseState::Ready | PurchaseState::Failed { .. } => self.form.as_mut(),
            _ => None,
        }
    }

    /// The list this purchase returns to
    pub fn return_route(&self) -> Route {
        Route::List {
            collection: self.options.collection.clone(),
        }
    }

    /// Fetch the item, bounded by the load timeout
    pub async fn load(&mut self) -> &PurchaseState {
        let fetch = self
            .backend
            .fetch_item(&self.options.collection, &self.options.identifier);

        let loaded = match tokio::time::timeout(self.options.load_timeout, fetch).await {
            Ok(Ok(value)) => Item::from_value(value, &self.options.identifier_keys)
                .map_err(|e: ItemError| e.to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "timed out after {}s",
                self.options.load_timeout.as_secs_f64()
            )),
        };

        match loaded {
            Ok(item) => {
                tracing::info!(
                    collection = %self.options.collection,
                    identifier = %self.options.identifier,
                    price = %item.price(),
                    "Item loaded"
                );
                self.form = Some(PurchaseForm::new(item.price()));
                self.item = Some(item);
                self.state = PurchaseState::Ready;
            }
            Err(reason) => {
                tracing::error!(
                    collection = %self.options.collection,
                    identifier = %self.options.identifier,
                    %reason,
                    "Item unavailable"
                );
                self.state = PurchaseState::Unavailable {
                    message: format!("{} is unavailable: {}", self.options.identifier, reason),
                };
            }
        }
        &self.state
    }

    /// Validate, wait the artificial delay, then post the order
    ///
    /// On success returns the notification text. A rejected order keeps
    /// the form so it can be submitted again.
    pub async fn submit(&mut self) -> Result<String, PurchaseError> {
        match self.state {
            PurchaseState::Ready | PurchaseState::Failed { .. } => {}
            PurchaseState::Submitting => return Err(PurchaseError::InProgress),
            ref other => return Err(PurchaseError::NotReady(other.name())),
        }

        let (quantity, style) = match self.form.as_mut() {
            Some(form) => (
                form.validate().map_err(PurchaseError::Invalid)?,
                form.style(),
            ),
            None => return Err(PurchaseError::NotReady(self.state.name())),
        };

        self.state = PurchaseState::Submitting;
        tokio::time::sleep(self.options.submit_delay).await;

        let result = self
            .backend
            .purchase(&self.options.collection, &self.options.identifier, quantity)
            .await;

        match result {
            Ok(()) => {
                increment(CounterMetric::PurchasesSucceeded);
                let message = self.success_message(style, quantity);
                tracing::info!(identifier = %self.options.identifier, quantity, %style, "Order placed");
                self.state = PurchaseState::Succeeded {
                    message: message.clone(),
                };
                Ok(message)
            }
            Err(e) => {
                increment(CounterMetric::PurchasesFailed);
                tracing::error!(identifier = %self.options.identifier, error = %e, "Order submission failed");
                self.state = PurchaseState::Failed {
                    message: SUBMIT_FAILED.to_string(),
                };
                Err(PurchaseError::Submission(e))
            }
        }
    }

    fn success_message(&self, style: OrderStyle, quantity: u64) -> String {
        let name = self
            .item
            .as_ref()
            .map(Item::display_name)
            .unwrap_or(&self.options.identifier);
        format!(
            "Successfully placed {} order for {} {} of {}",
            style, quantity, self.options.unit, name
        )
    }
}
