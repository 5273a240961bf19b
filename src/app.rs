//! Screen runners
//!
//! Each screen is started from a [`Route`], draws frames to stdout and
//! ends on its own, on Ctrl-C, or with an error.

use crate::backend::{Backend, HttpBackend};
use crate::cli::OrderArgs;
use crate::config::{CollectionConfig, Config};
use crate::feed::{FeedClient, FeedOptions};
use crate::purchase::{PurchaseError, PurchaseFlow, PurchaseOptions, PurchaseState};
use crate::router::{Route, RouteError, Router};
use crate::view;
use std::future::Future;
use std::io::{IsTerminal, Write};
use std::sync::Arc;

/// Clear the terminal and home the cursor
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct App {
    config: Config,
    backend: Arc<dyn Backend>,
    router: Router,
}

impl App {
    /// Build the app against the configured HTTP backend
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = HttpBackend::new(&config.backend)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        let router = Router::from_config(&config);
        Self {
            config,
            backend,
            router,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    fn collection(&self, name: &str) -> Result<&CollectionConfig, RouteError> {
        self.config
            .collection(name)
            .ok_or_else(|| RouteError::UnknownCollection(name.to_string()))
    }

    /// Resolve a path and keep running screens until one ends without a follow-up
    pub async fn open(&self, path: &str, order: &OrderArgs) -> anyhow::Result<()> {
        let mut route = self.router.resolve(path)?;
        tracing::debug!(%route, "Opening route");

        while let Some(next) = self.run(&route, order).await? {
            tracing::debug!(from = %route, to = %next, "Navigating");
            route = next;
        }
        Ok(())
    }

    /// Run a single screen; returns the route to continue with, if any
    pub async fn run(&self, route: &Route, order: &OrderArgs) -> anyhow::Result<Option<Route>> {
        match route {
            Route::Home => {
                self.home();
                Ok(None)
            }
            Route::List { collection } => {
                self.watch(collection).await?;
                Ok(None)
            }
            Route::Purchase {
                collection,
                identifier,
            } => self.buy(collection, identifier, order).await,
        }
    }

    pub fn home(&self) {
        draw(&view::home::render(&self.config.collections), false);
    }

    /// Live list screen; returns on Ctrl-C
    pub async fn watch(&self, collection: &str) -> anyhow::Result<()> {
        self.watch_until(collection, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Live list screen that closes once `shutdown` resolves
    ///
    /// The initial bulk read is raced against `shutdown` too, so a hung
    /// backend never holds the screen open.
    pub async fn watch_until(
        &self,
        collection: &str,
        shutdown: impl Future<Output = ()>,
    ) -> anyhow::Result<()> {
        let collection = self.collection(collection)?;
        let skin = collection.skin;
        let clear = std::io::stdout().is_terminal();

        let mut feed = FeedClient::new(
            FeedOptions::from_config(&self.config, collection),
            Arc::clone(&self.backend),
        );
        let mut views = feed.subscribe_view();
        tokio::pin!(shutdown);

        let frame = view::list::render(&views.borrow_and_update(), skin);
        draw(&frame, clear);

        tokio::select! {
            _ = feed.initialize() => {}
            _ = &mut shutdown => {
                tracing::info!(collection = %collection.name, "Closing list screen before first load");
                return Ok(());
            }
        }
        feed.connect();

        loop {
            tokio::select! {
                changed = views.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let frame = view::list::render(&views.borrow_and_update(), skin);
                    draw(&frame, clear);
                }
                _ = &mut shutdown => {
                    tracing::info!(collection = %collection.name, "Closing list screen");
                    break;
                }
            }
        }

        feed.teardown();
        Ok(())
    }

    /// Purchase screen driven by command-line input
    ///
    /// Returns the list route after a successful order unless `--no-follow`
    /// is set.
    pub async fn buy(
        &self,
        collection: &str,
        identifier: &str,
        order: &OrderArgs,
    ) -> anyhow::Result<Option<Route>> {
        let collection = self.collection(collection)?;
        let skin = collection.skin;
        let mut flow = PurchaseFlow::new(
            Arc::clone(&self.backend),
            PurchaseOptions::from_config(&self.config, collection, identifier),
        );

        draw(&view::purchase::render(&flow, skin), false);
        flow.load().await;

        if let Some(form) = flow.form_mut() {
            order.apply(form);
        }
        draw(&view::purchase::render(&flow, skin), false);

        if !matches!(flow.state(), PurchaseState::Ready) {
            return Ok(None);
        }
        if !order.has_input() {
            println!("Pass --amount or --quantity to place an order.");
            return Ok(None);
        }

        let mut attempts_left = order.retries;
        loop {
            let result = tokio::select! {
                result = flow.submit() => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted while submitting; order outcome unknown");
                    return Ok(None);
                }
            };
            draw(&view::purchase::render(&flow, skin), false);

            match result {
                Ok(_) => {
                    let back = flow.return_route();
                    if order.no_follow {
                        println!("Back: {}", back);
                        return Ok(None);
                    }
                    return Ok(Some(back));
                }
                Err(PurchaseError::Submission(_)) if attempts_left > 0 => {
                    attempts_left -= 1;
                    tracing::info!(attempts_left, "Resubmitting order");
                }
                Err(PurchaseError::Invalid(errors)) => {
                    tracing::debug!(%errors, "Order rejected by validation");
                    return Ok(None);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Order not placed");
                    return Ok(None);
                }
            }
        }
    }
}

/// Write one frame to stdout
fn draw(frame: &str, clear: bool) {
    let mut stdout = std::io::stdout().lock();
    if clear {
        let _ = stdout.write_all(CLEAR_SCREEN.as_bytes());
    }
    let _ = stdout.write_all(frame.as_bytes());
    let _ = stdout.flush();
}
