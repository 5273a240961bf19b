//! Topic subscriber speaking STOMP over the reconnecting WebSocket client

use super::frame::{decode, Command, Frame};
use crate::ws::{WsClient, WsConfig, WsMessage};
use reqwest::Url;
use tokio::sync::mpsc;

/// Subscription id used for the single topic this client follows
const SUBSCRIPTION_ID: &str = "sub-0";

/// Configuration for a single-topic STOMP subscription
#[derive(Debug, Clone)]
pub struct StompConfig {
    /// Transport settings, including the broker URL
    pub ws: WsConfig,
    /// Topic to subscribe to, e.g. `/topic/stocks`
    pub destination: String,
    /// Virtual host sent in CONNECT
    pub host: String,
}

impl StompConfig {
    /// Create a config, deriving the virtual host from the broker URL
    pub fn new(ws: WsConfig, destination: impl Into<String>) -> Self {
        let host = Url::parse(&ws.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| "localhost".to_string());

        Self {
            ws,
            destination: destination.into(),
            host,
        }
    }
}

/// Events surfaced to the subscriber's owner
#[derive(Debug, Clone, PartialEq)]
pub enum StompEvent {
    /// Broker accepted CONNECT and the topic subscription was sent
    Connected,
    /// A message arrived on the subscribed topic
    Message { destination: String, body: String },
    /// Broker reported a protocol-level error
    Error { message: String },
    /// Transport lost; waiting to reconnect
    Reconnecting { attempt: u32 },
    /// Transport gave up or was closed
    Disconnected,
}

/// Follows one broker topic across reconnections
pub struct StompSubscriber {
    config: StompConfig,
}

impl StompSubscriber {
    pub fn new(config: StompConfig) -> Self {
        Self { config }
    }

    pub fn destination(&self) -> &str {
        &self.config.destination
    }

    /// Open the transport and start the session task
    ///
    /// CONNECT and SUBSCRIBE are replayed after every reconnection. Dropping
    /// the returned receiver sends DISCONNECT and closes the socket.
    pub fn subscribe(&self) -> mpsc::Receiver<StompEvent> {
        let (event_tx, event_rx) = mpsc::channel(1024);
        let (ws_rx, ws_tx) = WsClient::new(self.config.ws.clone()).connect();
        let config = self.config.clone();

        tracing::info!(destination = %config.destination, "Subscribing to broker topic");

        tokio::spawn(async move {
            run_session(config, ws_rx, ws_tx, event_tx).await;
        });

        event_rx
    }
}

async fn run_session(
    config: StompConfig,
    mut ws_rx: mpsc::Receiver<WsMessage>,
    ws_tx: mpsc::Sender<String>,
    event_tx: mpsc::Sender<StompEvent>,
) {
    loop {
        tokio::select! {
            msg = ws_rx.recv() => {
                let Some(msg) = msg else { break };
                match msg {
                    WsMessage::Connected => {
                        tracing::debug!(host = %config.host, "Sending STOMP CONNECT");
                        if ws_tx.send(Frame::connect(&config.host).encode()).await.is_err() {
                            break;
                        }
                    }
                    WsMessage::Text(text) => {
                        handle_text(&config, &text, &ws_tx, &event_tx).await;
                    }
                    WsMessage::Binary(data) => match String::from_utf8(data) {
                        Ok(text) => handle_text(&config, &text, &ws_tx, &event_tx).await,
                        Err(_) => tracing::warn!("Dropping non UTF-8 binary frame"),
                    },
                    WsMessage::Reconnecting { attempt } => {
                        let _ = event_tx.send(StompEvent::Reconnecting { attempt }).await;
                    }
                    WsMessage::Disconnected => {
                        let _ = event_tx.send(StompEvent::Disconnected).await;
                        break;
                    }
                }
            }

            _ = event_tx.closed() => {
                tracing::debug!("Subscriber dropped, sending DISCONNECT");
                let _ = ws_tx.send(Frame::disconnect().encode()).await;
                break;
            }
        }
    }
}

async fn handle_text(
    config: &StompConfig,
    text: &str,
    ws_tx: &mpsc::Sender<String>,
    event_tx: &mpsc::Sender<StompEvent>,
) {
    let frames = match decode(text) {
        Ok(frames) => frames,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping undecodable STOMP frame");
            return;
        }
    };

    for frame in frames {
        match frame.command {
            Command::Connected => {
                tracing::info!(
                    version = frame.get_header("version").unwrap_or("unknown"),
                    "STOMP connected"
                );
                let subscribe = Frame::subscribe(SUBSCRIPTION_ID, &config.destination);
                if ws_tx.send(subscribe.encode()).await.is_err() {
                    return;
                }
                let _ = event_tx.send(StompEvent::Connected).await;
            }
            Command::Message => {
                if let Some(sub) = frame.get_header("subscription") {
                    if sub != SUBSCRIPTION_ID {
                        tracing::debug!(subscription = sub, "Ignoring message for other subscription");
                        continue;
                    }
                }
                let destination = frame
                    .get_header("destination")
                    .unwrap_or(&config.destination)
                    .to_string();
                let _ = event_tx
                    .send(StompEvent::Message {
                        destination,
                        body: frame.body,
                    })
                    .await;
            }
            Command::Error => {
                let message = frame
                    .get_header("message")
                    .map(str::to_string)
                    .unwrap_or_else(|| frame.body.clone());
                tracing::error!(message = %message, "Broker error");
                let _ = event_tx.send(StompEvent::Error { message }).await;
            }
            other => {
                tracing::debug!(command = %other, "Ignoring STOMP frame");
            }
        }
    }
}
