//! Configuration types for tradinghub

use crate::backend::DEFAULT_BASE_URL;
use crate::item::DEFAULT_IDENTIFIER_KEYS;
use crate::telemetry::LogFormat;
use crate::view::Skin;
use serde::Deserialize;
use std::time::Duration;

/// Bundled example configuration, used when no config file is found
pub const EXAMPLE_CONFIG: &str = include_str!("../config.toml.example");

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub purchase: PurchaseConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,
}

/// Backend endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// STOMP broker WebSocket URL
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Live feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Fixed delay between broker reconnection attempts
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// WebSocket ping interval
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,

    /// Consecutive failed connects before giving up (0 = never)
    #[serde(default)]
    pub max_reconnect_attempts: u32,

    /// How long a rank change stays highlighted
    #[serde(default = "default_position_delta_ms")]
    pub position_delta_ms: u64,

    /// How long a price change stays highlighted
    #[serde(default = "default_price_delta_ms")]
    pub price_delta_ms: u64,
}

/// Purchase screen configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseConfig {
    /// Artificial latency before an order is posted
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,

    /// Give up loading the item after this long
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,

    /// Collection used by the short `/{id}/purchase` route
    #[serde(default = "default_purchase_collection")]
    pub default_collection: String,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when unset
    pub metrics_port: Option<u16>,
}

/// One browsable collection of items
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Path segment in the REST API and in routes, e.g. `stocks`
    pub name: String,
    /// Broker topic carrying item updates
    pub topic: String,
    /// Presentation skin
    pub skin: Skin,
    /// Identifier precedence for items of this collection
    #[serde(default = "default_identifier_keys")]
    pub identifier_keys: Vec<String>,
    /// Unit name used in order summaries, e.g. `pints`
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_ws_url() -> String {
    "ws://localhost:8080/ws".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_reconnect_delay_ms() -> u64 {
    5000
}
fn default_ping_interval_secs() -> u64 {
    30
}
fn default_position_delta_ms() -> u64 {
    600
}
fn default_price_delta_ms() -> u64 {
    3000
}
fn default_submit_delay_ms() -> u64 {
    2000
}
fn default_load_timeout_secs() -> u64 {
    10
}
fn default_purchase_collection() -> String {
    "beverages".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_identifier_keys() -> Vec<String> {
    DEFAULT_IDENTIFIER_KEYS.iter().map(|k| k.to_string()).collect()
}
fn default_unit() -> String {
    "units".to_string()
}

fn default_collections() -> Vec<CollectionConfig> {
    vec![
        CollectionConfig {
            name: "stocks".to_string(),
            topic: "/topic/stocks".to_string(),
            skin: Skin::Stocks,
            identifier_keys: vec!["symbol".into(), "id".into(), "name".into()],
            unit: "shares".to_string(),
        },
        CollectionConfig {
            name: "beverages".to_string(),
            topic: "/topic/beers".to_string(),
            skin: Skin::Beverages,
            identifier_keys: vec!["id".into(), "name".into(), "symbol".into()],
            unit: "pints".to_string(),
        },
    ]
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 5000,
            ping_interval_secs: 30,
            max_reconnect_attempts: 0,
            position_delta_ms: 600,
            price_delta_ms: 3000,
        }
    }
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
            load_timeout_secs: 10,
            default_collection: default_purchase_collection(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            feed: FeedConfig::default(),
            purchase: PurchaseConfig::default(),
            telemetry: TelemetryConfig::default(),
            collections: default_collections(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FeedConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn position_delta_window(&self) -> Duration {
        Duration::from_millis(self.position_delta_ms)
    }

    pub fn price_delta_window(&self) -> Duration {
        Duration::from_millis(self.price_delta_ms)
    }
}

impl PurchaseConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Configuration shipped with the binary
    pub fn bundled() -> anyhow::Result<Self> {
        Ok(toml::from_str(EXAMPLE_CONFIG)?)
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }
}
