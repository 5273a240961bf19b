//! Backend API access
//!
//! The backend owns pricing and order execution; this module only reads
//! item collections and submits purchases over its REST API.

mod http;

pub use http::{HttpBackend, DEFAULT_BASE_URL};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Backend request errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Base URL cannot be used to build endpoints
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    /// Transport, timeout or body decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Trait for backend implementations
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /v1/{collection}`
    async fn fetch_items(&self, collection: &str) -> Result<Vec<Value>, BackendError>;

    /// `GET /v1/{collection}/{identifier}`
    async fn fetch_item(&self, collection: &str, identifier: &str) -> Result<Value, BackendError>;

    /// `POST /v1/{collection}/{identifier}/purchase` with `{"amount": quantity}`
    async fn purchase(
        &self,
        collection: &str,
        identifier: &str,
        quantity: u64,
    ) -> Result<(), BackendError>;
}
