//! REST client for the TradingHub backend

use super::{Backend, BackendError};
use crate::config::BackendConfig;
use crate::telemetry::{record_latency, LatencyMetric};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Backend base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Purchase request body; `amount` is the whole number of units
#[derive(Debug, Serialize)]
struct PurchaseRequest {
    amount: u64,
}

/// HTTP implementation of [`Backend`]
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    /// Create a client from the backend section of the configuration
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::with_timeout(&config.base_url, config.timeout())
    }

    /// Create a client for an explicit base URL
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build `{base}/v1/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status { status, body })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_items(&self, collection: &str) -> Result<Vec<Value>, BackendError> {
        let url = self.endpoint(&[collection])?;
        tracing::debug!(url = %url, "Fetching collection");

        let started = Instant::now();
        let response = self.client.get(url).send().await?;
        record_latency(LatencyMetric::BackendRequest, started.elapsed());

        let items: Vec<Value> = Self::check(response).await?.json().await?;
        tracing::debug!(collection, count = items.len(), "Fetched collection");
        Ok(items)
    }

    async fn fetch_item(&self, collection: &str, identifier: &str) -> Result<Value, BackendError> {
        let url = self.endpoint(&[collection, identifier])?;
        tracing::debug!(url = %url, "Fetching item");

        let started = Instant::now();
        let response = self.client.get(url).send().await?;
        record_latency(LatencyMetric::BackendRequest, started.elapsed());

        Ok(Self::check(response).await?.json().await?)
    }

    async fn purchase(
        &self,
        collection: &str,
        identifier: &str,
        quantity: u64,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(&[collection, identifier, "purchase"])?;
        tracing::info!(url = %url, quantity, "Submitting purchase");

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .json(&PurchaseRequest { amount: quantity })
            .send()
            .await?;
        record_latency(LatencyMetric::PurchaseSubmission, started.elapsed());

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(uri: &str) -> HttpBackend {
        HttpBackend::with_timeout(uri, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_building() {
        let backend = backend("http://localhost:8080");
        let url = backend.endpoint(&["beverages", "Hazy IPA", "purchase"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/beverages/Hazy%20IPA/purchase"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let backend = backend("http://gateway.local/api/");
        let url = backend.endpoint(&["stocks"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway.local/api/v1/stocks");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpBackend::with_timeout("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));

        let result = HttpBackend::with_timeout("mailto:ops@example.com", Duration::from_secs(1));
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/stocks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"symbol": "AAPL", "price": 190.5},
                {"symbol": "MSFT", "price": 410}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let items = backend(&server.uri()).fetch_items("stocks").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn test_fetch_item_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/beverages/42"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such beer"))
            .mount(&server)
            .await;

        let err = backend(&server.uri())
            .fetch_item("beverages", "42")
            .await
            .unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such beer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_purchase_posts_quantity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/beverages/7/purchase"))
            .and(body_json(json!({"amount": 3})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        backend(&server.uri())
            .purchase("beverages", "7", 3)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_purchase_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/stocks/AAPL/purchase"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = backend(&server.uri()).purchase("stocks", "AAPL", 1).await;
        assert!(matches!(
            result,
            Err(BackendError::Status { status: 500, .. })
        ));
    }
}
