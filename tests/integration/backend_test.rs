//! Integration tests for the HTTP backend

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tradinghub::backend::{Backend, BackendError, HttpBackend};
use tradinghub::config::{BackendConfig, Config};
use tradinghub::feed::{FeedClient, FeedOptions};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_config(uri: &str) -> BackendConfig {
    BackendConfig {
        base_url: uri.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_backend_from_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Hazy Sunset", "price": "7.25"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&backend_config(&server.uri())).unwrap();
    let items = backend.fetch_items("beverages").await.unwrap();
    assert_eq!(items, vec![json!({"id": 1, "name": "Hazy Sunset", "price": "7.25"})]);
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/stocks/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let backend = HttpBackend::with_timeout(&server.uri(), Duration::from_millis(200)).unwrap();
    let result = backend.fetch_item("stocks", "AAPL").await;
    assert!(matches!(result, Err(BackendError::Http(_))));
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/stocks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&backend_config(&server.uri())).unwrap();
    assert!(matches!(
        backend.fetch_items("stocks").await,
        Err(BackendError::Http(_))
    ));
}

#[tokio::test]
async fn test_feed_initialize_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/stocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "MSFT", "price": 410},
            {"symbol": "AAPL", "price": 190.5},
            {"price": 1},
            {"symbol": "NVDA", "price": 880.1}
        ])))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.backend.base_url = server.uri();
    let stocks = config.collection("stocks").unwrap();
    let backend = Arc::new(HttpBackend::new(&config.backend).unwrap());
    let feed = FeedClient::new(FeedOptions::from_config(&config, stocks), backend);

    feed.initialize().await;

    let ids: Vec<String> = feed
        .view()
        .items
        .iter()
        .map(|item| item.identifier().to_string())
        .collect();
    assert_eq!(ids, vec!["NVDA", "MSFT", "AAPL"]);
}

#[tokio::test]
async fn test_feed_initialize_server_error_leaves_snapshot_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.backend.base_url = server.uri();
    let beverages = config.collection("beverages").unwrap();
    let backend = Arc::new(HttpBackend::new(&config.backend).unwrap());
    let feed = FeedClient::new(FeedOptions::from_config(&config, beverages), backend);

    feed.initialize().await;
    assert!(feed.view().is_empty());
}
