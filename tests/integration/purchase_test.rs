//! Integration tests for the purchase flow over HTTP

use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use tradinghub::backend::HttpBackend;
use tradinghub::config::Config;
use tradinghub::purchase::{
    Field, OrderStyle, PurchaseError, PurchaseFlow, PurchaseOptions, PurchaseState,
    QUANTITY_NOT_WHOLE, SUBMIT_FAILED,
};
use tradinghub::router::Route;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn flow(server: &MockServer, collection: &str, identifier: &str) -> PurchaseFlow {
    let mut config = Config::default();
    config.backend.base_url = server.uri();
    config.purchase.submit_delay_ms = 0;

    let collection = config.collection(collection).unwrap();
    let backend = Arc::new(HttpBackend::new(&config.backend).unwrap());
    PurchaseFlow::new(
        backend,
        PurchaseOptions::from_config(&config, collection, identifier),
    )
}

async fn serve_item(server: &MockServer, route: &str, item: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(item))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_order_by_amount() {
    let server = MockServer::start().await;
    serve_item(
        &server,
        "/v1/beverages/7",
        json!({"id": 7, "name": "Hazy Sunset", "price": "6.50"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v1/beverages/7/purchase"))
        .and(body_json(json!({"amount": 3})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = flow(&server, "beverages", "7").await;
    assert_eq!(flow.load().await, &PurchaseState::Ready);

    let form = flow.form_mut().unwrap();
    form.set_amount("20");
    form.set_style(OrderStyle::Bottle);
    assert_eq!(form.quantity(), "3");

    let message = assert_ok!(flow.submit().await);
    assert_eq!(
        message,
        "Successfully placed bottle order for 3 pints of Hazy Sunset"
    );
    assert_eq!(
        flow.return_route(),
        Route::List {
            collection: "beverages".to_string()
        }
    );
}

#[tokio::test]
async fn test_rejected_order_can_be_resubmitted() {
    let server = MockServer::start().await;
    serve_item(&server, "/v1/stocks/AAPL", json!({"symbol": "AAPL", "price": 190})).await;
    Mock::given(method("POST"))
        .and(path("/v1/stocks/AAPL/purchase"))
        .respond_with(ResponseTemplate::new(500).set_body_string("busy"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/stocks/AAPL/purchase"))
        .and(body_json(json!({"amount": 2})))
        .respond_with(ResponseTemplate::new(201))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = flow(&server, "stocks", "AAPL").await;
    flow.load().await;
    flow.form_mut().unwrap().set_quantity("2");

    let err = assert_err!(flow.submit().await);
    assert!(matches!(err, PurchaseError::Submission(_)));
    assert_eq!(
        flow.state(),
        &PurchaseState::Failed {
            message: SUBMIT_FAILED.to_string()
        }
    );
    // Inputs survive the rejection
    assert_eq!(flow.form().unwrap().quantity(), "2");

    assert_ok!(flow.submit().await);
    assert_eq!(flow.state().name(), "success");
}

#[tokio::test]
async fn test_invalid_quantity_never_reaches_backend() {
    let server = MockServer::start().await;
    serve_item(&server, "/v1/beverages/2", json!({"id": 2, "price": 4})).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut flow = flow(&server, "beverages", "2").await;
    flow.load().await;

    flow.form_mut().unwrap().set_quantity("1.5");
    let err = assert_err!(flow.submit().await);
    match err {
        PurchaseError::Invalid(errors) => {
            assert_eq!(errors.get(Field::Quantity), Some(QUANTITY_NOT_WHOLE));
        }
        other => panic!("unexpected: {other:?}"),
    }

    flow.form_mut().unwrap().set_quantity("0");
    assert_err!(flow.submit().await);
    assert_eq!(flow.state(), &PurchaseState::Ready);
}

#[tokio::test]
async fn test_missing_item_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut flow = flow(&server, "beverages", "404").await;
    assert_eq!(flow.load().await.name(), "unavailable");
    assert!(flow.form_mut().is_none());
    assert!(matches!(
        flow.submit().await,
        Err(PurchaseError::NotReady("unavailable"))
    ));
}
