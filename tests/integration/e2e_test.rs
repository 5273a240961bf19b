//! End-to-end integration tests

use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tradinghub::app::App;
use tradinghub::backend::HttpBackend;
use tradinghub::cli::OrderArgs;
use tradinghub::config::Config;
use tradinghub::purchase::OrderStyle;
use tradinghub::router::Route;
use tradinghub::view::Skin;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_bundled_config_loads() {
    let config = Config::bundled().unwrap();
    let names: Vec<&str> = config.collections.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"stocks"));
    assert!(names.contains(&"beverages"));
    assert_eq!(config.collection("beverages").unwrap().skin, Skin::Beverages);
}

#[test]
fn test_config_file_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [backend]
        base_url = "http://localhost:9000"
        ws_url = "ws://localhost:9000/ws"

        [purchase]
        default_collection = "stocks"

        [[collections]]
        name = "stocks"
        topic = "/topic/stocks"
        skin = "stocks"
        identifier_keys = ["symbol"]
        unit = "shares"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.backend.base_url, "http://localhost:9000");
    assert_eq!(config.collections.len(), 1);
    assert_eq!(config.purchase.default_collection, "stocks");
}

#[test]
fn test_routes_round_trip() {
    let config = Config::bundled().unwrap();
    let app = App::with_backend(
        config,
        Arc::new(HttpBackend::new(&Default::default()).unwrap()),
    );
    let router = app.router();

    for (path, _) in router.table() {
        if path.contains('{') {
            continue;
        }
        let route = router.resolve(&path).unwrap();
        assert_eq!(route.path(), path);
    }

    let route = router.resolve("/stocks/AAPL/purchase").unwrap();
    assert_eq!(
        route.back(),
        Route::List {
            collection: "stocks".to_string()
        }
    );
    assert!(router.resolve("/stocks/AAPL/sell").is_err());
}

#[tokio::test]
async fn test_open_purchase_route_places_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 5, "name": "Golden Hour", "price": 8})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/beverages/5/purchase"))
        .and(body_json(json!({"amount": 2})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::bundled().unwrap();
    config.backend.base_url = server.uri();
    config.purchase.submit_delay_ms = 0;
    let app = App::new(config).unwrap();

    let order = OrderArgs {
        amount: Some("16".to_string()),
        style: OrderStyle::Tap,
        no_follow: true,
        ..Default::default()
    };
    app.open("/5/purchase", &order).await.unwrap();
}
