//! Integration tests for the live feed against a local STOMP broker

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};
use tradinghub::backend::HttpBackend;
use tradinghub::config::Config;
use tradinghub::feed::{ConnectionStatus, Direction, FeedClient, FeedOptions, FeedView};
use tradinghub::stomp::{decode, Command};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type BrokerSocket = WebSocketStream<tokio::net::TcpStream>;

async fn next_frame(ws: &mut BrokerSocket) -> Command {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let frames = decode(&text).unwrap();
                if let Some(frame) = frames.into_iter().next() {
                    return frame.command;
                }
            }
            Some(Ok(_)) => continue,
            other => panic!("unexpected: {:?}", other),
        }
    }
}

/// Accept one client and complete CONNECT/SUBSCRIBE
async fn handshake(listener: &TcpListener) -> BrokerSocket {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = accept_async(stream).await.unwrap();
    assert_eq!(next_frame(&mut ws).await, Command::Connect);
    ws.send(Message::Text("CONNECTED\nversion:1.2\n\n\0".into()))
        .await
        .unwrap();
    assert_eq!(next_frame(&mut ws).await, Command::Subscribe);
    ws
}

fn message(body: serde_json::Value) -> Message {
    Message::Text(format!(
        "MESSAGE\ndestination:/topic/beers\nsubscription:sub-0\nmessage-id:1\n\n{}\0",
        body
    ))
}

async fn wait_for(
    rx: &mut watch::Receiver<FeedView>,
    mut predicate: impl FnMut(&FeedView) -> bool,
) -> FeedView {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            {
                let view = rx.borrow_and_update();
                if predicate(&*view) {
                    return (*view).clone();
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("view never matched")
}

fn ids(view: &FeedView) -> Vec<&str> {
    view.items.iter().map(|item| item.identifier()).collect()
}

async fn setup() -> (TcpListener, MockServer, FeedClient) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = MockServer::start().await;

    let mut config = Config::default();
    config.backend.base_url = server.uri();
    config.backend.ws_url = format!("ws://{}/ws", listener.local_addr().unwrap());
    config.feed.reconnect_delay_ms = 50;

    let beverages = config.collection("beverages").unwrap();
    let backend = Arc::new(HttpBackend::new(&config.backend).unwrap());
    let feed = FeedClient::new(FeedOptions::from_config(&config, beverages), backend);
    (listener, server, feed)
}

#[tokio::test]
async fn test_live_updates_reconcile_with_bulk_read() {
    let (listener, server, mut feed) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "name": "Amber", "price": 10},
            {"id": "B", "name": "Bock", "price": 5}
        ])))
        .mount(&server)
        .await;

    let broker = tokio::spawn(async move {
        let mut ws = handshake(&listener).await;
        ws.send(message(json!({"id": "B", "price": 20}))).await.unwrap();
        ws.send(message(json!({"id": "C", "price": 1}))).await.unwrap();
        ws.send(message(json!({"price": 99}))).await.unwrap();
        assert_eq!(next_frame(&mut ws).await, Command::Disconnect);
    });

    let mut views = feed.subscribe_view();
    feed.connect();

    let view = wait_for(&mut views, |v| v.items.len() == 3).await;
    assert_eq!(ids(&view), vec!["B", "A", "C"]);
    assert_eq!(view.status, ConnectionStatus::Connected);
    assert_eq!(view.price_delta("B").unwrap().direction, Direction::Up);
    assert!(view.price_delta("C").is_none());
    assert_eq!(view.items[0].display_name(), "Bock");

    feed.teardown();
    tokio::time::timeout(Duration::from_secs(10), broker)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_broker_error_keeps_snapshot() {
    let (listener, server, mut feed) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "price": 10}
        ])))
        .mount(&server)
        .await;

    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let broker = tokio::spawn(async move {
        let mut ws = handshake(&listener).await;
        let _ = release_rx.await;
        ws.send(Message::Text("ERROR\nmessage:no such topic\n\n\0".into()))
            .await
            .unwrap();
        // Hold the socket until the client goes away
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut views = feed.subscribe_view();
    feed.connect();
    wait_for(&mut views, |v| v.items.len() == 1).await;
    release_tx.send(()).unwrap();

    let view = wait_for(&mut views, |v| v.status == ConnectionStatus::Error).await;
    assert_eq!(ids(&view), vec!["A"]);

    feed.teardown();
    tokio::time::timeout(Duration::from_secs(10), broker)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_reconnect_resyncs_snapshot() {
    let (listener, server, mut feed) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "price": 10},
            {"id": "B", "price": 5}
        ])))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/beverages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "D", "price": 40}
        ])))
        .with_priority(2)
        .mount(&server)
        .await;

    let (dropped_tx, dropped_rx) = tokio::sync::oneshot::channel::<()>();
    let broker = tokio::spawn(async move {
        let mut ws = handshake(&listener).await;
        let _ = dropped_rx.await;
        ws.close(None).await.unwrap();

        let mut ws = handshake(&listener).await;
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut views = feed.subscribe_view();
    feed.connect();
    wait_for(&mut views, |v| ids(v) == vec!["A", "B"]).await;
    dropped_tx.send(()).unwrap();

    let view = wait_for(&mut views, |v| ids(v) == vec!["D"]).await;
    assert_eq!(view.status, ConnectionStatus::Connected);

    feed.teardown();
    tokio::time::timeout(Duration::from_secs(10), broker)
        .await
        .unwrap()
        .unwrap();
}
