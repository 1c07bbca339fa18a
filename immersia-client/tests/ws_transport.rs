// immersia-client/tests/ws_transport.rs
// Socket.IO handshake and event flow against a local WebSocket server

use axum::Router;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use axum::routing::get;
use immersia_client::{
    ClientConfig, FeedEvent, FeedHub, PushConfig, PushConnection, PushTransport, Subscription,
    WsTransport,
};
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Text frames the fake server received from the client
type Seen = mpsc::UnboundedSender<String>;

async fn next_text(socket: &mut WebSocket) -> Option<String> {
    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Text(text) = msg {
            return Some(text.to_string());
        }
    }
    None
}

async fn session(mut socket: WebSocket, seen: Seen, reject: bool) {
    let open = r#"0{"sid":"s-1","pingInterval":25000,"pingTimeout":20000}"#;
    if socket.send(Message::Text(open.into())).await.is_err() {
        return;
    }
    let Some(connect) = next_text(&mut socket).await else {
        return;
    };
    let _ = seen.send(connect);

    if reject {
        let _ = socket
            .send(Message::Text(r#"44{"message":"not allowed"}"#.into()))
            .await;
        return;
    }

    let _ = socket.send(Message::Text(r#"40{"sid":"n-1"}"#.into())).await;
    let _ = socket.send(Message::Text("2".into())).await;
    if let Some(pong) = next_text(&mut socket).await {
        let _ = seen.send(pong);
    }
    let _ = socket
        .send(Message::Text(
            r#"42["pcStatusUpdate",{"pc_id":3,"status":"busy"}]"#.into(),
        ))
        .await;
    let _ = socket.send(Message::Text("41".into())).await;
}

/// Collect events up to and including the first Disconnected
async fn until_disconnected(sub: &mut Subscription) -> Vec<FeedEvent> {
    tokio::time::timeout(Duration::from_secs(5), async {
        let mut events = Vec::new();
        while let Some(event) = sub.recv().await {
            let done = event == FeedEvent::Disconnected;
            events.push(event);
            if done {
                break;
            }
        }
        events
    })
    .await
    .unwrap()
}

async fn start_server(reject: bool) -> (String, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/socket.io/",
        get(move |ws: WebSocketUpgrade| {
            let tx = tx.clone();
            async move { ws.on_upgrade(move |socket| session(socket, tx, reject)).into_response() }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{addr}"), rx)
}

#[tokio::test]
async fn test_handshake_ping_and_event() {
    init_tracing();
    let (url, mut seen) = start_server(false).await;
    let transport = WsTransport::new(&url);

    let mut conn = transport.connect().await.unwrap();
    assert_eq!(seen.recv().await.as_deref(), Some("40"));

    let msg = conn.next_message().await.unwrap().unwrap();
    assert_eq!(msg.topic, "pcStatusUpdate");
    assert_eq!(msg.payload, json!({"pc_id": 3, "status": "busy"}));
    assert_eq!(seen.recv().await.as_deref(), Some("3"));

    assert!(conn.next_message().await.unwrap().is_none());
}

#[tokio::test]
async fn test_connect_error_is_rejection() {
    init_tracing();
    let (url, _seen) = start_server(true).await;
    let err = WsTransport::new(&url).connect().await.err().unwrap();
    assert!(err.to_string().contains("not allowed"), "{err}");
}

#[tokio::test]
async fn test_hub_over_websocket() {
    init_tracing();
    let (url, _seen) = start_server(false).await;
    let hub = FeedHub::new(
        WsTransport::new(&url),
        PushConfig::new().with_auto_reconnect(false),
    );
    let mut sub = hub.subscribe("pcStatusUpdate");
    let events = until_disconnected(&mut sub).await;

    assert_eq!(events.first(), Some(&FeedEvent::Connected));
    assert!(matches!(events.get(1), Some(FeedEvent::Message(m)) if m.topic == "pcStatusUpdate"));
    assert_eq!(events.last(), Some(&FeedEvent::Disconnected));
}

#[tokio::test]
async fn test_global_hub_shares_one_connection() {
    init_tracing();
    let (url, mut seen) = start_server(false).await;
    let config = ClientConfig::default()
        .with_push_url(url)
        .with_push_config(PushConfig::new().with_auto_reconnect(false));

    let first = FeedHub::global(&config);
    // Later callers get the same hub whatever config they pass
    let second = FeedHub::global(&ClientConfig::default());
    let mut status = first.subscribe("pcStatusUpdate");
    let mut board = second.subscribe("pcStatusUpdate");
    assert_eq!(first.subscriber_count(), 2);
    assert_eq!(second.subscriber_count(), 2);

    for sub in [&mut status, &mut board] {
        let events = until_disconnected(sub).await;
        assert_eq!(events.first(), Some(&FeedEvent::Connected));
        assert!(matches!(events.get(1), Some(FeedEvent::Message(m)) if m.topic == "pcStatusUpdate"));
    }

    // One handshake and one pong: a single socket served both subscribers
    assert_eq!(seen.recv().await.as_deref(), Some("40"));
    assert_eq!(seen.recv().await.as_deref(), Some("3"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(seen.try_recv().is_err());
}
