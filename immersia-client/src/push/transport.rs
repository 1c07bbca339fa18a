// immersia-client/src/push/transport.rs
// Push transports - Socket.IO over WebSocket

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use shared::message::{FeedMessage, Packet};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::PushError;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens connections to the push server
#[async_trait]
pub trait PushTransport: Send + Sync + std::fmt::Debug + 'static {
    async fn connect(&self) -> Result<Box<dyn PushConnection>, PushError>;
}

/// One live push connection
#[async_trait]
pub trait PushConnection: Send {
    /// Next application event. `Ok(None)` means the server ended the session.
    async fn next_message(&mut self) -> Result<Option<FeedMessage>, PushError>;
    async fn close(&mut self) -> Result<(), PushError>;
}

/// Socket.IO client over a plain WebSocket
#[derive(Debug, Clone)]
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    /// `push_url` is the server origin; http(s) schemes are mapped to ws(s)
    pub fn new(push_url: &str) -> Self {
        let origin = push_url
            .trim_end_matches('/')
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        Self {
            url: format!("{origin}/socket.io/?EIO=4&transport=websocket"),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PushTransport for WsTransport {
    async fn connect(&self) -> Result<Box<dyn PushConnection>, PushError> {
        tracing::debug!(url = %self.url, "Connecting push channel");
        let (ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| PushError::Connection(e.to_string()))?;

        let mut conn = WsConnection { ws };
        conn.handshake().await?;
        Ok(Box::new(conn))
    }
}

struct WsConnection {
    ws: WsStream,
}

impl WsConnection {
    async fn send_packet(&mut self, packet: &Packet) -> Result<(), PushError> {
        let frame = packet
            .encode()
            .map_err(|e| PushError::Protocol(e.to_string()))?;
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| PushError::Connection(e.to_string()))
    }

    /// Engine.IO open, then join the default namespace
    async fn handshake(&mut self) -> Result<(), PushError> {
        match self.next_packet().await? {
            Some(Packet::Open(open)) => {
                tracing::debug!(sid = %open.sid, "Engine.IO session opened");
            }
            Some(other) => {
                return Err(PushError::Protocol(format!("expected open packet, got {other:?}")));
            }
            None => return Err(PushError::Closed),
        }

        self.send_packet(&Packet::Connect).await?;

        loop {
            match self.next_packet().await? {
                Some(Packet::Connect) => return Ok(()),
                Some(Packet::ConnectError(message)) => return Err(PushError::Rejected(message)),
                Some(Packet::Ping) => self.send_packet(&Packet::Pong).await?,
                Some(_) => {}
                None => return Err(PushError::Closed),
            }
        }
    }

    /// Next decodable Socket.IO packet; transport-level frames are handled here
    async fn next_packet(&mut self) -> Result<Option<Packet>, PushError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => match Packet::decode(text.as_str()) {
                    Ok(packet) => return Ok(Some(packet)),
                    Err(e) => {
                        tracing::warn!(frame = %text.as_str(), "Dropping undecodable frame: {e}");
                    }
                },
                Some(Ok(Message::Ping(data))) => {
                    let _ = self.ws.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Err(e)) => return Err(PushError::Connection(e.to_string())),
                _ => {} // Binary, Pong
            }
        }
    }
}

#[async_trait]
impl PushConnection for WsConnection {
    async fn next_message(&mut self) -> Result<Option<FeedMessage>, PushError> {
        loop {
            match self.next_packet().await? {
                Some(Packet::Event(msg)) => return Ok(Some(msg)),
                Some(Packet::Ping) => self.send_packet(&Packet::Pong).await?,
                Some(Packet::Disconnect) | Some(Packet::Close) | None => return Ok(None),
                Some(Packet::ConnectError(message)) => return Err(PushError::Rejected(message)),
                Some(_) => {}
            }
        }
    }

    async fn close(&mut self) -> Result<(), PushError> {
        // Leave the namespace first; the socket may already be gone
        let _ = self.send_packet(&Packet::Disconnect).await;
        self.ws
            .close(None)
            .await
            .map_err(|e| PushError::Connection(e.to_string()))
    }
}
