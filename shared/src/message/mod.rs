//! Push-channel packet codec
//!
//! The status feed speaks Socket.IO v4 over a plain websocket. Each text
//! frame is an Engine.IO packet whose first byte is the packet type; a
//! `Message` packet carries a Socket.IO packet whose first byte is again a
//! type digit, optionally followed by a namespace, an ack id and a JSON
//! array `["topic", payload]`.
//!
//! Only the subset a read-only subscriber needs is modelled.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Engine.IO protocol revision spoken by the client
pub const ENGINE_IO_VERSION: u8 = 4;

/// Engine.IO packet type (first character of every frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    Open = 0,
    Close = 1,
    Ping = 2,
    Pong = 3,
    Message = 4,
    Upgrade = 5,
    Noop = 6,
}

impl TryFrom<u8> for PacketType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PacketType::Open),
            1 => Ok(PacketType::Close),
            2 => Ok(PacketType::Ping),
            3 => Ok(PacketType::Pong),
            4 => Ok(PacketType::Message),
            5 => Ok(PacketType::Upgrade),
            6 => Ok(PacketType::Noop),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketType::Open => write!(f, "open"),
            PacketType::Close => write!(f, "close"),
            PacketType::Ping => write!(f, "ping"),
            PacketType::Pong => write!(f, "pong"),
            PacketType::Message => write!(f, "message"),
            PacketType::Upgrade => write!(f, "upgrade"),
            PacketType::Noop => write!(f, "noop"),
        }
    }
}

/// Socket.IO packet type (first character inside an Engine.IO message)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketPacketType {
    Connect = 0,
    Disconnect = 1,
    Event = 2,
    Ack = 3,
    ConnectError = 4,
}

impl TryFrom<u8> for SocketPacketType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SocketPacketType::Connect),
            1 => Ok(SocketPacketType::Disconnect),
            2 => Ok(SocketPacketType::Event),
            3 => Ok(SocketPacketType::Ack),
            4 => Ok(SocketPacketType::ConnectError),
            _ => Err(()),
        }
    }
}

/// Handshake data sent by the server in the `Open` packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPayload {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// A named event delivered on the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl FeedMessage {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    /// Build a message from any serializable payload
    pub fn from_payload<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(topic, serde_json::to_value(payload)?))
    }

    /// Decode the payload into a typed event
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

/// Decoded frame
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(OpenPayload),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace connect (client request or server acknowledgement)
    Connect,
    ConnectError(String),
    Disconnect,
    Event(FeedMessage),
    /// Packets a subscriber has no use for (acks, upgrades)
    Ignored,
}

#[derive(Debug, Error, PartialEq)]
pub enum PacketError {
    #[error("Empty frame")]
    Empty,

    #[error("Unknown packet type: {0}")]
    UnknownType(char),

    #[error("Malformed packet: {0}")]
    Malformed(String),
}

impl Packet {
    /// Decode one websocket text frame
    pub fn decode(frame: &str) -> Result<Packet, PacketError> {
        let mut chars = frame.chars();
        let first = chars.next().ok_or(PacketError::Empty)?;
        let rest = chars.as_str();

        let kind = first
            .to_digit(10)
            .and_then(|d| PacketType::try_from(d as u8).ok())
            .ok_or(PacketError::UnknownType(first))?;

        match kind {
            PacketType::Open => serde_json::from_str::<OpenPayload>(rest)
                .map(Packet::Open)
                .map_err(|e| PacketError::Malformed(format!("open payload: {}", e))),
            PacketType::Close => Ok(Packet::Close),
            PacketType::Ping => Ok(Packet::Ping),
            PacketType::Pong => Ok(Packet::Pong),
            PacketType::Noop => Ok(Packet::Noop),
            PacketType::Upgrade => Ok(Packet::Ignored),
            PacketType::Message => decode_socket_packet(rest),
        }
    }

    /// Encode a packet as a websocket text frame
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let frame = match self {
            Packet::Open(open) => format!("0{}", serde_json::to_string(open)?),
            Packet::Close => "1".to_string(),
            Packet::Ping => "2".to_string(),
            Packet::Pong => "3".to_string(),
            Packet::Noop => "6".to_string(),
            Packet::Connect => "40".to_string(),
            Packet::Disconnect => "41".to_string(),
            Packet::ConnectError(message) => {
                format!("44{}", serde_json::json!({ "message": message }))
            }
            Packet::Event(msg) => {
                format!("42{}", serde_json::json!([msg.topic, msg.payload]))
            }
            Packet::Ignored => "6".to_string(),
        };
        Ok(frame)
    }
}

fn decode_socket_packet(body: &str) -> Result<Packet, PacketError> {
    let mut chars = body.chars();
    let first = chars
        .next()
        .ok_or_else(|| PacketError::Malformed("message without socket packet".into()))?;
    let kind = first
        .to_digit(10)
        .and_then(|d| SocketPacketType::try_from(d as u8).ok())
        .ok_or(PacketError::UnknownType(first))?;

    let data = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        SocketPacketType::Connect => Ok(Packet::Connect),
        SocketPacketType::Disconnect => Ok(Packet::Disconnect),
        SocketPacketType::Ack => Ok(Packet::Ignored),
        SocketPacketType::ConnectError => {
            let message = serde_json::from_str::<serde_json::Value>(data)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| data.to_string());
            Ok(Packet::ConnectError(message))
        }
        SocketPacketType::Event => {
            let mut items: Vec<serde_json::Value> = serde_json::from_str(data)
                .map_err(|e| PacketError::Malformed(format!("event body: {}", e)))?;
            if items.is_empty() {
                return Err(PacketError::Malformed("event without name".into()));
            }
            let topic = match items.remove(0) {
                serde_json::Value::String(name) => name,
                other => {
                    return Err(PacketError::Malformed(format!(
                        "event name is not a string: {}",
                        other
                    )));
                }
            };
            let payload = if items.is_empty() {
                serde_json::Value::Null
            } else {
                items.remove(0)
            };
            Ok(Packet::Event(FeedMessage { topic, payload }))
        }
    }
}

/// `/admin,rest` -> `rest`; the subscriber only joins the default namespace
fn strip_namespace(s: &str) -> &str {
    if s.starts_with('/') {
        match s.find(',') {
            Some(idx) => &s[idx + 1..],
            None => "",
        }
    } else {
        s
    }
}

fn strip_ack_id(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_open() {
        let packet =
            Packet::decode(r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#)
                .unwrap();
        match packet {
            Packet::Open(open) => {
                assert_eq!(open.sid, "abc");
                assert_eq!(open.ping_interval, 25000);
            }
            other => panic!("Expected Open, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_control_packets() {
        assert_eq!(Packet::decode("2").unwrap(), Packet::Ping);
        assert_eq!(Packet::decode("3").unwrap(), Packet::Pong);
        assert_eq!(Packet::decode("1").unwrap(), Packet::Close);
        assert_eq!(Packet::decode(r#"40{"sid":"x"}"#).unwrap(), Packet::Connect);
        assert_eq!(Packet::decode("41").unwrap(), Packet::Disconnect);
    }

    #[test]
    fn test_decode_event() {
        let packet = Packet::decode(r#"42["pcStatusUpdate",{"pc_id":"PC1","status":"idle"}]"#)
            .unwrap();
        let Packet::Event(msg) = packet else {
            panic!("Expected event");
        };
        assert_eq!(msg.topic, "pcStatusUpdate");
        assert_eq!(msg.payload["pc_id"], "PC1");
    }

    #[test]
    fn test_decode_event_with_namespace_and_ack_id() {
        let packet = Packet::decode(r#"42/pcs,17["pcStatusUpdate",{"pc_id":2}]"#).unwrap();
        let Packet::Event(msg) = packet else {
            panic!("Expected event");
        };
        assert_eq!(msg.topic, "pcStatusUpdate");
        assert_eq!(msg.payload["pc_id"], 2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(Packet::decode(""), Err(PacketError::Empty));
        assert_eq!(Packet::decode("x"), Err(PacketError::UnknownType('x')));
        assert!(matches!(
            Packet::decode("42not-json"),
            Err(PacketError::Malformed(_))
        ));
        assert!(matches!(Packet::decode("42[]"), Err(PacketError::Malformed(_))));
    }

    #[test]
    fn test_connect_error_message() {
        let packet = Packet::decode(r#"44{"message":"Not authorized"}"#).unwrap();
        assert_eq!(packet, Packet::ConnectError("Not authorized".into()));
    }

    #[test]
    fn test_encode_client_frames() {
        assert_eq!(Packet::Pong.encode().unwrap(), "3");
        assert_eq!(Packet::Connect.encode().unwrap(), "40");
        assert_eq!(Packet::Disconnect.encode().unwrap(), "41");

        let msg = FeedMessage::new("pcStatusUpdate", serde_json::json!({"pc_id": "PC1"}));
        let frame = Packet::Event(msg.clone()).encode().unwrap();
        assert_eq!(Packet::decode(&frame).unwrap(), Packet::Event(msg));
    }
}
