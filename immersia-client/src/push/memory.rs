// immersia-client/src/push/memory.rs
// In-process push transport (tests and embedded setups)

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::broadcast;

use super::transport::{PushConnection, PushTransport};
use super::PushError;
use shared::message::FeedMessage;

#[derive(Debug, Clone)]
enum MemoryFrame {
    Message(FeedMessage),
    Disconnect,
}

/// Broadcast-backed transport with a server-side handle
///
/// Clones share the same channel and counters, so a test keeps one clone to
/// publish while the hub connects through another.
#[derive(Debug, Clone)]
pub struct InMemoryTransport {
    tx: broadcast::Sender<MemoryFrame>,
    refuse: Arc<AtomicBool>,
    connects: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTransport {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            tx,
            refuse: Arc::new(AtomicBool::new(false)),
            connects: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Push an event to every open connection, returning how many received it
    pub fn publish(&self, msg: FeedMessage) -> usize {
        self.tx.send(MemoryFrame::Message(msg)).unwrap_or(0)
    }

    /// End every open session as if the server went away
    pub fn drop_connections(&self) {
        let _ = self.tx.send(MemoryFrame::Disconnect);
    }

    /// Make subsequent connects fail until cleared
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Successful connects so far
    pub fn connection_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Connections not yet released
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushTransport for InMemoryTransport {
    async fn connect(&self) -> Result<Box<dyn PushConnection>, PushError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(PushError::Connection("connection refused".into()));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            rx: self.tx.subscribe(),
            active: self.active.clone(),
        }))
    }
}

struct MemoryConnection {
    rx: broadcast::Receiver<MemoryFrame>,
    active: Arc<AtomicUsize>,
}

#[async_trait]
impl PushConnection for MemoryConnection {
    async fn next_message(&mut self) -> Result<Option<FeedMessage>, PushError> {
        loop {
            match self.rx.recv().await {
                Ok(MemoryFrame::Message(msg)) => return Ok(Some(msg)),
                Ok(MemoryFrame::Disconnect) | Err(broadcast::error::RecvError::Closed) => {
                    return Ok(None);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("In-memory push connection lagged {n} messages");
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), PushError> {
        Ok(())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_and_disconnect() {
        let transport = InMemoryTransport::new();
        let mut conn = transport.connect().await.unwrap();
        assert_eq!(transport.active_connections(), 1);

        assert_eq!(transport.publish(FeedMessage::new("t", json!(1))), 1);
        let msg = conn.next_message().await.unwrap().unwrap();
        assert_eq!(msg.topic, "t");

        transport.drop_connections();
        assert!(conn.next_message().await.unwrap().is_none());

        drop(conn);
        assert_eq!(transport.active_connections(), 0);
        assert_eq!(transport.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_refuse() {
        let transport = InMemoryTransport::new();
        transport.set_refuse(true);
        assert!(transport.connect().await.is_err());
        assert_eq!(transport.connection_count(), 0);
    }
}
