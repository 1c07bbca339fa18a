// immersia-client/src/push/hub.rs
// Process-wide push connection shared by every subscriber

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::transport::{PushConnection, PushTransport};
use super::{FeedEvent, PushConfig};
use crate::ClientConfig;

static GLOBAL: OnceLock<FeedHub> = OnceLock::new();

/// Shared push-channel connection
///
/// The first subscription opens the connection and spawns a reader task;
/// dropping the last [`Subscription`] cancels the task and closes the
/// connection. Reconnects use exponential backoff from [`PushConfig`]; a
/// reader that gives up emits [`FeedEvent::Stopped`] and the next
/// `subscribe` starts a fresh one.
#[derive(Debug, Clone)]
pub struct FeedHub {
    inner: Arc<HubInner>,
}

#[derive(Debug)]
struct HubInner {
    transport: Arc<dyn PushTransport>,
    config: PushConfig,
    events: broadcast::Sender<FeedEvent>,
    connected: Arc<AtomicBool>,
    state: Mutex<HubState>,
}

#[derive(Debug, Default)]
struct HubState {
    topics: HashMap<String, usize>,
    reader: Option<CancellationToken>,
    /// Bumped per spawned reader so a stale reader never clears a newer one
    generation: u64,
}

impl HubState {
    fn subscribers(&self) -> usize {
        self.topics.values().sum()
    }
}

impl FeedHub {
    pub fn new(transport: impl PushTransport, config: PushConfig) -> Self {
        let (events, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            inner: Arc::new(HubInner {
                transport: Arc::new(transport),
                config,
                events,
                connected: Arc::new(AtomicBool::new(false)),
                state: Mutex::new(HubState::default()),
            }),
        }
    }

    /// The process-wide hub, created from `config` on first use
    pub fn global(config: &ClientConfig) -> FeedHub {
        GLOBAL
            .get_or_init(|| FeedHub::new(config.build_push_transport(), config.push.clone()))
            .clone()
    }

    /// Register interest in `topic`
    ///
    /// Must be called from within a Tokio runtime: the first subscription
    /// spawns the reader task.
    pub fn subscribe(&self, topic: &str) -> Subscription {
        // Receiver first so the Connected event of a fresh reader is not missed
        let rx = self.inner.events.subscribe();

        let mut state = self.inner.state.lock();
        *state.topics.entry(topic.to_string()).or_insert(0) += 1;
        if state.reader.is_none() {
            let cancel = CancellationToken::new();
            state.generation += 1;
            tokio::spawn(run_reader(
                self.inner.clone(),
                cancel.clone(),
                state.generation,
            ));
            state.reader = Some(cancel);
            tracing::debug!(topic, generation = state.generation, "Push reader started");
        }

        Subscription {
            hub: self.clone(),
            topic: topic.to_string(),
            rx,
        }
    }

    fn release(&self, topic: &str) {
        let mut state = self.inner.state.lock();
        if let Some(count) = state.topics.get_mut(topic) {
            *count -= 1;
            if *count == 0 {
                state.topics.remove(topic);
            }
        }
        if state.subscribers() == 0
            && let Some(cancel) = state.reader.take()
        {
            cancel.cancel();
            tracing::debug!("Last subscriber released, push reader stopping");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Live subscriptions across all topics
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers()
    }

    /// Whether a reader task currently owns the connection
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().reader.is_some()
    }
}

/// Handle to one topic on the shared connection; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    hub: FeedHub,
    topic: String,
    rx: broadcast::Receiver<FeedEvent>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next event for this topic (connection events included)
    ///
    /// After [`FeedEvent::Stopped`] nothing more arrives until someone
    /// subscribes again.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        loop {
            match self.rx.recv().await {
                Ok(FeedEvent::Message(msg)) if msg.topic != self.topic => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(topic = %self.topic, "Subscriber lagged {n} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.release(&self.topic);
    }
}

enum SessionEnd {
    Cancelled,
    Closed,
    Failed(super::PushError),
}

async fn run_reader(inner: Arc<HubInner>, cancel: CancellationToken, generation: u64) {
    let HubInner {
        transport,
        config,
        events,
        connected,
        ..
    } = inner.as_ref();
    let mut attempt: u32 = 0;

    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = transport.connect() => result,
        };

        match result {
            Ok(mut conn) => {
                attempt = 0;
                connected.store(true, Ordering::SeqCst);
                let _ = events.send(FeedEvent::Connected);
                tracing::info!("Push channel connected");

                let end = read_session(conn.as_mut(), events, &cancel).await;

                connected.store(false, Ordering::SeqCst);
                if let Err(e) = conn.close().await {
                    tracing::debug!("Push channel close failed: {e}");
                }
                drop(conn);

                match end {
                    SessionEnd::Cancelled => break,
                    SessionEnd::Closed => tracing::warn!("Push channel closed by server"),
                    SessionEnd::Failed(e) => tracing::warn!("Push channel lost: {e}"),
                }
                let _ = events.send(FeedEvent::Disconnected);
            }
            Err(e) => {
                tracing::warn!(attempt, "Push channel connect failed: {e}");
            }
        }

        if !config.auto_reconnect {
            tracing::info!("Auto-reconnect disabled, push reader exiting");
            break;
        }
        attempt += 1;
        if config.max_reconnect_attempts > 0 && attempt > config.max_reconnect_attempts {
            tracing::error!(attempt, "Giving up on push channel");
            break;
        }

        let delay = config.backoff(attempt);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    connected.store(false, Ordering::SeqCst);
    if cancel.is_cancelled() {
        tracing::debug!("Push reader stopped");
        return;
    }

    // Gave up on its own: free the slot so the next subscribe reconnects
    {
        let mut state = inner.state.lock();
        if state.generation == generation {
            state.reader = None;
        }
    }
    let _ = events.send(FeedEvent::Stopped);
    tracing::warn!("Push reader gave up");
}

async fn read_session(
    conn: &mut dyn PushConnection,
    events: &broadcast::Sender<FeedEvent>,
    cancel: &CancellationToken,
) -> SessionEnd {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return SessionEnd::Cancelled,
            next = conn.next_message() => next,
        };
        match next {
            Ok(Some(msg)) => {
                tracing::trace!(topic = %msg.topic, "Push event");
                // No receivers just means nobody is listening right now
                let _ = events.send(FeedEvent::Message(msg));
            }
            Ok(None) => return SessionEnd::Closed,
            Err(e) => return SessionEnd::Failed(e),
        }
    }
}
