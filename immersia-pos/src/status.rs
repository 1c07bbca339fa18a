//! Status Feed Consumer
//!
//! Snapshot of the PC list plus a status mapping merged from push events.
//! Each event overwrites one entry; the mapping is only reset when the
//! shared connection comes back after a drop.

use std::collections::HashMap;

use immersia_client::{ApiClient, FeedEvent, FeedHub, HttpClient, Subscription};
use shared::ResourceId;
use shared::message::FeedMessage;
use shared::models::{Pc, PcStatus, PcStatusEvent};
use shared::routes::PC_STATUS_TOPIC;

/// What a PC row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDisplay {
    /// In the snapshot but no event received yet
    Loading,
    Known(PcStatus),
}

impl StatusDisplay {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading...",
            Self::Known(status) => status.as_str(),
        }
    }
}

/// PC list and status mapping
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    pcs: Vec<Pc>,
    statuses: HashMap<ResourceId, PcStatus>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_snapshot(&mut self, pcs: Vec<Pc>) {
        self.pcs = pcs;
    }

    pub fn pcs(&self) -> &[Pc] {
        &self.pcs
    }

    /// Insert-or-overwrite one entry
    pub fn apply(&mut self, event: PcStatusEvent) {
        self.statuses.insert(event.resource_id, event.status);
    }

    /// Merge a raw feed message; returns false if it was dropped
    pub fn apply_message(&mut self, msg: &FeedMessage) -> bool {
        if msg.topic != PC_STATUS_TOPIC {
            return false;
        }
        match msg.parse_payload::<PcStatusEvent>() {
            Ok(event) => {
                tracing::trace!(pc = %event.resource_id, status = %event.status, "PC status update");
                self.apply(event);
                true
            }
            Err(e) => {
                tracing::warn!(payload = %msg.payload, "Dropping PC status event: {}", e);
                false
            }
        }
    }

    pub fn status(&self, id: &ResourceId) -> Option<PcStatus> {
        self.statuses.get(id).copied()
    }

    pub fn display(&self, id: &ResourceId) -> StatusDisplay {
        self.status(id)
            .map(StatusDisplay::Known)
            .unwrap_or(StatusDisplay::Loading)
    }

    /// Snapshot rows in backend order with their current display
    pub fn rows(&self) -> Vec<(&Pc, StatusDisplay)> {
        self.pcs.iter().map(|pc| (pc, self.display(&pc.id))).collect()
    }

    pub fn statuses(&self) -> &HashMap<ResourceId, PcStatus> {
        &self.statuses
    }

    pub fn clear_statuses(&mut self) {
        self.statuses.clear();
    }
}

/// Board kept live by the shared push connection
///
/// Holding the consumer holds one subscription on the hub; [`stop`] or drop
/// releases it.
///
/// [`stop`]: StatusFeedConsumer::stop
#[derive(Debug)]
pub struct StatusFeedConsumer<H: HttpClient> {
    api: ApiClient<H>,
    board: StatusBoard,
    subscription: Option<Subscription>,
    dropped: bool,
}

impl<H: HttpClient> StatusFeedConsumer<H> {
    /// Subscribe to the status topic and load the PC snapshot
    ///
    /// The subscription is taken first so no event between the snapshot and
    /// the subscription is lost.
    pub async fn start(api: ApiClient<H>, hub: &FeedHub) -> Self {
        let subscription = hub.subscribe(PC_STATUS_TOPIC);
        let mut consumer = Self {
            api,
            board: StatusBoard::new(),
            subscription: Some(subscription),
            dropped: false,
        };
        consumer.fetch_snapshot().await;
        consumer
    }

    async fn fetch_snapshot(&mut self) {
        match self.api.list_pcs().await {
            Ok(pcs) => {
                tracing::debug!(count = pcs.len(), "PC snapshot loaded");
                self.board.set_snapshot(pcs);
            }
            Err(e) => tracing::error!("Error fetching PC data: {}", e),
        }
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Wait for and apply one feed event
    ///
    /// Returns false once stopped, or when the feed gave up (which also
    /// releases the subscription).
    pub async fn next(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let Some(event) = subscription.recv().await else {
            return false;
        };

        match event {
            FeedEvent::Message(msg) => {
                self.board.apply_message(&msg);
            }
            FeedEvent::Disconnected => {
                tracing::warn!("PC status feed disconnected");
                self.dropped = true;
            }
            FeedEvent::Connected if self.dropped => {
                tracing::info!("PC status feed reconnected, reloading");
                self.dropped = false;
                self.board.clear_statuses();
                self.fetch_snapshot().await;
            }
            FeedEvent::Connected => {}
            FeedEvent::Stopped => {
                tracing::error!("PC status feed gave up reconnecting");
                self.stop();
                return false;
            }
        }
        true
    }

    /// Apply events until stopped or the feed gives up
    pub async fn run(&mut self) {
        while self.next().await {}
    }

    /// Release the subscription (view teardown)
    pub fn stop(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("PC status feed released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(id: &str, status: PcStatus) -> PcStatusEvent {
        PcStatusEvent::new(ResourceId::from(id), status)
    }

    #[test]
    fn test_last_write_wins() {
        let mut board = StatusBoard::new();
        board.apply(event("PC1", PcStatus::Idle));
        board.apply(event("PC2", PcStatus::Busy));
        board.apply(event("PC1", PcStatus::Busy));

        let expected: HashMap<ResourceId, PcStatus> = [
            (ResourceId::from("PC1"), PcStatus::Busy),
            (ResourceId::from("PC2"), PcStatus::Busy),
        ]
        .into_iter()
        .collect();
        assert_eq!(board.statuses(), &expected);
    }

    #[test]
    fn test_snapshot_rows_show_loading() {
        let mut board = StatusBoard::new();
        board.set_snapshot(vec![
            Pc {
                id: ResourceId::from(1),
                name: None,
            },
            Pc {
                id: ResourceId::from(2),
                name: None,
            },
        ]);
        board.apply(event("2", PcStatus::Offline));

        let labels: Vec<_> = board.rows().iter().map(|(_, d)| d.label()).collect();
        assert_eq!(labels, ["loading...", "offline"]);
    }

    #[test]
    fn test_apply_message_filters() {
        let mut board = StatusBoard::new();
        let ok = FeedMessage::new(PC_STATUS_TOPIC, json!({"pc_id": 4, "status": "in-use"}));
        assert!(board.apply_message(&ok));
        assert_eq!(board.status(&ResourceId::from(4)), Some(PcStatus::Busy));

        let unknown = FeedMessage::new(PC_STATUS_TOPIC, json!({"pc_id": 4, "status": "melting"}));
        assert!(!board.apply_message(&unknown));
        assert_eq!(board.status(&ResourceId::from(4)), Some(PcStatus::Busy));

        let other = FeedMessage::new("chat", json!({"pc_id": 5, "status": "idle"}));
        assert!(!board.apply_message(&other));
        assert!(board.status(&ResourceId::from(5)).is_none());
    }
}
