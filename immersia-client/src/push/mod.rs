// immersia-client/src/push/mod.rs
// Push channel - config, errors and the shared connection hub

mod hub;
mod memory;
mod transport;

pub use hub::{FeedHub, Subscription};
pub use memory::InMemoryTransport;
pub use transport::{PushConnection, PushTransport, WsTransport};

pub use shared::message::FeedMessage;

use std::time::Duration;
use thiserror::Error;

/// Push-channel errors
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Connection rejected by server: {0}")]
    Rejected(String),

    #[error("Connection closed")]
    Closed,
}

/// What subscribers see on the shared channel
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The connection is (re-)established
    Connected,
    /// The connection dropped; a reconnect may follow
    Disconnected,
    /// The reader gave up reconnecting; subscribe again to retry
    Stopped,
    Message(FeedMessage),
}

/// Push-channel connection behaviour
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Reconnect after the connection drops
    pub auto_reconnect: bool,
    /// First reconnect delay
    pub reconnect_delay: Duration,
    /// Backoff ceiling
    pub max_reconnect_delay: Duration,
    /// 0 retries forever
    pub max_reconnect_attempts: u32,
    /// Buffered events per subscriber before it lags
    pub channel_capacity: usize,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_delay: Duration::from_millis(500),
            max_reconnect_delay: Duration::from_secs(10),
            max_reconnect_attempts: 0,
            channel_capacity: 256,
        }
    }
}

impl PushConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration, max_delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self.max_reconnect_delay = max_delay.max(delay);
        self
    }

    /// Set the maximum reconnect attempts (0 retries forever)
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Delay before the given (1-based) reconnect attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.reconnect_delay
            .saturating_mul(factor)
            .min(self.max_reconnect_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PushConfig::default();
        assert!(config.auto_reconnect);
        assert_eq!(config.reconnect_delay, Duration::from_millis(500));
        assert_eq!(config.max_reconnect_attempts, 0);
    }

    #[test]
    fn test_backoff_doubles_until_ceiling() {
        let config = PushConfig::new()
            .with_reconnect_delay(Duration::from_millis(100), Duration::from_millis(700));
        assert_eq!(config.backoff(1), Duration::from_millis(100));
        assert_eq!(config.backoff(2), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(400));
        assert_eq!(config.backoff(4), Duration::from_millis(700));
        assert_eq!(config.backoff(40), Duration::from_millis(700));
    }
}
