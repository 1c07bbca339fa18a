//! Client configuration

use crate::error::{ClientError, ClientResult};
use crate::push::PushConfig;

/// Backend base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:2024/v1";
/// Push-channel URL used when nothing is configured
pub const DEFAULT_PUSH_URL: &str = "ws://127.0.0.1:2024";
/// Request timeout in seconds used when nothing is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_URL: &str = "IMMERSIA_BACKEND_URL";
pub const ENV_PUSH_URL: &str = "IMMERSIA_PUSH_URL";
pub const ENV_TIMEOUT_SECS: &str = "IMMERSIA_TIMEOUT_SECS";

/// Client configuration for connecting to the game-center backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL including the version prefix (e.g., "http://localhost:2024/v1")
    pub base_url: String,

    /// Push-channel server URL (e.g., "ws://127.0.0.1:2024")
    pub push_url: String,

    /// Admin token for authenticated calls
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Push-channel reconnect behaviour
    pub push: PushConfig,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            push: PushConfig::default(),
        }
    }

    /// Load configuration from the environment (and a `.env` file if present)
    ///
    /// Unset variables fall back to the defaults; a timeout that is not a
    /// number is a configuration error rather than silently ignored.
    pub fn from_env() -> ClientResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        let base_url =
            std::env::var(ENV_BACKEND_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Ok(push_url) = std::env::var(ENV_PUSH_URL) {
            config.push_url = push_url;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("{} must be a number, got {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
            config.timeout = secs;
        }

        tracing::debug!(base_url = %config.base_url, push_url = %config.push_url, "Loaded client config");
        Ok(config)
    }

    /// Set the push-channel URL
    pub fn with_push_url(mut self, url: impl Into<String>) -> Self {
        self.push_url = url.into();
        self
    }

    /// Set the admin token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the push-channel configuration
    pub fn with_push_config(mut self, push: PushConfig) -> Self {
        self.push = push;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }

    /// Create the typed API client from this configuration
    pub fn build_api_client(&self) -> ClientResult<crate::ApiClient> {
        Ok(crate::ApiClient::new(self.build_http_client()?))
    }

    /// Create a websocket push transport from this configuration
    pub fn build_push_transport(&self) -> crate::WsTransport {
        crate::WsTransport::new(&self.push_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:2024/v1");
        assert_eq!(config.push_url, "ws://127.0.0.1:2024");
        assert_eq!(config.timeout, 30);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://pos.local/v1")
            .with_push_url("ws://pos.local")
            .with_token("abc")
            .with_timeout(5);

        assert_eq!(config.base_url, "http://pos.local/v1");
        assert_eq!(config.push_url, "ws://pos.local");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
    }
}
