//! Immersia Client - network plumbing for the POS workflow
//!
//! Provides the typed HTTP API over the game-center backend, the auth token
//! cache, and the shared push-channel connection for PC status updates.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "in-process")]
pub mod http_oneshot;
pub mod push;
pub mod token;

pub use api::{ApiClient, EXPORT_CONTENT_TYPE};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http_oneshot::OneshotHttpClient;
pub use push::{
    FeedEvent, FeedHub, InMemoryTransport, PushConfig, PushConnection, PushError, PushTransport,
    Subscription, WsTransport,
};
pub use token::{CachedToken, TokenStore};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, MessageResponse};
