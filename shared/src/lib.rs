//! Shared types for the Immersia POS workspace
//!
//! Wire models, route constants, the success envelope and the push-channel
//! packet codec. Used by both `immersia-client` and `immersia-pos`; nothing
//! in this crate performs I/O.

pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod response;
pub mod routes;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Push channel re-exports (for convenient access)
pub use message::{FeedMessage, Packet, PacketType};

pub use error::ErrorCategory;
pub use response::Envelope;
pub use types::ResourceId;
