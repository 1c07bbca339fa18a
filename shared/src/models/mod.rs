//! Data models
//!
//! Shared between the API client and the POS workflow.
//! Field names follow the backend's wire format; aliases accept the
//! camelCase names some endpoints use instead.

pub mod game;
pub mod payment;
pub mod pc;
pub mod report;
pub mod ticket;
pub mod user;

// Re-exports
pub use game::*;
pub use payment::*;
pub use pc::*;
pub use report::*;
pub use ticket::*;
pub use user::*;
