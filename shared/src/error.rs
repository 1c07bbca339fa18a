//! Error category classification
//!
//! Every failure surfaced to an operator falls into one of three buckets.
//! The bucket decides how a view renders it: a generic retry message, the
//! specific validation message, or an explicit "not found" state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request failed or returned a non-success status
    Network,
    /// Local input failed a constraint; recoverable by editing input
    Validation,
    /// The requested entity does not exist
    NotFound,
}

impl ErrorCategory {
    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
        }
    }

    /// Classify an HTTP status code returned by the backend
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            _ => Self::Network,
        }
    }
}
