//! Auth DTOs shared between the API client and the admin workflow

use serde::{Deserialize, Serialize};

// Re-export MessageResponse from response module
pub use crate::response::MessageResponse;

/// Login request (`POST admin/roles`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Password reset request (`POST admin/reset-password`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub username: String,
    pub new_password: String,
}
