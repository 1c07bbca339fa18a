//! Backend route table
//!
//! Paths are relative to the configured base URL (which already carries the
//! `/v1` prefix) and never start with a slash.

use crate::types::ResourceId;

pub const GAMES: &str = "admin/games";
pub const USERS: &str = "admin/users";
pub const LOGIN: &str = "admin/roles";
pub const RESET_PASSWORD: &str = "admin/reset-password";
/// Admin account creation (outside the `admin/` prefix on the backend)
pub const CREATE_ADMIN: &str = "user/create";
pub const PCS: &str = "admin/pc";
pub const TRANSACTIONS: &str = "transaction";
pub const REPORT_SUMMARY: &str = "report/summary";
pub const REPORT_EXPORT: &str = "report/export";

/// Push-channel topic carrying PC status changes
pub const PC_STATUS_TOPIC: &str = "pcStatusUpdate";

pub fn game(id: i64) -> String {
    format!("{}/{}", GAMES, id)
}

pub fn user(id: &ResourceId) -> String {
    format!("{}/{}", USERS, id)
}

pub fn transaction(id: &ResourceId) -> String {
    format!("{}/{}", TRANSACTIONS, id)
}
