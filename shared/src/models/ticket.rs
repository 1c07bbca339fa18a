//! Ticket Model (`GET transaction/{id}`)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub games: Vec<TicketGame>,
}

/// One purchased game with its booked time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketGame {
    pub title: String,
    pub quantity: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub amount_paid: Decimal,
}

impl Ticket {
    pub fn total_paid(&self) -> Decimal {
        self.games.iter().map(|g| g.amount_paid).sum()
    }
}
