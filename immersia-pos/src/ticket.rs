//! Ticket view and printable receipt

use std::fmt::Write as _;

use immersia_client::{ApiClient, HttpClient};
use shared::ResourceId;
use shared::models::Ticket;

use crate::error::{PosError, PosResult};

pub const VENUE_NAME: &str = "Immersia Game Center";

#[derive(Debug, Clone, PartialEq)]
pub enum TicketView {
    Found(Ticket),
    NotFound,
}

/// Fetch a ticket; a missing one is a view state, not an error
pub async fn load_ticket<H: HttpClient>(
    api: &ApiClient<H>,
    id: &ResourceId,
) -> PosResult<TicketView> {
    match api.get_ticket(id).await.map_err(PosError::from) {
        Ok(ticket) => Ok(TicketView::Found(ticket)),
        Err(PosError::NotFound(_)) => {
            tracing::info!(%id, "Ticket not found");
            Ok(TicketView::NotFound)
        }
        Err(e) => {
            tracing::error!(%id, "Error fetching ticket data: {}", e);
            Err(e)
        }
    }
}

/// Plain-text receipt
pub fn render_ticket(id: &ResourceId, ticket: &Ticket) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{VENUE_NAME}");
    let _ = writeln!(out, "Ticket Number: {id}");
    let _ = writeln!(
        out,
        "Date: {} | Time: {}",
        ticket.created_at.format("%Y-%m-%d"),
        ticket.created_at.format("%H:%M:%S")
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<24} {:>8} {:>10} {:>10} {:>12}",
        "Game", "Quantity", "Start Time", "End Time", "Amount Paid"
    );
    for game in &ticket.games {
        let _ = writeln!(
            out,
            "{:<24} {:>8} {:>10} {:>10} {:>12}",
            game.title,
            game.quantity,
            game.start_time.format("%H:%M:%S").to_string(),
            game.end_time.format("%H:%M:%S").to_string(),
            format!("{:.2}", game.amount_paid.round_dp(2)),
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {:.2}", ticket.total_paid().round_dp(2));
    out
}
