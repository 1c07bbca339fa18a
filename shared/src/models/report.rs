//! Report Models
//!
//! Rows of the pre-aggregated summary and the flat transaction list. The
//! backend computes every aggregate; these are display-only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ResourceId;

/// `GET report/summary` body
///
/// Missing sections default to empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(default)]
    pub best_selling_games: Vec<GameSales>,
    #[serde(default)]
    pub least_selling_games: Vec<GameSales>,
    #[serde(default)]
    pub highest_paying_customers: Vec<CustomerSpend>,
    #[serde(default)]
    pub game_duration_stats: Vec<GameDuration>,
}

/// Quantity sold per game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSales {
    pub id: ResourceId,
    pub title: String,
    pub quantity: u64,
}

/// Total paid per customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSpend {
    pub id: ResourceId,
    #[serde(default)]
    pub customer_name: String,
    pub total_amount: Decimal,
}

/// Minutes played per game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDuration {
    pub id: ResourceId,
    pub title: String,
    pub total_duration: u64,
}

/// One row of `GET transaction?startDate&endDate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: ResourceId,
    pub title: String,
    pub quantity: u64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub customer_name: String,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_missing_sections_default_empty() {
        let json = r#"{"bestSellingGames": [{"id": 1, "title": "VR", "quantity": 9}]}"#;
        let summary: ReportSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.best_selling_games.len(), 1);
        assert!(summary.least_selling_games.is_empty());
        assert!(summary.highest_paying_customers.is_empty());
        assert!(summary.game_duration_stats.is_empty());
    }
}
