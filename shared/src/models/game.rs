//! Catalog Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{default_duration, deserialize_duration};

/// A purchasable game as served by `GET admin/games`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    #[serde(rename = "price", alias = "unitPrice")]
    pub unit_price: Decimal,
    /// Preview video id (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        rename = "time_slot",
        alias = "durationMinutes",
        default = "default_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub duration_minutes: u32,
}

/// Duration-only update payload (`PUT admin/games/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDurationUpdate {
    #[serde(rename = "time_slot")]
    pub duration_minutes: u32,
}

/// Full update payload sent when an edited draft is committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameUpdate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub price: Decimal,
    #[serde(rename = "time_slot")]
    pub duration_minutes: u32,
}

impl CatalogItem {
    /// Apply a committed update, keeping the id
    pub fn with_update(&self, update: &GameUpdate) -> Self {
        Self {
            id: self.id,
            title: update.title.clone(),
            unit_price: update.price,
            url: update.url.clone(),
            duration_minutes: update.duration_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_backend_shape() {
        let json = r#"{"id": 1, "title": "Racing", "price": 500, "url": "abc", "time_slot": "20"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.unit_price, Decimal::from(500));
        assert_eq!(item.duration_minutes, 20);
        assert_eq!(item.url.as_deref(), Some("abc"));
    }

    #[test]
    fn test_catalog_item_defaults_duration() {
        let json = r#"{"id": 2, "title": "VR", "unitPrice": 800}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.duration_minutes, 10);
        assert!(item.url.is_none());
    }

    #[test]
    fn test_duration_update_wire_name() {
        let body = serde_json::to_value(GameDurationUpdate { duration_minutes: 15 }).unwrap();
        assert_eq!(body, serde_json::json!({"time_slot": 15}));
    }
}
