//! Domain entities mirrored from persistent storage.
//!
//! Records are cached as JSON documents, so every type here round-trips
//! through serde without loss.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    pub venue: String,
    pub city: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub ticket_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub embed_url: String,
    pub position: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricRecord {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub album: Option<String>,
    pub position: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The band biography. There is at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioRecord {
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl InventoryItem {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Inventory keyed by SKU.
pub type InventoryMap = BTreeMap<String, InventoryItem>;

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn event_timestamps_serialize_as_rfc3339() {
        let event = EventRecord {
            id: Uuid::nil(),
            title: "Spring tour".into(),
            venue: "Rockefeller".into(),
            city: "Oslo".into(),
            starts_at: datetime!(2026-04-01 20:00 UTC),
            ticket_url: None,
            created_at: datetime!(2026-01-01 0:00 UTC),
            updated_at: datetime!(2026-01-02 0:00 UTC),
        };

        let value = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(value["starts_at"], "2026-04-01T20:00:00Z");

        let back: EventRecord = serde_json::from_value(value).expect("deserialize event");
        assert_eq!(back, event);
    }

    #[test]
    fn stock_follows_quantity() {
        let mut item = InventoryItem {
            id: Uuid::nil(),
            sku: "TEE-BLK-M".into(),
            name: "Tour tee".into(),
            price_cents: 2500,
            quantity: 0,
            updated_at: datetime!(2026-01-01 0:00 UTC),
        };
        assert!(!item.in_stock());
        item.quantity = 3;
        assert!(item.in_stock());
    }
}
