use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stock-keeping unit as the service reports it.
///
/// `category` and `unit` may hold the sentinel `"-"` meaning "not yet
/// configured"; see `shelfwatch_engine::guard` for how that is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Stable identifier, immutable after creation.
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: f64,
    pub min_quantity: f64,
    pub price: f64,
    /// Timestamp of the last server-side mutation.
    pub last_updated: DateTime<Utc>,
}

/// Payload for create and update calls.  The server may normalize or reject
/// fields, so callers reload the full snapshot afterwards instead of
/// patching locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFields {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub min_quantity: f64,
    pub price: f64,
}

/// Aggregate counters from the service's stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_items: u64,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_from_wire_shape() {
        let json = r#"{
            "id": 7,
            "name": "Milk",
            "category": "Dairy",
            "unit": "carton",
            "quantity": 4.0,
            "min_quantity": 5.0,
            "price": 1200.0,
            "last_updated": "2026-08-01T09:30:00Z"
        }"#;
        let record: InventoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.min_quantity, 5.0);
        assert_eq!(record.last_updated.to_rfc3339(), "2026-08-01T09:30:00+00:00");
    }

    #[test]
    fn record_fields_serialize_snake_case() {
        let fields = RecordFields {
            name: "Milk".into(),
            category: "Dairy".into(),
            quantity: 10.0,
            unit: "carton".into(),
            min_quantity: 5.0,
            price: 1200.0,
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["min_quantity"], 5.0);
        assert!(value.get("minQuantity").is_none());
    }

    #[test]
    fn stats_deserialize() {
        let json = r#"{"total_items": 12, "low_stock_count": 2, "out_of_stock_count": 1}"#;
        let stats: AggregateStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_items, 12);
        assert_eq!(stats.low_stock_count, 2);
        assert_eq!(stats.out_of_stock_count, 1);
    }
}
