use std::sync::Arc;

use shelfwatch_api::{AggregateStats, InventoryRecord};

/// A full, point-in-time collection of inventory records.
///
/// Replaced wholesale on every successful fetch, never mutated in place, so
/// a diff pass can keep a cheap handle on the prior value while the next one
/// is being fetched.
#[derive(Debug, Clone, Default)]
pub struct Snapshot(Arc<Vec<InventoryRecord>>);

impl Snapshot {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self(Arc::new(records))
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&InventoryRecord> {
        self.0.iter().find(|record| record.id == id)
    }
}

impl From<Vec<InventoryRecord>> for Snapshot {
    fn from(records: Vec<InventoryRecord>) -> Self {
        Self::new(records)
    }
}

/// Snapshot-local stand-in for the service's stats endpoint, used by stat
/// tiles before the first stats response lands.
pub fn derive_stats(snapshot: &Snapshot) -> AggregateStats {
    let records = snapshot.records();
    AggregateStats {
        total_items: records.len() as u64,
        low_stock_count: records
            .iter()
            .filter(|r| r.quantity > 0.0 && r.quantity <= r.min_quantity)
            .count() as u64,
        out_of_stock_count: records.iter().filter(|r| r.quantity == 0.0).count() as u64,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
