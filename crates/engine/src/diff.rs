use std::collections::HashMap;

use shelfwatch_api::InventoryRecord;

use crate::events::{AlertEvent, AlertKind};
use crate::snapshot::Snapshot;

/// Compare two consecutive snapshots and report threshold crossings.
///
/// Comparisons are strictly pairwise per `id`: records present only in
/// `next` (newly created) or only in `previous` (deleted) produce nothing.
/// Edge-triggered: alerts fire on the transition into a condition, never
/// while it merely holds, so `diff(s, s)` is empty for any snapshot.
pub fn diff(previous: &Snapshot, next: &Snapshot) -> Vec<AlertEvent> {
    let prev_by_id: HashMap<i64, &InventoryRecord> =
        previous.records().iter().map(|r| (r.id, r)).collect();

    let mut alerts = Vec::new();
    for record in next.records() {
        let Some(prev) = prev_by_id.get(&record.id) else {
            continue;
        };
        if prev.quantity > prev.min_quantity
            && record.quantity <= record.min_quantity
            && record.quantity > 0.0
        {
            alerts.push(AlertEvent {
                kind: AlertKind::LowStock,
                record: record.clone(),
            });
        }
        if prev.quantity > 0.0 && record.quantity == 0.0 {
            alerts.push(AlertEvent {
                kind: AlertKind::OutOfStock,
                record: record.clone(),
            });
        }
    }
    alerts
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rec(id: i64, quantity: f64, min_quantity: f64) -> InventoryRecord {
        InventoryRecord {
            id,
            name: format!("item-{id}"),
            category: "Dairy".into(),
            unit: "ea".into(),
            quantity,
            min_quantity,
            price: 1000.0,
            last_updated: Utc::now(),
        }
    }

    fn snap(records: Vec<InventoryRecord>) -> Snapshot {
        Snapshot::new(records)
    }

    #[test]
    fn identical_snapshots_produce_no_alerts() {
        let s = snap(vec![rec(1, 3.0, 3.0), rec(2, 0.0, 5.0), rec(3, 10.0, 2.0)]);
        assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn low_stock_fires_exactly_on_the_crossing() {
        let previous = snap(vec![rec(1, 5.0, 3.0)]);
        let crossed = snap(vec![rec(1, 3.0, 3.0)]);

        let alerts = diff(&previous, &crossed);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LowStock);
        assert_eq!(alerts[0].record_id(), 1);

        // Still low on the next tick: no repeat alert.
        assert!(diff(&crossed, &crossed).is_empty());
    }

    #[test]
    fn low_stock_requires_positive_quantity() {
        let previous = snap(vec![rec(1, 5.0, 3.0)]);
        let next = snap(vec![rec(1, 0.0, 3.0)]);
        let alerts = diff(&previous, &next);
        // Dropping straight to zero is out-of-stock, not low-stock.
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::OutOfStock);
    }

    #[test]
    fn raising_the_minimum_can_cross_too() {
        let previous = snap(vec![rec(1, 4.0, 2.0)]);
        let next = snap(vec![rec(1, 4.0, 6.0)]);
        let alerts = diff(&previous, &next);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LowStock);
    }

    #[test]
    fn out_of_stock_edge() {
        let previous = snap(vec![rec(1, 1.0, 3.0)]);
        let next = snap(vec![rec(1, 0.0, 3.0)]);
        let alerts = diff(&previous, &next);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::OutOfStock);

        // Already empty: no repeat.
        assert!(diff(&next, &next).is_empty());
    }

    #[test]
    fn created_and_deleted_records_are_silent() {
        let previous = snap(vec![rec(1, 5.0, 3.0)]);
        let next = snap(vec![rec(2, 0.0, 3.0)]); // 1 deleted, 2 created at zero
        assert!(diff(&previous, &next).is_empty());
    }

    #[test]
    fn unrelated_records_do_not_leak_into_each_other() {
        let previous = snap(vec![rec(1, 5.0, 3.0), rec(2, 1.0, 3.0)]);
        let next = snap(vec![rec(1, 5.0, 3.0), rec(2, 0.0, 3.0)]);
        let alerts = diff(&previous, &next);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].record_id(), 2);
    }
}
