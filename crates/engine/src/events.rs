use serde::{Deserialize, Serialize};

use shelfwatch_api::InventoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    LowStock,
    OutOfStock,
}

/// A threshold crossing for one record, produced by a single diff pass and
/// consumed immediately by the notification surface.  Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub record: InventoryRecord,
}

impl AlertEvent {
    pub fn record_id(&self) -> i64 {
        self.record.id
    }
}

/// Events fanned out to subscribers (toast surface, CLI printer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    Alert(AlertEvent),
    /// Every record is fully configured; automatic refresh resumed.
    /// Fires at most once per lock→unlock episode.
    SetupComplete,
    /// A pause/resume request was refused while the setup lock is held.
    RefreshRejected { reason: String },
    SnapshotReplaced { count: usize },
    /// A user-initiated operation failed; the snapshot has been reloaded
    /// from the service to stay convergent.
    Failure { operation: String, message: String },
    Info(String),
}
