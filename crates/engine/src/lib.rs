//! Inventory synchronization & alert engine.
//!
//! Holds the last-known-good snapshot of inventory records, refreshes it
//! from the remote service on a timer, diffs consecutive snapshots for
//! threshold crossings, and gates automatic refresh behind a setup lock
//! while records are incomplete or being edited.

pub mod debounce;
mod diff;
mod error;
mod events;
pub mod filter;
pub mod guard;
mod snapshot;
mod watcher;

pub use diff::diff;
pub use error::WatchError;
pub use events::{AlertEvent, AlertKind, Notification};
pub use guard::{GuardOutcome, RefreshState, SchedulerState};
pub use snapshot::{derive_stats, Snapshot};
pub use watcher::InventoryWatcher;
