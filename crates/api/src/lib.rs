//! Contract with the remote inventory record-keeping service.
//!
//! The service is the source of truth for set membership: every list call
//! returns a full replacement snapshot, never a delta.

mod client;
mod error;
mod records;

pub use client::{normalize_search, HttpInventoryClient, InventoryApi};
pub use error::ApiError;
pub use records::{AggregateStats, InventoryRecord, RecordFields};
