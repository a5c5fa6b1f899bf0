//! Setup guard: classifies snapshots and owns the refresh lock.
//!
//! Newly created records arrive from the service with sentinel fields until
//! the operator fills them in.  While any such placeholder is present the
//! guard suspends automatic refresh, so half-configured rows never trigger
//! stale alerts.  `apply` is the single authority for `RefreshState.locked`;
//! no other code sets or clears it.

use serde::{Deserialize, Serialize};

use shelfwatch_api::InventoryRecord;

use crate::snapshot::Snapshot;

/// A record the operator has not finished configuring.  Derived from the
/// fields on every call, never cached, so it cannot drift.
pub fn is_placeholder(record: &InventoryRecord) -> bool {
    record.category == "-"
        || record.unit == "-"
        || (record.quantity == 0.0 && record.min_quantity == 0.0 && record.price == 0.0)
}

pub fn requires_setup(snapshot: &Snapshot) -> bool {
    snapshot.records().iter().any(is_placeholder)
}

/// Whether the scheduler may run unattended.  Process-wide single instance,
/// owned by the watcher and created fresh on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshState {
    pub enabled: bool,
    pub locked: bool,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self {
            enabled: true,
            locked: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Running,
    Paused,
    Locked,
}

impl RefreshState {
    pub fn scheduler_state(&self) -> SchedulerState {
        if self.locked {
            SchedulerState::Locked
        } else if self.enabled {
            SchedulerState::Running
        } else {
            SchedulerState::Paused
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Placeholders appeared; automatic refresh suspended.
    Locked,
    /// Setup finished; refresh resumed.  The caller emits exactly one
    /// completion notification per lock→unlock episode.
    Unlocked,
    Unchanged,
}

/// Re-evaluate the lock against a freshly fetched snapshot.
///
/// Locking always wins: placeholders force `enabled = false` regardless of
/// prior state.  Unlocking happens only here, the instant a snapshot holds
/// zero placeholders, and forces `enabled = true`.
pub fn apply(state: &mut RefreshState, snapshot: &Snapshot) -> GuardOutcome {
    if requires_setup(snapshot) {
        let was_locked = state.locked;
        state.enabled = false;
        state.locked = true;
        if was_locked {
            GuardOutcome::Unchanged
        } else {
            GuardOutcome::Locked
        }
    } else if state.locked {
        state.locked = false;
        state.enabled = true;
        GuardOutcome::Unlocked
    } else {
        GuardOutcome::Unchanged
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
