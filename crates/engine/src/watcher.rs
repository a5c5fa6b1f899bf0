//! The watcher: snapshot store, refresh scheduler, and mutation coordinator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shelfwatch_api::{AggregateStats, InventoryApi, InventoryRecord, RecordFields, normalize_search};

use crate::diff::diff;
use crate::error::WatchError;
use crate::events::Notification;
use crate::filter;
use crate::guard::{self, GuardOutcome, RefreshState};
use crate::snapshot::Snapshot;

/// Broadcast channel capacity. Old events are dropped when subscribers lag.
const BROADCAST_CAP: usize = 256;

struct WatchState {
    snapshot: Snapshot,
    refresh: RefreshState,
    stats: Option<AggregateStats>,
    search: String,
    category: Option<String>,
    loading: bool,
}

impl WatchState {
    fn new() -> Self {
        Self {
            snapshot: Snapshot::default(),
            refresh: RefreshState::default(),
            stats: None,
            search: String::new(),
            category: None,
            loading: false,
        }
    }
}

/// One instance per view.  Owns the snapshot store and refresh state for its
/// lifetime; cheap to clone (all handles are shared).
#[derive(Clone)]
pub struct InventoryWatcher {
    api: Arc<dyn InventoryApi>,
    state: Arc<Mutex<WatchState>>,
    notify_tx: broadcast::Sender<Notification>,
    shutdown_tx: watch::Sender<bool>,
    interval: Duration,
}

impl InventoryWatcher {
    pub fn new(api: Arc<dyn InventoryApi>, interval: Duration) -> Self {
        let (notify_tx, _) = broadcast::channel(BROADCAST_CAP);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            api,
            state: Arc::new(Mutex::new(WatchState::new())),
            notify_tx,
            shutdown_tx,
            interval,
        }
    }

    /// Subscribe to the notification stream (alerts, setup transitions,
    /// failures).  Consumed by the toast surface; out of scope here.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn stats(&self) -> Option<AggregateStats> {
        self.state.lock().await.stats
    }

    pub async fn refresh_state(&self) -> RefreshState {
        self.state.lock().await.refresh
    }

    pub async fn loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Set the free-text search term.  Callers debounce before triggering
    /// the remote fetch path (`refresh_now`); the local filter is immediate.
    pub async fn set_search(&self, term: impl Into<String>) {
        self.state.lock().await.search = term.into();
    }

    pub async fn set_category(&self, category: Option<String>) {
        self.state.lock().await.category = category;
    }

    /// The currently visible rows: snapshot narrowed by search and category.
    pub async fn visible_records(&self) -> Vec<InventoryRecord> {
        let s = self.state.lock().await;
        filter::visible(&s.snapshot, &s.search, s.category.as_deref())
    }

    // ── refresh ──────────────────────────────────────────────────────────────

    /// Manual refresh.  Failures surface to the caller and the notification
    /// stream; the snapshot keeps its last good value.
    pub async fn refresh_now(&self) -> Result<(), WatchError> {
        self.refresh_inner(false).await
    }

    async fn refresh_inner(&self, scheduled: bool) -> Result<(), WatchError> {
        // Capture the previous snapshot before the fetch starts: the diff
        // must compare against it even if a mutation replaces the store
        // while this fetch is in flight.
        let (previous, search) = {
            let mut s = self.state.lock().await;
            if !scheduled {
                s.loading = true;
            }
            (s.snapshot.clone(), s.search.clone())
        };

        let fetched = self.api.list_inventory(normalize_search(&search)).await;
        let next = match fetched {
            Ok(records) => Snapshot::from(records),
            Err(err) => {
                self.state.lock().await.loading = false;
                if scheduled {
                    // Silent retry next tick; never interrupt the user.
                    debug!(?err, "scheduled refresh failed");
                } else {
                    let _ = self.notify_tx.send(Notification::Failure {
                        operation: "refresh".to_string(),
                        message: err.to_string(),
                    });
                }
                return Err(err.into());
            }
        };

        self.apply_snapshot(previous, next, true).await;
        self.refresh_stats().await;
        Ok(())
    }

    /// Replace the store with a freshly fetched snapshot: re-evaluate the
    /// setup lock, diff for alerts, then publish.  `with_alerts` is false
    /// for post-mutation reloads: the user's own edit is not a crossing.
    async fn apply_snapshot(&self, previous: Snapshot, next: Snapshot, with_alerts: bool) {
        let (outcome, alerts, count) = {
            let mut s = self.state.lock().await;
            let outcome = guard::apply(&mut s.refresh, &next);
            // No alerts out of half-configured data.
            let alerts = if with_alerts && !s.refresh.locked {
                diff(&previous, &next)
            } else {
                Vec::new()
            };
            if let Some(selected) = &s.category {
                if !filter::categories(&next).contains(selected) {
                    s.category = None;
                }
            }
            s.snapshot = next;
            s.loading = false;
            (outcome, alerts, s.snapshot.len())
        };

        match outcome {
            GuardOutcome::Locked => {
                info!("incomplete records detected; automatic refresh locked");
            }
            GuardOutcome::Unlocked => {
                info!("all records configured; automatic refresh resumed");
                let _ = self.notify_tx.send(Notification::SetupComplete);
            }
            GuardOutcome::Unchanged => {}
        }

        for alert in alerts {
            let _ = self.notify_tx.send(Notification::Alert(alert));
        }
        let _ = self.notify_tx.send(Notification::SnapshotReplaced { count });
    }

    async fn refresh_stats(&self) {
        match self.api.get_stats().await {
            Ok(stats) => self.state.lock().await.stats = Some(stats),
            Err(err) => debug!(?err, "stats refresh failed"),
        }
    }

    // ── scheduler ────────────────────────────────────────────────────────────

    /// Spawn the timer-driven refresh loop.  The tick body is awaited
    /// inline, so a tick still in flight suppresses the next scheduled one
    /// rather than queueing it.  The task exits when `shutdown` is called.
    pub fn spawn_refresh_loop(&self) -> JoinHandle<()> {
        let watcher = self.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(watcher.interval) => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                let enabled = watcher.state.lock().await.refresh.enabled;
                if !enabled {
                    continue;
                }

                // Errors are absorbed at the tick boundary so one bad fetch
                // cannot kill future ticks.
                if watcher.refresh_inner(true).await.is_err() {
                    continue;
                }
            }
            debug!("refresh loop stopped");
        })
    }

    /// Stop the refresh loop.  Idempotent; the spawned task observes the
    /// flag at its next suspension point and exits.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Suspend scheduled refresh.  Rejected while the setup lock is held;
    /// the lock already owns the pause.
    pub async fn pause(&self) -> Result<(), WatchError> {
        let mut s = self.state.lock().await;
        if s.refresh.locked {
            let _ = self.notify_tx.send(Notification::RefreshRejected {
                reason: "finish configuring records first".to_string(),
            });
            return Err(WatchError::RefreshLocked);
        }
        s.refresh.enabled = false;
        Ok(())
    }

    /// Resume scheduled refresh and run one immediate out-of-band fetch.
    /// Rejected while the setup lock is held.
    pub async fn resume(&self) -> Result<(), WatchError> {
        {
            let mut s = self.state.lock().await;
            if s.refresh.locked {
                let _ = self.notify_tx.send(Notification::RefreshRejected {
                    reason: "finish configuring records first".to_string(),
                });
                return Err(WatchError::RefreshLocked);
            }
            s.refresh.enabled = true;
        }
        self.refresh_now().await
    }

    // ── mutations ────────────────────────────────────────────────────────────

    pub async fn create_record(&self, fields: &RecordFields) -> Result<InventoryRecord, WatchError> {
        let prior = self.begin_mutation().await;
        let result = self.api.create_inventory(fields).await;
        if let Err(err) = &result {
            let _ = self.notify_tx.send(Notification::Failure {
                operation: "create".to_string(),
                message: err.to_string(),
            });
        }
        self.reload_after_mutation(prior).await;
        result.map_err(Into::into)
    }

    pub async fn update_record(
        &self,
        id: i64,
        fields: &RecordFields,
    ) -> Result<InventoryRecord, WatchError> {
        let prior = self.begin_mutation().await;
        let result = self.api.update_inventory(id, fields).await;
        match &result {
            Ok(_) => {
                // Clear any active narrowing so the edited record is
                // visible in the reloaded list.
                let mut s = self.state.lock().await;
                s.search.clear();
                s.category = None;
            }
            Err(err) => {
                let _ = self.notify_tx.send(Notification::Failure {
                    operation: "update".to_string(),
                    message: err.to_string(),
                });
            }
        }
        self.reload_after_mutation(prior).await;
        result.map_err(Into::into)
    }

    pub async fn delete_record(&self, id: i64) -> Result<(), WatchError> {
        let prior = self.begin_mutation().await;
        let result = self.api.delete_inventory(id).await;
        if let Err(err) = &result {
            let _ = self.notify_tx.send(Notification::Failure {
                operation: "delete".to_string(),
                message: err.to_string(),
            });
        }
        self.reload_after_mutation(prior).await;
        result.map_err(Into::into)
    }

    /// Force the scheduler to pause while a write is in flight, remembering
    /// what to restore afterwards.
    async fn begin_mutation(&self) -> RefreshState {
        let mut s = self.state.lock().await;
        let prior = s.refresh;
        s.refresh.enabled = false;
        prior
    }

    /// Reload the snapshot after a mutation (success or failure) so local
    /// state converges with the service, then restore the scheduler.  The
    /// reload re-runs the setup guard; if it locked, locking wins over the
    /// remembered prior state.
    async fn reload_after_mutation(&self, prior: RefreshState) {
        let (previous, search) = {
            let s = self.state.lock().await;
            (s.snapshot.clone(), s.search.clone())
        };
        match self.api.list_inventory(normalize_search(&search)).await {
            Ok(records) => self.apply_snapshot(previous, Snapshot::from(records), false).await,
            Err(err) => warn!(?err, "post-mutation reload failed; keeping last good snapshot"),
        }
        self.refresh_stats().await;

        let mut s = self.state.lock().await;
        if prior.enabled && !s.refresh.locked {
            s.refresh.enabled = true;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
