//! Foreground watch mode: run the refresh loop and print notifications.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use shelfwatch_api::InventoryApi;
use shelfwatch_engine::{AlertKind, InventoryWatcher, Notification, debounce::debounce};

pub async fn run_watch(
    api: Arc<dyn InventoryApi>,
    interval: Duration,
    search_debounce: Duration,
) -> Result<()> {
    let watcher = InventoryWatcher::new(api, interval);
    let mut events = watcher.subscribe();

    if let Err(err) = watcher.refresh_now().await {
        // Keep watching: the scheduler retries on its own.
        warn!(?err, "initial load failed");
    } else {
        print_summary(&watcher).await;
    }

    let handle = watcher.spawn_refresh_loop();
    info!(interval_ms = interval.as_millis() as u64, "watching inventory");

    // stdin lines become search terms, collapsed per burst before they hit
    // the remote fetch path.
    let (search_tx, search_rx) = mpsc::unbounded_channel::<String>();
    let mut search_rx = debounce(search_debounce, search_rx);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if search_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(term) = search_rx.recv() => {
                watcher.set_search(term.trim().to_string()).await;
                // Failures already land on the notification stream.
                let _ = watcher.refresh_now().await;
            }
            event = events.recv() => match event {
                Ok(notification) => print_notification(&notification),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    info!("shutting down");
    watcher.shutdown();
    handle.await?;
    Ok(())
}

async fn print_summary(watcher: &InventoryWatcher) {
    let snapshot = watcher.snapshot().await;
    let state = watcher.refresh_state().await;
    println!(
        "{} records loaded ({:?})",
        snapshot.len(),
        state.scheduler_state()
    );
}

fn print_notification(notification: &Notification) {
    match notification {
        Notification::Alert(alert) => {
            let record = &alert.record;
            match alert.kind {
                AlertKind::LowStock => println!(
                    "LOW STOCK     {}: {}{} left (minimum {})",
                    record.name, record.quantity, record.unit, record.min_quantity
                ),
                AlertKind::OutOfStock => {
                    println!("OUT OF STOCK  {}", record.name);
                }
            }
        }
        Notification::SetupComplete => {
            println!("setup complete; live refresh resumed");
        }
        Notification::RefreshRejected { reason } => {
            println!("refresh toggle rejected: {reason}");
        }
        Notification::SnapshotReplaced { count } => {
            debug!(count, "snapshot replaced");
        }
        Notification::Failure { operation, message } => {
            println!("{operation} failed: {message}");
        }
        Notification::Info(message) => println!("{message}"),
    }
}
