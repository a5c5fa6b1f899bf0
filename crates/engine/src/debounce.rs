//! Collapse bursts of values into their final element.
//!
//! Search-term changes are debounced before they reach the remote fetch
//! path; the local view filter over an already-loaded snapshot is not.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

/// Spawn a task that forwards from `rx`, emitting only the last value of
/// any burst whose items arrive within `delay` of each other.  The task
/// exits when `rx` closes (flushing a pending value) or when the returned
/// receiver is dropped.
pub fn debounce<T: Send + 'static>(
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<T>,
) -> mpsc::UnboundedReceiver<T> {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(mut latest) = rx.recv().await {
            loop {
                match timeout(delay, rx.recv()).await {
                    // A newer value within the window supersedes the held one.
                    Ok(Some(next)) => latest = next,
                    // Input closed: flush and stop.
                    Ok(None) => {
                        let _ = out_tx.send(latest);
                        return;
                    }
                    // Quiet period elapsed.
                    Err(_) => break,
                }
            }
            if out_tx.send(latest).is_err() {
                return;
            }
        }
    });
    out_rx
}

// ── Tests ────────────────────────────────────────────────────────────────────
