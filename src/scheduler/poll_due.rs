use std::sync::Arc;

use tracing::debug;
use tokio::time::Instant;

use super::PollEntry;

/// Launch every entry whose deadline has passed, in registration order.
pub(super) fn poll_due(entries: &mut [PollEntry], now: Instant) {
    for entry in entries.iter_mut() {
        let Some(due) = entry.next_due else {
            continue;
        };
        if due > now {
            continue;
        }

        let interval = entry.slot.descriptor().interval;
        entry.next_due = match due.checked_add(interval) {
            Some(next) if next > now => Some(next),
            // Fell behind; re-anchor instead of bursting through missed ticks.
            _ => now.checked_add(interval),
        };

        launch(entry);
    }
}

/// Start one update of `entry` unless the previous one is still running.
pub(super) fn launch(entry: &mut PollEntry) {
    if entry.is_running() {
        debug!("⏭️ Module {} still updating, skipping tick", entry.slot.name());
        return;
    }

    let slot = Arc::clone(&entry.slot);
    entry.in_flight = Some(tokio::spawn(async move {
        // Failures are logged and published as Degraded by the slot.
        let _ = slot.run_update().await;
    }));
}
