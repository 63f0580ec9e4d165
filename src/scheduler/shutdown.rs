use futures::future::join_all;
use tokio::time::timeout;
use tracing::warn;

use super::{PollEntry, PollScheduler};

impl PollScheduler {
    /// Give in-flight updates `shutdown_timeout` to finish; abort the rest and
    /// mark their modules Degraded.
    pub(super) async fn shutdown(&self, entries: Vec<PollEntry>) {
        let limit = self.shutdown_timeout;

        let pending = entries.into_iter().filter_map(|entry| {
            let mut handle = entry.in_flight?;
            let slot = entry.slot;
            Some(async move {
                if timeout(limit, &mut handle).await.is_err() {
                    warn!("⌛ Module {} did not finish within {:?}, aborting", slot.name(), limit);
                    handle.abort();
                    slot.mark_degraded();
                }
            })
        });

        join_all(pending).await;
    }
}
