use std::future::pending;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{poll_due::poll_due, PollEntry, PollScheduler};

impl PollScheduler {
    /// Poll until `stop` is cancelled, then wind down in-flight updates.
    pub async fn run(mut self, stop: CancellationToken) {
        let mut entries: Vec<PollEntry> = Vec::new();
        info!("⏱️ Poll scheduler started");

        loop {
            let next_due = entries.iter().filter_map(|e| e.next_due).min();
            let wake = async move {
                match next_due {
                    Some(deadline) => sleep_until(deadline).await,
                    None => pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                _ = stop.cancelled() => break,

                Some(command) = self.commands.recv() => {
                    self.apply_command(command, &mut entries).await;
                }

                _ = wake => {
                    poll_due(&mut entries, Instant::now());
                }
            }
        }

        self.shutdown(entries).await;
        info!("⏱️ Poll scheduler stopped");
    }
}
