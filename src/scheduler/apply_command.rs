use tokio::time::Instant;
use tracing::{debug, warn};

use super::{poll_due::launch, PollEntry, PollScheduler, SchedulerCommand};

impl PollScheduler {
    pub(super) async fn apply_command(
        &self,
        command: SchedulerCommand,
        entries: &mut Vec<PollEntry>,
    ) {
        match command {
            SchedulerCommand::Register(slot) => {
                if entries.iter().any(|e| e.slot.name() == slot.name()) {
                    warn!("Module {} is already scheduled", slot.name());
                    return;
                }
                debug!("⏱️ Scheduling {} every {:?}", slot.name(), slot.descriptor().interval);
                entries.push(PollEntry::new(slot, Instant::now()));
            }
            SchedulerCommand::Unregister { name, done } => {
                let removed = match entries.iter().position(|e| e.slot.name() == name) {
                    Some(index) => {
                        let entry = entries.remove(index);
                        if let Some(handle) = entry.in_flight {
                            handle.abort();
                            // Resolves as soon as the task has been torn down.
                            let _ = handle.await;
                        }
                        true
                    }
                    None => false,
                };
                let _ = done.send(removed);
            }
            SchedulerCommand::Refresh(name) => {
                match entries.iter_mut().find(|e| e.slot.name() == name) {
                    Some(entry) => launch(entry),
                    None => debug!("Refresh for unknown module {}", name),
                }
            }
            SchedulerCommand::RefreshAll => {
                for entry in entries.iter_mut() {
                    launch(entry);
                }
            }
        }
    }
}
