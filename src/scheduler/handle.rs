use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use super::SchedulerCommand;
use crate::module::ModuleSlot;

/// Cheap, cloneable way to talk to a running (or not yet started) scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::UnboundedSender<SchedulerCommand>,
}

impl SchedulerHandle {
    pub(super) fn new(tx: mpsc::UnboundedSender<SchedulerCommand>) -> Self {
        Self { tx }
    }

    pub fn register(&self, slot: Arc<ModuleSlot>) {
        self.send(SchedulerCommand::Register(slot));
    }

    /// Stop polling `name`. The receiver resolves once any in-flight update of
    /// that module has been aborted, with `true` if the module was known.
    pub fn unregister(&self, name: &str) -> oneshot::Receiver<bool> {
        let (done, rx) = oneshot::channel();
        self.send(SchedulerCommand::Unregister {
            name: name.to_string(),
            done,
        });
        rx
    }

    /// Update `name` now, outside its interval.
    pub fn refresh(&self, name: &str) {
        self.send(SchedulerCommand::Refresh(name.to_string()));
    }

    pub fn refresh_all(&self) {
        self.send(SchedulerCommand::RefreshAll);
    }

    fn send(&self, command: SchedulerCommand) {
        if self.tx.send(command).is_err() {
            warn!("Scheduler has stopped, command dropped");
        }
    }
}
