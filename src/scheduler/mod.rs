mod handle;
mod run;
mod poll_due;
mod apply_command;
mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::module::ModuleSlot;

pub use handle::SchedulerHandle;

pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub(crate) enum SchedulerCommand {
    Register(Arc<ModuleSlot>),
    Unregister {
        name: String,
        done: oneshot::Sender<bool>,
    },
    Refresh(String),
    RefreshAll,
}

/// Bookkeeping for one polled module.
#[derive(Debug)]
struct PollEntry {
    slot: Arc<ModuleSlot>,
    /// `None` for manual-only modules and out-of-range intervals.
    next_due: Option<Instant>,
    in_flight: Option<JoinHandle<()>>,
}

impl PollEntry {
    fn new(slot: Arc<ModuleSlot>, now: Instant) -> Self {
        let descriptor = slot.descriptor();
        // An interval too long to represent is never due.
        let next_due = if descriptor.is_manual() {
            None
        } else {
            now.checked_add(descriptor.interval)
        };

        Self {
            slot,
            next_due,
            in_flight: None,
        }
    }

    fn is_running(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

/// Drives every registered module's `update` on its own interval.
///
/// Each run is a separate tokio task, so slow modules never hold up the
/// others; a module whose previous run has not finished skips the tick.
#[derive(Debug)]
pub struct PollScheduler {
    commands: mpsc::UnboundedReceiver<SchedulerCommand>,
    handle: SchedulerHandle,
    shutdown_timeout: Duration,
}

impl PollScheduler {
    pub fn new(shutdown_timeout: Duration) -> Self {
        let (tx, commands) = mpsc::unbounded_channel();

        Self {
            commands,
            handle: SchedulerHandle::new(tx),
            shutdown_timeout,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Queue a module for polling. Takes effect once `run` picks it up.
    pub fn register(&self, slot: Arc<ModuleSlot>) {
        self.handle.register(slot);
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SHUTDOWN_TIMEOUT)
    }
}
