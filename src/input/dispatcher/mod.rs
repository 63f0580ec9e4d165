mod dispatch;
mod run_action;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info};

use crate::{
    input::{BindingKey, InputBinding},
    module::ModuleRegistry,
};

/// Result of routing one input event.
#[derive(Debug)]
pub enum Dispatch {
    /// The action was started on its own task.
    Accepted(JoinHandle<()>),
    /// A `wait` binding whose previous action is still running.
    Busy,
    /// Nothing is bound to this module/button/modifier.
    Unbound,
}

impl Dispatch {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Dispatch::Accepted(_))
    }
}

#[derive(Debug)]
struct BindingEntry {
    binding: InputBinding,
    busy: AtomicBool,
}

/// Releases a `wait` binding when its action finishes, panics or is aborted.
struct BusyGuard(Arc<BindingEntry>);

impl BusyGuard {
    fn acquire(entry: &Arc<BindingEntry>) -> Option<Self> {
        entry
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(entry)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

/// Routes input events to the bindings registered for them.
#[derive(Debug)]
pub struct InputDispatcher {
    registry: Arc<ModuleRegistry>,
    bindings: RwLock<HashMap<BindingKey, Arc<BindingEntry>>>,
    /// Actions started and not yet known to be finished, by module.
    running: Mutex<Vec<(String, AbortHandle)>>,
}

impl InputDispatcher {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self {
            registry,
            bindings: RwLock::new(HashMap::new()),
            running: Mutex::new(Vec::new()),
        }
    }

    /// Bind an action. A later binding for the same key replaces the earlier one.
    pub fn bind(&self, binding: InputBinding) {
        let key = binding.key();
        let entry = Arc::new(BindingEntry {
            binding,
            busy: AtomicBool::new(false),
        });

        if self.bindings.write().insert(key.clone(), entry).is_some() {
            info!("🔁 Replaced binding {:?} for module {}", key.button, key.module);
        } else {
            debug!("🖱️ Bound {:?} {:?} for module {}", key.button, key.modifier, key.module);
        }
    }

    /// Drop every binding of `module` and abort its actions still running.
    pub fn unbind_module(&self, module: &str) -> usize {
        let removed = {
            let mut bindings = self.bindings.write();
            let before = bindings.len();
            bindings.retain(|key, _| key.module != module);
            before - bindings.len()
        };

        self.running.lock().retain(|(owner, task)| {
            if owner.as_str() == module {
                task.abort();
                false
            } else {
                true
            }
        });

        removed
    }

    fn track(&self, module: &str, handle: &JoinHandle<()>) {
        let mut running = self.running.lock();
        running.retain(|(_, task)| !task.is_finished());
        running.push((module.to_string(), handle.abort_handle()));
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.read().len()
    }
}
