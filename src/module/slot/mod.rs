mod run_update;
mod run_input;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::module::{ModuleDescriptor, ModuleState, ModuleStatus, StateCell, StatusModule};

/// A registered module: its descriptor, the module itself behind the
/// per-module execution lock, and the state snapshot it publishes.
#[derive(Debug)]
pub struct ModuleSlot {
    descriptor: ModuleDescriptor,
    module: Mutex<Box<dyn StatusModule>>,
    state: StateCell,
}

impl ModuleSlot {
    pub fn new(module: Box<dyn StatusModule>) -> Self {
        let descriptor = module.descriptor();
        let state = StateCell::new(&descriptor.widgets);

        Self {
            descriptor,
            module: Mutex::new(module),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn snapshot(&self) -> Arc<ModuleState> {
        self.state.load()
    }

    pub fn status(&self) -> ModuleStatus {
        self.state.status()
    }

    /// Run `action` while holding this module's execution lock.
    pub async fn serialized<F, T>(&self, action: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = self.module.lock().await;
        action.await
    }

    /// Hide the module and mark it Degraded.
    pub fn mark_degraded(&self) {
        self.state.publish(|state| {
            state.status = ModuleStatus::Degraded;
            for (_, widget) in state.widgets.iter_mut() {
                widget.visible = false;
            }
        });
    }
}
