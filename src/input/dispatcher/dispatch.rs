use std::sync::Arc;

use tracing::{debug, warn};

use super::{run_action::run_action, BusyGuard, Dispatch, InputDispatcher};
use crate::input::{BindingKey, InputEvent};

impl InputDispatcher {
    /// Route `event` to its binding and start the action on its own task.
    /// Unbound events and events for a busy `wait` binding are dropped.
    pub fn dispatch(&self, event: InputEvent) -> Dispatch {
        let key = BindingKey::from(&event);
        let Some(entry) = self.bindings.read().get(&key).cloned() else {
            debug!("No binding for {:?} on module {}, dropping", event.button, event.module);
            return Dispatch::Unbound;
        };

        let guard = if entry.binding.wait {
            match BusyGuard::acquire(&entry) {
                Some(guard) => Some(guard),
                None => {
                    debug!("⏳ Binding {:?} on {} still running, dropping", event.button, event.module);
                    return Dispatch::Busy;
                }
            }
        } else {
            None
        };

        let registry = Arc::clone(&self.registry);
        let module = event.module.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = run_action(&registry, &entry.binding, &event).await {
                warn!("❌ Input action for module {} failed: {}", event.module, e);
            }
        });

        self.track(&module, &handle);
        Dispatch::Accepted(handle)
    }
}
