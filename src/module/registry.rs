use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::{error::ConfigError, module::ModuleSlot};

/// Registered modules in registration order.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    slots: RwLock<Vec<Arc<ModuleSlot>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, slot: Arc<ModuleSlot>) -> Result<Arc<ModuleSlot>, ConfigError> {
        let mut slots = self.slots.write();

        if slots.iter().any(|s| s.name() == slot.name()) {
            return Err(ConfigError::DuplicateModule(slot.name().to_string()));
        }

        info!("📦 Registered module {} ({} widgets)", slot.name(), slot.descriptor().widgets.len());
        slots.push(Arc::clone(&slot));
        Ok(slot)
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<ModuleSlot>> {
        let mut slots = self.slots.write();
        let index = slots.iter().position(|s| s.name() == name)?;
        info!("🗑️ Unregistered module {}", name);
        Some(slots.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModuleSlot>> {
        self.slots.read().iter().find(|s| s.name() == name).cloned()
    }

    pub fn slots(&self) -> Vec<Arc<ModuleSlot>> {
        self.slots.read().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.slots.read().iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
