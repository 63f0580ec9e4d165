pub mod bluetooth;
pub mod gcalendar;

use tracing::debug;

use crate::{config::ModuleEntry, error::ConfigError, module::StatusModule};

use bluetooth::BluetoothModule;
use gcalendar::CalendarModule;

pub const SUPPORTED_MODULE_TYPES: &[&str] = &[bluetooth::MODULE_TYPE, gcalendar::MODULE_TYPE];

pub fn is_supported_module_type(module_type: &str) -> bool {
    SUPPORTED_MODULE_TYPES.contains(&module_type)
}

/// Construct the module a config entry describes.
pub fn build_module(entry: &ModuleEntry) -> Result<Box<dyn StatusModule>, ConfigError> {
    let params = entry.params();
    let interval = entry.interval_override();
    debug!("🔧 Building {} module '{}'", entry.module_type, entry.name);

    match entry.module_type.as_str() {
        bluetooth::MODULE_TYPE => Ok(Box::new(BluetoothModule::from_params(&params, interval)?)),
        gcalendar::MODULE_TYPE => Ok(Box::new(CalendarModule::from_params(&params, interval)?)),
        other => Err(ConfigError::UnknownModuleType(other.to_string())),
    }
}
