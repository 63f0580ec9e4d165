use std::collections::HashSet;

use super::BarConfig;
use crate::{error::ConfigError, modules::is_supported_module_type};

impl BarConfig {
    /// Reject a zero render interval, duplicate names and unknown module types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_interval_ms == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "render_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let mut seen = HashSet::new();

        for entry in &self.modules {
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicateModule(entry.name.clone()));
            }
            if !is_supported_module_type(&entry.module_type) {
                return Err(ConfigError::UnknownModuleType(entry.module_type.clone()));
            }
        }

        Ok(())
    }
}
