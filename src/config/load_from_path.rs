use std::fs;
use std::path::Path;

use tracing::info;

use super::BarConfig;
use crate::error::ConfigError;

impl BarConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: BarConfig = serde_yaml::from_str(&content)?;
        config.validate()?;

        info!("📄 Loaded {} module(s) from {}", config.modules.len(), path.display());
        Ok(config)
    }
}
