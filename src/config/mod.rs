mod load_from_path;
mod validate;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{module::ModuleParams, runtime::RuntimeConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    #[default]
    I3bar,
    Plain,
}

/// Top level `config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarConfig {
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
    #[serde(default)]
    pub renderer: RendererKind,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// One module instance in the bar, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub module_type: String,
    /// Overrides the module's own polling interval. `0` means manual only.
    #[serde(default)]
    pub interval_secs: Option<u64>,
    /// A required module that fails to configure aborts startup.
    #[serde(default)]
    pub required: bool,
    #[serde(default, deserialize_with = "scalar_map")]
    pub parameters: HashMap<String, String>,
}

impl ModuleEntry {
    pub fn params(&self) -> ModuleParams {
        ModuleParams::new(self.name.clone(), self.parameters.clone())
    }

    pub fn interval_override(&self) -> Option<Duration> {
        self.interval_secs.map(Duration::from_secs)
    }
}

impl BarConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            render_interval: Duration::from_millis(self.render_interval_ms),
            shutdown_timeout: Duration::from_millis(self.shutdown_timeout_ms),
        }
    }

    /// `$XDG_CONFIG_HOME/status-runtime/config.yml`, or `./config.yml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("status-runtime").join("config.yml"))
            .unwrap_or_else(|| PathBuf::from("config.yml"))
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            render_interval_ms: default_render_interval_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            renderer: RendererKind::default(),
            modules: Vec::new(),
        }
    }
}

fn default_render_interval_ms() -> u64 {
    1000
}

fn default_shutdown_timeout_ms() -> u64 {
    3000
}

/// Parameters are strings, but YAML users write `interval: 5` or `wait: true`.
fn scalar_map<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, serde_yaml::Value> = HashMap::deserialize(deserializer)?;

    raw.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                other => {
                    return Err(<D::Error as serde::de::Error>::custom(format!(
                        "parameter '{}' must be a scalar, got {:?}",
                        key, other
                    )))
                }
            };
            Ok((key, text))
        })
        .collect()
}
