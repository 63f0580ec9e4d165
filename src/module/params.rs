use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ConfigError;

/// String-keyed, string-valued parameters handed to a module constructor.
#[derive(Debug, Clone, Default)]
pub struct ModuleParams {
    module: String,
    values: HashMap<String, String>,
}

impl ModuleParams {
    pub fn new(module: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            module: module.into(),
            values,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingParameter {
            module: self.module.clone(),
            parameter: key.to_string(),
        })
    }

    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidParameter {
                module: self.module.clone(),
                parameter: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Comma separated list, entries trimmed, empty entries dropped.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        let items: Vec<String> = self
            .get(key)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    }
}
