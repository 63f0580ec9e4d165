use thiserror::Error;

/// Transient failure while a module refreshes its data.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Problem with a module's configuration, detected at registration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Module '{module}' is missing required parameter '{parameter}'")]
    MissingParameter { module: String, parameter: String },

    #[error("Module '{module}' has invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        module: String,
        parameter: String,
        reason: String,
    },

    #[error("Invalid setting '{setting}': {reason}")]
    InvalidSetting { setting: String, reason: String },

    #[error("Unknown module type: {0}")]
    UnknownModuleType(String),

    #[error("Module {0} is already registered")]
    DuplicateModule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure of an input binding's action.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Action failed: {0}")]
    Action(String),

    #[error(transparent)]
    Update(#[from] UpdateError),
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
