use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Missing configuration value: {0}")]
    MissingField(String),

    #[error("Invalid configuration value {key}: {reason}")]
    InvalidField { key: String, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("Credential store error: {0}")]
    SecretStore(#[from] keyring::Error),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
