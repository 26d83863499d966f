//! Configuration for cfmp
//!
//! Credentials come from the environment, the JSON config file, the OS
//! credential store and finally an interactive prompt, in that order. Page
//! settings come from the `PAGE` section of the same file.

pub mod error;
pub mod file;
pub mod page;
pub mod prompt;
pub mod resolver;
pub mod secret;
pub mod source;

pub use error::*;
pub use file::ConfigFile;
pub use prompt::{NonInteractive, Prompter, TerminalPrompter};
pub use resolver::{ConfigResolver, Credentials};
pub use secret::{KeyringStore, MemorySecretStore, SecretStore};
pub use source::{EnvSource, FileSource, ValueSource};

use std::path::PathBuf;

/// Application name, used for the config directory and the keyring service
pub const APP_NAME: &str = "cloudflare-maintenance-page-cli";

/// Prefix of credential environment variables
pub const ENV_PREFIX: &str = "CLOUDFLARE_";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "CFMP_CONFIG_PATH";

/// Location of the config file
///
/// `CFMP_CONFIG_PATH` wins over `<config dir>/cloudflare-maintenance-page-cli/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(APP_NAME)
        .join("config.json"))
}
