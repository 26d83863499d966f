//! Credential and page configuration resolution

use crate::error::{ConfigError, Result};
use crate::file::{CLOUDFLARE_SECTION, ConfigFile, PAGE_SECTION};
use crate::page::parse_page_config;
use crate::prompt::{NonInteractive, Prompter, TerminalPrompter, ask_non_empty};
use crate::secret::{KeyringStore, SecretStore};
use crate::source::{EnvSource, FileSource, ValueSource, lookup};
use crate::{APP_NAME, ENV_PREFIX, default_config_path};
use cfmp_worker::PageConfig;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ACCOUNT_ID: &str = "ACCOUNT_ID";
pub const ZONE_ID: &str = "ZONE_ID";
pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
pub const API_TOKEN: &str = "API_TOKEN";

/// Credential store entry name of the API token
pub const TOKEN_SECRET_NAME: &str = "cloudflare-token";

/// Everything needed to talk to one zone
#[derive(Debug, Clone)]
pub struct Credentials {
    pub account_id: String,
    pub zone_id: String,
    pub api_token: SecretString,
    /// Explicit Worker script name; derived from the zone when absent
    pub script_name: Option<String>,
}

/// Resolves credentials and page settings from env, file, keyring and prompts
pub struct ConfigResolver {
    path: PathBuf,
    env_prefix: String,
    store: Arc<dyn SecretStore>,
    prompter: Arc<dyn Prompter>,
}

impl ConfigResolver {
    pub fn new(
        path: impl Into<PathBuf>,
        store: Arc<dyn SecretStore>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            path: path.into(),
            env_prefix: ENV_PREFIX.to_string(),
            store,
            prompter,
        }
    }

    /// Resolver backed by the OS keyring and the terminal
    ///
    /// Prompts are only used when `allow_prompts` is set and stdin is a
    /// terminal.
    pub fn standard(path: Option<PathBuf>, allow_prompts: bool) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => default_config_path()?,
        };

        let terminal = TerminalPrompter;
        let prompter: Arc<dyn Prompter> = if allow_prompts && terminal.is_interactive() {
            Arc::new(terminal)
        } else {
            Arc::new(NonInteractive)
        };

        Ok(Self::new(path, Arc::new(KeyringStore), prompter))
    }

    /// Read environment variables under a different prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Seed the config file if missing. Returns `true` when it was created.
    pub fn ensure_config_file(&self) -> Result<bool> {
        ConfigFile::ensure(&self.path)
    }

    /// Resolve account id, zone id, script name and API token
    pub fn resolve_credentials(&self) -> Result<Credentials> {
        let mut file = ConfigFile::load(&self.path)?;
        let env = EnvSource::new(self.env_prefix.clone());
        let file_source = FileSource::cloudflare(&file);
        let sources: [&dyn ValueSource; 2] = [&env, &file_source];

        let account_id = lookup(&sources, ACCOUNT_ID);
        let zone_id = lookup(&sources, ZONE_ID);
        let script_name = lookup(&sources, SCRIPT_NAME);

        let (account_id, zone_id) = match (account_id, zone_id) {
            (Some(account_id), Some(zone_id)) => (account_id, zone_id),
            (account_id, zone_id) => self.prompt_identifiers(&mut file, account_id, zone_id)?,
        };

        let api_token = self.resolve_token()?;

        Ok(Credentials {
            account_id,
            zone_id,
            api_token,
            script_name,
        })
    }

    /// Resolve the API token: env, then credential store, then prompt
    pub fn resolve_token(&self) -> Result<SecretString> {
        let env = EnvSource::new(self.env_prefix.clone());
        if let Some(token) = env.get(API_TOKEN) {
            debug!(source = "env", "Resolved API token");
            return Ok(SecretString::from(token));
        }

        match self.store.get(APP_NAME, TOKEN_SECRET_NAME) {
            Ok(Some(token)) if !token.is_empty() => {
                debug!(source = "keyring", "Resolved API token");
                return Ok(SecretString::from(token));
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not read API token from credential store"),
        }

        if !self.prompter.is_interactive() {
            return Err(ConfigError::MissingField(API_TOKEN.to_string()));
        }

        let token = ask_non_empty(self.prompter.as_ref(), "Cloudflare API token:", true)?;
        match self.store.set(APP_NAME, TOKEN_SECRET_NAME, &token) {
            Ok(()) => info!("Saved API token to credential store"),
            Err(e) => warn!(error = %e, "Could not save API token to credential store"),
        }

        Ok(SecretString::from(token))
    }

    /// Page settings from the `PAGE` section
    pub fn resolve_page_config(&self) -> Result<PageConfig> {
        let file = ConfigFile::load(&self.path)?;
        parse_page_config(file.section(PAGE_SECTION))
    }

    /// Remove the stored API token. Returns `false` if none was stored.
    pub fn clear_token(&self) -> Result<bool> {
        self.store.delete(APP_NAME, TOKEN_SECRET_NAME)
    }

    fn prompt_identifiers(
        &self,
        file: &mut ConfigFile,
        account_id: Option<String>,
        zone_id: Option<String>,
    ) -> Result<(String, String)> {
        if !self.prompter.is_interactive() {
            let missing = if account_id.is_none() {
                ACCOUNT_ID
            } else {
                ZONE_ID
            };
            return Err(ConfigError::MissingField(missing.to_string()));
        }

        let mut captured: Vec<(&str, String)> = Vec::new();

        let account_id = match account_id {
            Some(value) => value,
            None => {
                let value =
                    ask_non_empty(self.prompter.as_ref(), "Cloudflare Account ID:", false)?;
                captured.push((ACCOUNT_ID, value.clone()));
                value
            }
        };

        let zone_id = match zone_id {
            Some(value) => value,
            None => {
                let value = ask_non_empty(self.prompter.as_ref(), "Cloudflare Zone ID:", false)?;
                captured.push((ZONE_ID, value.clone()));
                value
            }
        };

        if self
            .prompter
            .confirm("Save these values to the config file?", true)?
        {
            let values: Vec<(&str, &str)> = captured
                .iter()
                .map(|(key, value)| (*key, value.as_str()))
                .collect();
            file.set_values(CLOUDFLARE_SECTION, &values)?;
            info!(path = %file.path().display(), "Saved credentials to config file");
        }

        Ok((account_id, zone_id))
    }
}
