//! Secret storage for the API token
//!
//! Production uses the OS credential store through `keyring`; tests use
//! [`MemorySecretStore`].

use crate::error::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Storage of named secrets, keyed by service and account name
pub trait SecretStore: Send + Sync {
    fn get(&self, service: &str, name: &str) -> Result<Option<String>>;

    fn set(&self, service: &str, name: &str, secret: &str) -> Result<()>;

    /// Remove a secret. Returns `false` if there was nothing to remove.
    fn delete(&self, service: &str, name: &str) -> Result<bool>;
}

/// OS credential store (macOS Keychain, Windows Credential Manager, Linux Secret Service)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl SecretStore for KeyringStore {
    fn get(&self, service: &str, name: &str) -> Result<Option<String>> {
        let entry = keyring::Entry::new(service, name)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => {
                debug!(service, name, "No keyring entry");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, service: &str, name: &str, secret: &str) -> Result<()> {
        let entry = keyring::Entry::new(service, name)?;
        entry.set_password(secret)?;
        debug!(service, name, "Stored keyring entry");
        Ok(())
    }

    fn delete(&self, service: &str, name: &str) -> Result<bool> {
        let entry = keyring::Entry::new(service, name)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local secret store
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<(String, String), String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, service: &str, name: &str, secret: &str) -> Self {
        self.lock()
            .insert((service.to_string(), name.to_string()), secret.to_string());
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), String>> {
        self.secrets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .get(&(service.to_string(), name.to_string()))
            .cloned())
    }

    fn set(&self, service: &str, name: &str, secret: &str) -> Result<()> {
        self.lock()
            .insert((service.to_string(), name.to_string()), secret.to_string());
        Ok(())
    }

    fn delete(&self, service: &str, name: &str) -> Result<bool> {
        Ok(self
            .lock()
            .remove(&(service.to_string(), name.to_string()))
            .is_some())
    }
}
