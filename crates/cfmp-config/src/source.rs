//! Lookup sources for non-secret credential values
//!
//! Empty strings and JSON `null` count as absent in every source, so a
//! seeded config file with blank fields falls through to the prompt.

use crate::file::{CLOUDFLARE_SECTION, ConfigFile};
use serde_json::{Map, Value};

/// A place a named value can come from
pub trait ValueSource {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Option<String>;
}

/// Environment variables under a fixed prefix
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ValueSource for EnvSource {
    fn name(&self) -> &'static str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}{}", self.prefix, key))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// One section of the config file
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    values: Map<String, Value>,
}

impl FileSource {
    /// The `CLOUDFLARE` section of a loaded file
    pub fn cloudflare(file: &ConfigFile) -> Self {
        Self {
            values: file.section(CLOUDFLARE_SECTION).cloned().unwrap_or_default(),
        }
    }
}

impl ValueSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// First value found across `sources`, in order
pub fn lookup(sources: &[&dyn ValueSource], key: &str) -> Option<String> {
    sources.iter().find_map(|source| {
        let value = source.get(key)?;
        tracing::debug!(key, source = source.name(), "Resolved config value");
        Some(value)
    })
}
