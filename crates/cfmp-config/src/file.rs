//! The JSON config file
//!
//! ```json
//! {
//!   "CLOUDFLARE": { "ACCOUNT_ID": "...", "ZONE_ID": "...", "SCRIPT_NAME": "" },
//!   "PAGE": { "STATUS_CODE": 503, "TITLE": "...", ... }
//! }
//! ```
//!
//! A missing file is seeded from the bundled example. The file may hold
//! account identifiers, so it is created owner-readable only.

use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Contents of a freshly seeded config file
pub const EXAMPLE_CONFIG: &str = include_str!("../config.example.json");

pub const CLOUDFLARE_SECTION: &str = "CLOUDFLARE";
pub const PAGE_SECTION: &str = "PAGE";

/// A loaded config file
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    root: Value,
}

impl ConfigFile {
    /// Create the file from the example if it does not exist yet
    ///
    /// Returns `true` when a new file was written.
    pub fn ensure(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        write_private(path, EXAMPLE_CONFIG)?;
        info!(path = %path.display(), "Created config file from example");
        Ok(true)
    }

    /// Read and parse the file, seeding it first if missing
    pub fn load(path: &Path) -> Result<Self> {
        Self::ensure(path)?;

        let content = fs::read_to_string(path)?;
        let root: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if !root.is_object() {
            return Err(ConfigError::InvalidFile {
                path: path.display().to_string(),
                reason: "top level must be a JSON object".to_string(),
            });
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A top-level section such as `CLOUDFLARE` or `PAGE`
    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get(name).and_then(Value::as_object)
    }

    /// Set string values in a section and write the file back
    pub fn set_values(&mut self, section: &str, values: &[(&str, &str)]) -> Result<()> {
        let root = self
            .root
            .as_object_mut()
            .ok_or_else(|| ConfigError::invalid(section, "config root is not an object"))?;

        let entry = root
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }

        if let Value::Object(map) = entry {
            for (key, value) in values {
                map.insert((*key).to_string(), Value::String((*value).to_string()));
            }
        }

        self.save()
    }

    fn save(&self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.root)?;
        content.push('\n');
        write_private(&self.path, &content)?;
        debug!(path = %self.path.display(), "Saved config file");
        Ok(())
    }
}

/// Write a file readable and writable by the owner only
fn write_private(path: &Path, content: &str) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_is_valid() {
        let root: Value = serde_json::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(root[CLOUDFLARE_SECTION].is_object());
        assert_eq!(root[PAGE_SECTION]["STATUS_CODE"], 503);
    }

    #[test]
    fn test_ensure_seeds_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        assert!(ConfigFile::ensure(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), EXAMPLE_CONFIG);

        fs::write(&path, "{\"CLOUDFLARE\": {}}").unwrap();
        assert!(!ConfigFile::ensure(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"CLOUDFLARE\": {}}");
    }

    #[cfg(unix)]
    #[test]
    fn test_seeded_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        ConfigFile::ensure(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigError::InvalidFile { .. })));
    }

    #[test]
    fn test_set_values_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut file = ConfigFile::load(&path).unwrap();
        file.set_values(CLOUDFLARE_SECTION, &[("ACCOUNT_ID", "acc"), ("ZONE_ID", "zone")])
            .unwrap();

        let reloaded = ConfigFile::load(&path).unwrap();
        let section = reloaded.section(CLOUDFLARE_SECTION).unwrap();
        assert_eq!(section["ACCOUNT_ID"], "acc");
        assert_eq!(section["ZONE_ID"], "zone");
        // untouched sections survive
        assert_eq!(reloaded.section(PAGE_SECTION).unwrap()["STATUS_CODE"], 503);
    }
}
