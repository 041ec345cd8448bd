//! Configuration management for Prefstore.
//!
//! Two layers live here:
//!
//! - [`Options`]: what a single [`SettingsFile`](crate::SettingsFile) is built
//!   with (defaults, data directory override, output format).
//! - [`Config`]: the command-line tool's TOML configuration, which can carry
//!   per-application defaults.

use crate::document::Settings;
use crate::error::{Result, SettingsError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output format of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Spaces per indentation level
    pub indent: usize,
}

impl Default for Format {
    fn default() -> Self {
        Format { indent: 2 }
    }
}

/// Construction options for a settings file.
///
/// Defaults are captured once when the settings file is created and are
/// applied only when reading; they are never written to disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Values returned for global keys that have nothing stored
    pub global_defaults: Settings,

    /// Values returned for instance keys that have nothing stored
    pub instance_defaults: Settings,

    /// Directory holding the settings files (None = per-user data directory)
    pub data_dir: Option<PathBuf>,

    /// How documents are written
    pub format: Format,
}

impl Options {
    /// Options with no defaults, the per-user data directory and 2-space indentation.
    pub fn new() -> Self {
        Options::default()
    }

    pub fn with_global_defaults(mut self, defaults: Settings) -> Self {
        self.global_defaults = defaults;
        self
    }

    pub fn with_instance_defaults(mut self, defaults: Settings) -> Self {
        self.instance_defaults = defaults;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Directory the settings files go to.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_data_dir(),
        }
    }
}

/// Defaults configured for one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDefaults {
    pub global_defaults: Settings,
    pub instance_defaults: Settings,
}

/// Configuration for the `prefstore` command-line tool.
///
/// ## Example Configuration File (prefstore.toml)
///
/// ```toml
/// data_dir = "/home/me/.local/share/prefstore"
/// indent = 2
///
/// [apps.demo.global_defaults]
/// theme = "light"
/// font_size = 12
///
/// [apps.demo.instance_defaults]
/// port = 8080
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings file directory (None = per-user data directory)
    pub data_dir: Option<PathBuf>,

    /// Spaces per indentation level in written files
    pub indent: usize,

    /// Per-application defaults
    pub apps: BTreeMap<String, AppDefaults>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            indent: Format::default().indent,
            apps: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents =
            fs::read_to_string(path).map_err(|e| SettingsError::io("read config", path, e))?;
        let config: Config = toml::from_str(&contents).map_err(|e| SettingsError::Config {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        paths::ensure_parent_dir(path)?;

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents).map_err(|e| SettingsError::io("write config", path, e))?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(paths::project_dirs()?.config_dir().join("prefstore.toml"))
    }

    /// Build the options for one application from this configuration.
    pub fn options_for(&self, app: &str) -> Options {
        let defaults = self.apps.get(app).cloned().unwrap_or_default();
        Options {
            global_defaults: defaults.global_defaults,
            instance_defaults: defaults.instance_defaults,
            data_dir: self.data_dir.clone(),
            format: Format { indent: self.indent },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.indent, 2);
        assert!(config.data_dir.is_none());
        assert!(config.apps.is_empty());
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.indent, 2);
    }

    #[test]
    fn test_parse_app_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("prefstore.toml");
        fs::write(
            &config_path,
            r#"
data_dir = "/srv/settings"
indent = 4

[apps.demo.global_defaults]
a = 1
b = "two"

[apps.demo.instance_defaults]
x = 0
"#,
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        let options = config.options_for("demo");

        assert_eq!(options.data_dir, Some(PathBuf::from("/srv/settings")));
        assert_eq!(options.format, Format { indent: 4 });
        assert_eq!(
            Value::Object(options.global_defaults),
            json!({"a": 1, "b": "two"})
        );
        assert_eq!(Value::Object(options.instance_defaults), json!({"x": 0}));

        let other = config.options_for("other");
        assert!(other.global_defaults.is_empty());
        assert!(other.instance_defaults.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("prefstore.toml");

        let mut config = Config::default();
        config.data_dir = Some(temp_dir.path().join("data"));
        let mut defaults = AppDefaults::default();
        defaults
            .global_defaults
            .insert("theme".to_string(), json!("dark"));
        config.apps.insert("demo".to_string(), defaults);

        config.save_to(&config_path).unwrap();
        let loaded = Config::load_from(&config_path).unwrap();

        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.apps, config.apps);
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "indent = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, SettingsError::Config { .. }));
    }

    #[test]
    fn test_options_builder() {
        let temp_dir = TempDir::new().unwrap();
        let options = Options::new()
            .with_data_dir(temp_dir.path())
            .with_format(Format { indent: 1 });

        assert_eq!(options.resolve_data_dir().unwrap(), temp_dir.path());
        assert_eq!(options.format.indent, 1);
    }
}
