//! Opening settings files from the command line.

use prefstore_core::{Config, InstanceSettings, Settings, SettingsFile};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The scope a command operates on.
pub enum Scope {
    Global(SettingsFile),
    Instance(InstanceSettings),
}

impl Scope {
    pub fn get(&self) -> prefstore_core::Result<Settings> {
        match self {
            Scope::Global(settings) => settings.get(),
            Scope::Instance(instance) => instance.get(),
        }
    }

    pub fn set(&self, content: Settings) -> prefstore_core::Result<()> {
        match self {
            Scope::Global(settings) => settings.set(content),
            Scope::Instance(instance) => instance.set(content),
        }
    }

    pub fn save(&self, content: Settings) -> prefstore_core::Result<()> {
        match self {
            Scope::Global(settings) => settings.save(content),
            Scope::Instance(instance) => instance.save(content),
        }
    }
}

/// Load the CLI configuration from `explicit`, or from the default location.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    resolve_config(explicit, Config::default_config_path())
}

fn resolve_config(
    explicit: Option<&Path>,
    default_path: prefstore_core::Result<PathBuf>,
) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::load_from(path)?);
    }

    match default_path {
        Ok(path) => Ok(Config::load_from(&path)?),
        // Without a config directory the data dir may still come from flags
        Err(e) => {
            warn!(error = %e, "No config location available, using defaults");
            Ok(Config::default())
        }
    }
}

/// Open the settings file for `app` using the configured defaults.
pub fn open(config: &Config, app: &str) -> anyhow::Result<SettingsFile> {
    let settings = SettingsFile::with_options(app, config.options_for(app))?;
    info!(app = %app, path = %settings.path().display(), "Opened settings file");
    Ok(settings)
}

/// Open the global scope, or one instance if an id is given.
pub fn open_scope(config: &Config, app: &str, instance: Option<&str>) -> anyhow::Result<Scope> {
    let settings = open(config, app)?;
    match instance {
        Some(id) => Ok(Scope::Instance(settings.instance(id)?)),
        None => Ok(Scope::Global(settings)),
    }
}
