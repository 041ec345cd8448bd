//! Settings access for one application.
//!
//! Each operation is a fresh load, transform, store cycle against the
//! application's settings file. Nothing is held in memory between calls, so
//! concurrent writers race and the last write wins.
//!
//! `save` replaces a scope, `set` merges into it:
//!
//! ```rust,ignore
//! use prefstore_core::{Options, SettingsFile};
//! use serde_json::json;
//!
//! let settings = SettingsFile::with_options("demo", Options::new()
//!     .with_global_defaults(json!({"a": 1, "b": 2}).as_object().unwrap().clone()))?;
//!
//! settings.set(json!({"b": 3}).as_object().unwrap().clone())?;
//! assert_eq!(settings.get()?["b"], 3);
//!
//! settings.save(json!({"c": 4}).as_object().unwrap().clone())?;
//! assert_eq!(settings.get()?["b"], 2); // back to the default
//! ```

use crate::config::Options;
use crate::document::Settings;
use crate::error::Result;
use crate::instance::{InstanceId, InstanceSettings};
use crate::paths;
use crate::store::DocumentStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// State shared by a settings file and every instance handle made from it.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) app: String,
    pub(crate) store: DocumentStore,
    pub(crate) options: Options,
}

/// Global and per-instance settings for one application.
///
/// Cloning is cheap; clones share the same path and defaults.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    shared: Arc<Shared>,
}

impl SettingsFile {
    /// Create a settings file for `app` with no defaults.
    pub fn new(app: &str) -> Result<Self> {
        Self::with_options(app, Options::default())
    }

    /// Create a settings file for `app`.
    ///
    /// Fails with a validation error if `app` is empty or is not a plain file
    /// name. The file itself is not touched.
    pub fn with_options(app: &str, options: Options) -> Result<Self> {
        paths::validate_app_name(app)?;

        let data_dir = options.resolve_data_dir()?;
        let path = paths::settings_path(&data_dir, app);
        debug!(app = %app, path = %path.display(), "Initialized settings file");

        Ok(SettingsFile {
            shared: Arc::new(Shared {
                app: app.to_string(),
                store: DocumentStore::new(path, options.format),
                options,
            }),
        })
    }

    /// Get the application name.
    pub fn app(&self) -> &str {
        &self.shared.app
    }

    /// Get the path of the settings file.
    pub fn path(&self) -> &Path {
        self.shared.store.path()
    }

    /// Get the options this settings file was created with.
    pub fn options(&self) -> &Options {
        &self.shared.options
    }

    /// Check if the settings file exists.
    pub fn exists(&self) -> bool {
        self.shared.store.exists()
    }

    /// Global settings: the stored values laid over the global defaults.
    pub fn get(&self) -> Result<Settings> {
        let doc = self.shared.store.load()?;
        Ok(doc.global_with(&self.shared.options.global_defaults))
    }

    /// Async counterpart of [`get`](Self::get).
    pub async fn get_async(&self) -> Result<Settings> {
        let doc = self.shared.store.load_async().await?;
        Ok(doc.global_with(&self.shared.options.global_defaults))
    }

    /// Replace the stored global settings with `content`.
    pub fn save(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load()?;
        doc.save_global(content);
        self.shared.store.store(&doc)
    }

    /// Async counterpart of [`save`](Self::save).
    pub async fn save_async(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load_async().await?;
        doc.save_global(content);
        self.shared.store.store_async(&doc).await
    }

    /// Merge `content` into the stored global settings, keeping other keys.
    pub fn set(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load()?;
        doc.merge_global(content);
        self.shared.store.store(&doc)
    }

    /// Async counterpart of [`set`](Self::set).
    pub async fn set_async(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load_async().await?;
        doc.merge_global(content);
        self.shared.store.store_async(&doc).await
    }

    /// Delete the whole settings file, instances included.
    ///
    /// Deleting a file that does not exist succeeds.
    pub fn delete(&self) -> Result<()> {
        info!(app = %self.shared.app, "Deleting settings file");
        self.shared.store.remove()
    }

    /// Async counterpart of [`delete`](Self::delete).
    pub async fn delete_async(&self) -> Result<()> {
        info!(app = %self.shared.app, "Deleting settings file");
        self.shared.store.remove_async().await
    }

    /// Ids of all instances that have stored settings.
    pub fn instance_ids(&self) -> Result<Vec<String>> {
        Ok(self.shared.store.load()?.instance_ids())
    }

    /// Async counterpart of [`instance_ids`](Self::instance_ids).
    pub async fn instance_ids_async(&self) -> Result<Vec<String>> {
        Ok(self.shared.store.load_async().await?.instance_ids())
    }

    /// Settings scoped to the instance `id`.
    ///
    /// Fails with a validation error if `id` is empty or not a hyphenated
    /// UUID. Ids are never generated here.
    pub fn instance(&self, id: &str) -> Result<InstanceSettings> {
        let id = InstanceId::parse(id)?;
        debug!(app = %self.shared.app, instance = %id, "Initialized instance settings");
        Ok(InstanceSettings::new(Arc::clone(&self.shared), id))
    }
}
