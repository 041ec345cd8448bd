//! Settings file locations.

use crate::error::{Result, SettingsError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Extension of every settings file
pub const SETTINGS_EXTENSION: &str = "json";

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "prefstore").ok_or(SettingsError::DataDirUnavailable)
}

/// Get the per-user directory settings files are kept in.
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Check that `app` can name a file inside the data directory.
pub fn validate_app_name(app: &str) -> Result<()> {
    if app.is_empty() {
        return Err(SettingsError::EmptyAppName);
    }

    let invalid = |reason: &str| SettingsError::InvalidAppName {
        name: app.to_string(),
        reason: reason.to_string(),
    };

    if app.contains(['/', '\\']) {
        return Err(invalid("must not contain path separators"));
    }

    let mut components = Path::new(app).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("must be a plain file name")),
    }
}

/// Path of the settings file for `app` inside `data_dir`.
pub fn settings_path(data_dir: &Path, app: &str) -> PathBuf {
    data_dir.join(format!("{app}.{SETTINGS_EXTENSION}"))
}

/// Make sure the directory containing `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SettingsError::io("create directory", parent, e))?;
    }
    Ok(())
}

/// Async counterpart of [`ensure_parent_dir`].
pub async fn ensure_parent_dir_async(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SettingsError::io("create directory", parent, e))?;
    }
    Ok(())
}
