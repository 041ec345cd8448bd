//! Persistence of settings documents.
//!
//! A [`DocumentStore`] owns one file path and knows how to turn it into a
//! [`Document`] and back. Each call opens and closes the file; nothing is
//! cached between calls.
//!
//! - Missing files read as an empty document.
//! - Writes are atomic: the encoded document goes to a temporary file next to
//!   the target, which is then renamed over it. A failed write never leaves a
//!   truncated settings file behind.
//! - Removing a missing file succeeds.
//!
//! Every operation exists in a blocking form and an async form built on
//! `tokio::fs`. Both read and write the same bytes and classify errors the
//! same way.

use crate::config::Format;
use crate::document::Document;
use crate::error::{Result, SettingsError};
use crate::paths;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Loads and persists the settings document stored at one path.
///
/// ## Example
///
/// ```rust,ignore
/// use prefstore_core::{Document, DocumentStore, Format};
///
/// let store = DocumentStore::new("/tmp/settings/demo.json", Format::default());
///
/// let mut doc = store.load()?;
/// doc.global.insert("theme".into(), "dark".into());
/// store.store(&doc)?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    /// The settings file
    path: PathBuf,

    /// Output format for writes
    format: Format,
}

impl DocumentStore {
    /// Create a store for the file at `path`.
    pub fn new(path: impl Into<PathBuf>, format: Format) -> Self {
        DocumentStore {
            path: path.into(),
            format,
        }
    }

    /// Get the path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the settings file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Temporary file a write goes to before being renamed into place.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
    }

    /// Load the document, or an empty one if the file does not exist.
    pub fn load(&self) -> Result<Document> {
        match fs::read(&self.path) {
            Ok(bytes) => self.decode(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file not found, using empty document");
                Ok(Document::default())
            }
            Err(e) => Err(SettingsError::io("read", &self.path, e)),
        }
    }

    /// Async counterpart of [`load`](Self::load).
    pub async fn load_async(&self) -> Result<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => self.decode(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file not found, using empty document");
                Ok(Document::default())
            }
            Err(e) => Err(SettingsError::io("read", &self.path, e)),
        }
    }

    /// Persist `doc`, replacing the file atomically.
    pub fn store(&self, doc: &Document) -> Result<()> {
        let bytes = doc.to_vec(&self.format)?;
        paths::ensure_parent_dir(&self.path)?;

        let temp_path = self.temp_path();
        let written = write_file_sync(&temp_path, &bytes)
            .map_err(|e| SettingsError::io("write", &temp_path, e))
            .and_then(|()| {
                fs::rename(&temp_path, &self.path)
                    .map_err(|e| SettingsError::io("rename", &self.path, e))
            });

        if written.is_err() {
            if let Err(e) = fs::remove_file(&temp_path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %e, "Failed to clean up temp file");
                }
            }
        }
        written?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Settings saved");
        Ok(())
    }

    /// Async counterpart of [`store`](Self::store).
    pub async fn store_async(&self, doc: &Document) -> Result<()> {
        let bytes = doc.to_vec(&self.format)?;
        paths::ensure_parent_dir_async(&self.path).await?;

        let temp_path = self.temp_path();
        let written = match write_file_async(&temp_path, &bytes).await {
            Ok(()) => tokio::fs::rename(&temp_path, &self.path)
                .await
                .map_err(|e| SettingsError::io("rename", &self.path, e)),
            Err(e) => Err(SettingsError::io("write", &temp_path, e)),
        };

        if written.is_err() {
            if let Err(e) = tokio::fs::remove_file(&temp_path).await {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %e, "Failed to clean up temp file");
                }
            }
        }
        written?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Settings saved");
        Ok(())
    }

    /// Delete the settings file. A missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Settings file removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file already absent");
                Ok(())
            }
            Err(e) => Err(SettingsError::io("remove", &self.path, e)),
        }
    }

    /// Async counterpart of [`remove`](Self::remove).
    pub async fn remove_async(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Settings file removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file already absent");
                Ok(())
            }
            Err(e) => Err(SettingsError::io("remove", &self.path, e)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let doc = Document::from_slice(bytes, &self.path)?;
        debug!(
            path = %self.path.display(),
            instances = doc.instances.len(),
            "Settings loaded"
        );
        Ok(doc)
    }
}

fn write_file_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

async fn write_file_async(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
