//! Per-instance settings.
//!
//! An [`InstanceSettings`] handle is a view of `instances[id]` inside the
//! owning application's document. It shares the path and defaults of the
//! [`SettingsFile`](crate::SettingsFile) it came from and re-reads the file
//! on every call.

use crate::document::Settings;
use crate::error::{Result, SettingsError};
use crate::settings::Shared;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Length of a hyphenated UUID string
const HYPHENATED_LEN: usize = 36;

/// A validated instance id.
///
/// Accepts the hyphenated `8-4-4-4-12` hex form in any letter case. The
/// string is kept exactly as supplied, since it is the key in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    /// Validate `id`, failing if it is empty or not a hyphenated UUID.
    pub fn parse(id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(SettingsError::MissingInstanceId);
        }
        if !is_uuid(id) {
            return Err(SettingsError::InvalidInstanceId { id: id.to_string() });
        }
        Ok(InstanceId(id.to_string()))
    }

    /// The id as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check whether `s` is a hyphenated UUID.
pub fn is_uuid(s: &str) -> bool {
    // The length check rules out the simple, braced and urn forms
    s.len() == HYPHENATED_LEN && Uuid::try_parse(s).is_ok()
}

/// Settings for one instance of an application.
#[derive(Debug, Clone)]
pub struct InstanceSettings {
    shared: Arc<Shared>,
    id: InstanceId,
}

impl InstanceSettings {
    pub(crate) fn new(shared: Arc<Shared>, id: InstanceId) -> Self {
        InstanceSettings { shared, id }
    }

    /// Get the instance id.
    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    /// Instance settings: the stored entry laid over the instance defaults.
    pub fn get(&self) -> Result<Settings> {
        let doc = self.shared.store.load()?;
        Ok(doc.instance_with(self.id.as_str(), &self.shared.options.instance_defaults))
    }

    /// Async counterpart of [`get`](Self::get).
    pub async fn get_async(&self) -> Result<Settings> {
        let doc = self.shared.store.load_async().await?;
        Ok(doc.instance_with(self.id.as_str(), &self.shared.options.instance_defaults))
    }

    /// Replace this instance's stored entry with `content`.
    pub fn save(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load()?;
        doc.save_instance(self.id.as_str(), content);
        self.shared.store.store(&doc)
    }

    /// Async counterpart of [`save`](Self::save).
    pub async fn save_async(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load_async().await?;
        doc.save_instance(self.id.as_str(), content);
        self.shared.store.store_async(&doc).await
    }

    /// Merge `content` into this instance's stored entry.
    pub fn set(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load()?;
        doc.merge_instance(self.id.as_str(), content);
        self.shared.store.store(&doc)
    }

    /// Async counterpart of [`set`](Self::set).
    pub async fn set_async(&self, content: Settings) -> Result<()> {
        let mut doc = self.shared.store.load_async().await?;
        doc.merge_instance(self.id.as_str(), content);
        self.shared.store.store_async(&doc).await
    }

    /// Remove this instance's entry. Returns whether an entry was removed.
    ///
    /// When there is no entry the file is not written at all.
    pub fn delete(&self) -> Result<bool> {
        let mut doc = self.shared.store.load()?;
        if !doc.remove_instance(self.id.as_str()) {
            debug!(app = %self.shared.app, instance = %self.id, "No stored instance, nothing to delete");
            return Ok(false);
        }
        self.shared.store.store(&doc)?;
        Ok(true)
    }

    /// Async counterpart of [`delete`](Self::delete).
    pub async fn delete_async(&self) -> Result<bool> {
        let mut doc = self.shared.store.load_async().await?;
        if !doc.remove_instance(self.id.as_str()) {
            debug!(app = %self.shared.app, instance = %self.id, "No stored instance, nothing to delete");
            return Ok(false);
        }
        self.shared.store.store_async(&doc).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Options, SettingsFile};
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    const ID: &str = "11111111-1111-1111-1111-111111111111";
    const OTHER: &str = "22222222-2222-2222-2222-222222222222";

    fn obj(value: Value) -> Settings {
        match value {
            Value::Object(map) => map,
            _ => panic!("test settings must be an object"),
        }
    }

    fn open(temp_dir: &TempDir, instance_defaults: Value) -> SettingsFile {
        let options = Options::new()
            .with_data_dir(temp_dir.path())
            .with_instance_defaults(obj(instance_defaults));
        SettingsFile::with_options("demo", options).unwrap()
    }

    fn file_json(settings: &SettingsFile) -> Value {
        serde_json::from_slice(&fs::read(settings.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid(ID));
        assert!(is_uuid("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11"));
        assert!(is_uuid("A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11"));

        assert!(!is_uuid(""));
        assert!(!is_uuid("a0eebc999c0b4ef8bb6d6bb9bd380a11"));
        assert!(!is_uuid("{a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11}"));
        assert!(!is_uuid("urn:uuid:a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11"));
        assert!(!is_uuid("g0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11"));
        assert!(!is_uuid("a0eebc99-9c0b4-ef8-bb6d-6bb9bd380a11"));
    }

    #[test]
    fn test_id_kept_as_supplied() {
        let id = InstanceId::parse("A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11").unwrap();
        assert_eq!(id.as_str(), "A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11");
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_get_never_saved() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({"x": 0}));

        let instance = settings.instance(ID).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"x": 0}));
        assert!(!settings.exists());
    }

    #[test]
    fn test_instance_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({"x": 0}));
        let instance = settings.instance(ID).unwrap();

        instance.set(obj(json!({"y": 1}))).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"x": 0, "y": 1}));

        assert!(instance.delete().unwrap());
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"x": 0}));
        assert_eq!(file_json(&settings), json!({"global": {}, "instances": {}}));
        assert!(!instance.delete().unwrap());
    }

    #[test]
    fn test_stored_value_wins_over_default() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({"x": 0, "k": 1}));
        let instance = settings.instance(ID).unwrap();

        instance.save(obj(json!({"x": 5}))).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"k": 1, "x": 5}));
        assert_eq!(file_json(&settings)["instances"][ID], json!({"x": 5}));
    }

    #[test]
    fn test_null_entry_reads_as_defaults_and_accepts_set() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({"x": 0}));
        fs::write(
            settings.path(),
            json!({"global": {}, "instances": {ID: null}}).to_string(),
        )
        .unwrap();

        let instance = settings.instance(ID).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"x": 0}));

        instance.set(obj(json!({"y": 1}))).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"x": 0, "y": 1}));
        assert_eq!(
            file_json(&settings),
            json!({"global": {}, "instances": {ID: {"y": 1}}})
        );
    }

    #[test]
    fn test_save_overwrites_and_set_merges() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({}));
        let instance = settings.instance(ID).unwrap();

        instance.save(obj(json!({"a": 1, "b": 1}))).unwrap();
        instance.set(obj(json!({"b": 2}))).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"a": 1, "b": 2}));

        instance.save(obj(json!({"c": 3}))).unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"c": 3}));
    }

    #[test]
    fn test_instances_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({}));
        settings.set(obj(json!({"g": true}))).unwrap();

        settings.instance(ID).unwrap().set(obj(json!({"n": 1}))).unwrap();
        settings.instance(OTHER).unwrap().set(obj(json!({"n": 2}))).unwrap();
        settings.instance(OTHER).unwrap().delete().unwrap();

        assert_eq!(
            file_json(&settings),
            json!({"global": {"g": true}, "instances": {ID: {"n": 1}}})
        );
        assert_eq!(Value::Object(settings.get().unwrap()), json!({"g": true}));
    }

    #[test]
    fn test_delete_missing_instance_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({}));

        // Never-saved app: no file appears
        assert!(!settings.instance(ID).unwrap().delete().unwrap());
        assert!(!settings.exists());

        // Existing app: the compact hand-written file keeps its exact bytes,
        // which any write would have reformatted
        let compact = r#"{"global":{"test":"test"},"instances":{}}"#;
        fs::write(settings.path(), compact).unwrap();
        assert!(!settings.instance(ID).unwrap().delete().unwrap());
        assert_eq!(fs::read_to_string(settings.path()).unwrap(), compact);
    }

    #[test]
    fn test_instance_deleted_with_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({"x": 0}));
        let instance = settings.instance(ID).unwrap();

        instance.save(obj(json!({"x": 5}))).unwrap();
        settings.delete().unwrap();
        assert_eq!(Value::Object(instance.get().unwrap()), json!({"x": 0}));
    }

    #[tokio::test]
    async fn test_async_instance_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({"x": 0}));
        let instance = settings.instance(ID).unwrap();

        instance.set_async(obj(json!({"y": 1}))).await.unwrap();
        assert_eq!(
            Value::Object(instance.get_async().await.unwrap()),
            json!({"x": 0, "y": 1})
        );

        instance.save_async(obj(json!({"z": 2}))).await.unwrap();
        assert_eq!(
            Value::Object(instance.get_async().await.unwrap()),
            json!({"x": 0, "z": 2})
        );

        assert!(instance.delete_async().await.unwrap());
        assert_eq!(
            Value::Object(instance.get_async().await.unwrap()),
            json!({"x": 0})
        );
    }

    #[tokio::test]
    async fn test_async_delete_missing_instance_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({}));

        assert!(!settings.instance(ID).unwrap().delete_async().await.unwrap());
        assert!(!settings.exists());

        let compact = r#"{"global":{},"instances":{}}"#;
        fs::write(settings.path(), compact).unwrap();
        assert!(!settings.instance(ID).unwrap().delete_async().await.unwrap());
        assert_eq!(fs::read_to_string(settings.path()).unwrap(), compact);
    }

    #[tokio::test]
    async fn test_handle_moves_into_task() {
        let temp_dir = TempDir::new().unwrap();
        let settings = open(&temp_dir, json!({}));
        let instance = settings.instance(ID).unwrap();

        tokio::spawn(async move { instance.set_async(obj(json!({"from": "task"}))).await })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(settings.instance_ids().unwrap(), vec![ID.to_string()]);
    }
}
