//! The in-memory settings document and its merge rules.
//!
//! A document is the whole on-disk unit for one application:
//!
//! ```json
//! {
//!   "global": { "theme": "dark" },
//!   "instances": {
//!     "11111111-1111-1111-1111-111111111111": { "port": 8080 }
//!   }
//! }
//! ```
//!
//! Everything here is pure. Loading and persisting live in
//! [`store`](crate::store).

use crate::config::Format;
use crate::error::{Result, SettingsError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// A bag of arbitrary settings keys.
pub type Settings = Map<String, Value>;

/// The full settings document for one application.
///
/// Both scopes are always present once decoded; a missing or `null` field
/// is read as an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// App-wide settings
    #[serde(default, deserialize_with = "null_as_default")]
    pub global: Settings,

    /// Per-instance settings keyed by instance id
    #[serde(default, deserialize_with = "instances_without_nulls")]
    pub instances: BTreeMap<String, Settings>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `null` instance entry counts as no entry at all.
fn instances_without_nulls<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Settings>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: BTreeMap<String, Option<Settings>> = null_as_default(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|(id, settings)| settings.map(|s| (id, s)))
        .collect())
}

impl Document {
    /// Decode a document read from `path`.
    pub fn from_slice(bytes: &[u8], path: &Path) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| SettingsError::Corrupted {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Encode the document using the given output format.
    pub fn to_vec(&self, format: &Format) -> Result<Vec<u8>> {
        let indent = vec![b' '; format.indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)
            .map_err(|e| SettingsError::serialization(e.to_string()))?;
        out.push(b'\n');
        Ok(out)
    }

    /// Global settings with `defaults` underneath.
    pub fn global_with(&self, defaults: &Settings) -> Settings {
        overlay(defaults, &self.global)
    }

    /// Instance settings with `defaults` underneath. An instance with no
    /// stored entry yields just the defaults.
    pub fn instance_with(&self, id: &str, defaults: &Settings) -> Settings {
        match self.instances.get(id) {
            Some(stored) => overlay(defaults, stored),
            None => defaults.clone(),
        }
    }

    /// Replace the global scope wholesale.
    pub fn save_global(&mut self, content: Settings) {
        self.global = content;
    }

    /// Shallow-merge `content` into the global scope.
    pub fn merge_global(&mut self, content: Settings) {
        merge_into(&mut self.global, content);
    }

    /// Replace one instance entry wholesale.
    pub fn save_instance(&mut self, id: &str, content: Settings) {
        self.instances.insert(id.to_string(), content);
    }

    /// Shallow-merge `content` into one instance entry, creating it if needed.
    pub fn merge_instance(&mut self, id: &str, content: Settings) {
        let entry = self.instances.entry(id.to_string()).or_default();
        merge_into(entry, content);
    }

    /// Drop one instance entry. Returns whether anything was removed.
    pub fn remove_instance(&mut self, id: &str) -> bool {
        self.instances.remove(id).is_some()
    }

    /// Ids of all instances with a stored entry.
    pub fn instance_ids(&self) -> Vec<String> {
        self.instances.keys().cloned().collect()
    }
}

/// Return `base` with every key of `top` laid over it.
///
/// Keys present in both take the value from `top`. The merge is shallow:
/// nested objects are replaced, never combined.
pub fn overlay(base: &Settings, top: &Settings) -> Settings {
    let mut merged = base.clone();
    merged.extend(top.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Shallow-merge `content` into `target` in place.
pub fn merge_into(target: &mut Settings, content: Settings) {
    target.extend(content);
}

/// Parse JSON text that must hold an object into a settings bag.
pub fn parse_settings(text: &str) -> Result<Settings> {
    let value: Value = serde_json::from_str(text).map_err(|e| SettingsError::InvalidContent {
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(SettingsError::InvalidContent {
            reason: format!("expected an object, found {}", json_type_name(&other)),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
