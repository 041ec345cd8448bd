//! # Prefstore Core Library
//!
//! This crate stores one JSON settings document per named application on
//! local disk. Each document has a "global" scope and any number of
//! UUID-keyed "instance" scopes, each of which can be read, replaced, merged
//! into and deleted independently. Optional defaults are laid under the
//! stored values when reading and are never written out.
//!
//! ## Architecture
//!
//! - **Document** (`document`): The in-memory document and its merge rules
//! - **Store** (`store`): Loading and atomically persisting a document
//! - **Settings** (`settings`): Global scope access for one application
//! - **Instance** (`instance`): Per-instance scope access
//! - **Paths** (`paths`): Settings file locations
//! - **Config** (`config`): Construction options and CLI configuration
//!
//! Every operation comes in a blocking form and an async form
//! (`get`/`get_async`, `set`/`set_async`, ...) with identical results on
//! disk.
//!
//! ## Example
//!
//! ```rust,ignore
//! use prefstore_core::{parse_settings, Options, SettingsFile};
//!
//! let settings = SettingsFile::with_options(
//!     "demo",
//!     Options::new().with_global_defaults(parse_settings(r#"{"theme": "light"}"#)?),
//! )?;
//!
//! settings.set(parse_settings(r#"{"font_size": 14}"#)?)?;
//! let current = settings.get()?; // {"theme": "light", "font_size": 14}
//!
//! let window = settings.instance("11111111-1111-1111-1111-111111111111")?;
//! window.save(parse_settings(r#"{"width": 800}"#)?)?;
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod instance;
pub mod paths;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use config::{AppDefaults, Config, Format, Options};
pub use document::{parse_settings, Document, Settings};
pub use error::{Result, SettingsError};
pub use instance::{InstanceId, InstanceSettings};
pub use settings::SettingsFile;
pub use store::DocumentStore;
