//! Command implementations.

pub mod delete;
pub mod get;
pub mod instances;
pub mod path;
pub mod save;
pub mod set;
