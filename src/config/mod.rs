//! Runtime configuration.
//!
//! This module defines the Config struct, usually loaded from a YAML file
//! such as `mht.yaml`. It supports forward-compatible parsing (unknown
//! fields are ignored), defaults for every field, and validation.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::{Bindings, Config};
