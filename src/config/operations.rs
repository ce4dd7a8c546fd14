//! Config loading, serialization and validation.

use super::model::{Bindings, Config};
use super::types::{BINDING_NAME_REGEX, RESERVED_WORDS};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| Error::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - binding names must be identifiers and not reserved words
    /// - the two binding names must differ
    /// - `max_nesting` must be positive
    pub fn validate(&self) -> Result<()> {
        self.bindings.validate()?;

        if self.max_nesting == 0 {
            return Err(Error::UserError(
                "config validation failed: max_nesting must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Bindings {
    /// Validate both binding names.
    pub fn validate(&self) -> Result<()> {
        for (field, name) in [("filters", &self.filters), ("env", &self.env)] {
            if !BINDING_NAME_REGEX.is_match(name) {
                return Err(Error::UserError(format!(
                    "config validation failed: bindings.{} must be an identifier (found '{}')",
                    field, name
                )));
            }
            if RESERVED_WORDS.contains(&name.as_str()) {
                return Err(Error::UserError(format!(
                    "config validation failed: bindings.{} cannot be the reserved word '{}'",
                    field, name
                )));
            }
        }

        if self.filters == self.env {
            return Err(Error::UserError(format!(
                "config validation failed: bindings.filters and bindings.env are both '{}'",
                self.filters
            )));
        }

        Ok(())
    }
}
