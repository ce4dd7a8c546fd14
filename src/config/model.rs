//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for the template runtime.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Names visible to compiled expressions.
    #[serde(default)]
    pub bindings: Bindings,

    /// Deepest expression nesting the parser accepts.
    #[serde(default = "default_max_nesting")]
    pub max_nesting: usize,
}

/// The two names a compiled expression can reference.
///
/// Compiled artifacts refer to the filter library as `r` and the
/// environment as `e`; a compiler emitting other names needs these changed
/// to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    /// Name of the filter library (default: "r").
    #[serde(default = "default_filters_binding")]
    pub filters: String,

    /// Name of the environment (default: "e").
    #[serde(default = "default_env_binding")]
    pub env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bindings: Bindings::default(),
            max_nesting: default_max_nesting(),
        }
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            filters: default_filters_binding(),
            env: default_env_binding(),
        }
    }
}
