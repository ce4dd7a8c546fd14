//! Configuration defaults and constants.

use regex::Regex;
use std::sync::LazyLock;

/// Default name under which the filter library is bound.
pub const DEFAULT_FILTERS_BINDING: &str = "r";

/// Default name under which the environment is bound.
pub const DEFAULT_ENV_BINDING: &str = "e";

/// Default bound on expression nesting depth.
///
/// Each level costs a dozen parser frames, so this stays small enough for a
/// 2 MiB thread stack.
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Words that parse as literals or operators and so cannot name a binding.
pub const RESERVED_WORDS: [&str; 5] = ["true", "false", "null", "undefined", "typeof"];

pub(crate) static BINDING_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid binding name regex")
});

// Default value functions for serde
pub(crate) fn default_filters_binding() -> String {
    DEFAULT_FILTERS_BINDING.to_string()
}
pub(crate) fn default_env_binding() -> String {
    DEFAULT_ENV_BINDING.to_string()
}
pub(crate) fn default_max_nesting() -> usize {
    DEFAULT_MAX_NESTING
}
