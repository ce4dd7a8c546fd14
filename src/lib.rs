//! Minimal runtime for precompiled HTML templates.
//!
//! A template compiler (not part of this crate) turns template source into a
//! single expression that references two names: the filter library and the
//! environment. This crate evaluates such expressions:
//!
//! ```
//! use micro_html_template::{render, Value};
//!
//! let env = Value::object([("name", "Tom & Jerry"), ("q", "cats (all)")]);
//! let compiled = "'<a href=\"/s?q=' + r.uri(e.q) + '\">' + r.html(e.name) + '</a>'";
//!
//! assert_eq!(
//!     render(compiled, &env).unwrap(),
//!     "<a href=\"/s?q=cats%20%28all%29\">Tom &amp; Jerry</a>"
//! );
//! ```
//!
//! The filter library is [`filters`] (`id`, `html`, `uri`); evaluation lives
//! in [`eval`]; [`Runtime`] ties both together under configurable binding
//! names.

pub mod config;
pub mod error;
pub mod eval;
pub mod exit_codes;
pub mod filters;
pub mod runtime;
pub mod value;

pub use config::Config;
pub use error::{Error, Result};
pub use eval::Expr;
pub use filters::{FILTERS, Filter, Filters};
pub use runtime::{MicroHtmlTemplate, Runtime, microHtmlTemplate};
pub use value::Value;

/// Render a compiled template with the default bindings (`r`, `e`).
///
/// Shorthand for [`Runtime::new`] followed by [`Runtime::render`].
pub fn render(compiled_template: &str, env: &Value) -> Result<String> {
    Runtime::new().render(compiled_template, env)
}

/// The filter library every runtime binds.
pub fn filters() -> &'static Filters {
    &FILTERS
}
