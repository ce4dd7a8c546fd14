//! The runtime unit compiled templates are rendered through.

use crate::config::Config;
use crate::error::Result;
use crate::eval::{self, Expr};
use crate::filters::{FILTERS, Filters};
use crate::value::Value;
use std::borrow::Cow;
use tracing::debug;

/// Filter library plus evaluator, configured with the binding names
/// compiled templates expect.
///
/// A `Runtime` holds no per-render state; one instance can serve any number
/// of renders, from any number of threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Runtime {
    config: Config,
}

impl Runtime {
    /// A runtime with the default bindings (`r` for filters, `e` for env).
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime using `config`, after validating it.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The filter library bound into every render.
    pub fn filters(&self) -> &'static Filters {
        &FILTERS
    }

    /// Render a compiled template against `env`.
    ///
    /// The expression is parsed afresh on every call. Any syntax, reference
    /// or type error is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use micro_html_template::{Runtime, Value};
    ///
    /// let runtime = Runtime::new();
    /// let env = Value::object([("name", "<b>")]);
    /// assert_eq!(runtime.render("r.html(e.name)", &env).unwrap(), "&lt;b&gt;");
    /// ```
    pub fn render(&self, compiled_template: &str, env: &Value) -> Result<String> {
        debug!(bytes = compiled_template.len(), "rendering compiled template");
        let expr = eval::parse_with_limit(compiled_template, self.config.max_nesting)
            .inspect_err(|e| debug!(error = %e, "compiled template failed to parse"))?;
        self.render_expr(&expr, env)
    }

    /// Render a pre-parsed template tree against `env`.
    ///
    /// A string result is returned as-is; any other value is coerced to its
    /// string form.
    pub fn render_expr(&self, expr: &Expr, env: &Value) -> Result<String> {
        let value = self
            .evaluate(expr, env)
            .inspect_err(|e| debug!(error = %e, "compiled template failed to evaluate"))?;
        Ok(match value {
            Cow::Owned(Value::String(s)) => s,
            other => other.coerce_string().into_owned(),
        })
    }

    /// Evaluate a tree without coercing the result.
    pub fn evaluate<'env>(&self, expr: &Expr, env: &'env Value) -> Result<Cow<'env, Value>> {
        eval::evaluate(expr, &self.config.bindings, env)
    }
}

/// Historical name of the runtime unit.
pub type MicroHtmlTemplate = Runtime;

/// Lower-camel spelling of [`MicroHtmlTemplate`], kept for artifacts that
/// look the runtime up under that name.
#[allow(non_camel_case_types)]
pub type microHtmlTemplate = Runtime;
