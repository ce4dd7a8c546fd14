//! Command implementations for mht.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Output goes to the writer passed in so commands can be
//! exercised without a terminal.

#[cfg(test)]
mod tests;

use crate::cli::{Command, FilterArgs, RenderArgs};
use anyhow::{Context, Result};
use micro_html_template::{Config, Error, Expr, FILTERS, Runtime, Value};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Render(args) => cmd_render(args, out),
        Command::Filter(args) => cmd_filter(args, out),
        Command::Filters => cmd_filters(out),
    }
}

fn cmd_render(args: RenderArgs, out: &mut dyn Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let runtime = Runtime::with_config(config)?;
    let env = load_env(args.env.as_deref(), args.env_json.as_deref())?;
    let source = read_template(&args.template)?;

    let rendered = if args.ast {
        let expr = Expr::from_json(&source).map_err(|e| {
            Error::UserError(format!(
                "invalid expression tree in '{}': {}",
                args.template.display(),
                e
            ))
        })?;
        runtime.render_expr(&expr, &env)?
    } else {
        runtime.render(&source, &env)?
    };

    debug!(bytes = rendered.len(), "rendered template");
    writeln!(out, "{}", rendered)?;
    Ok(())
}

fn cmd_filter(args: FilterArgs, out: &mut dyn Write) -> Result<()> {
    let filter = FILTERS.get(&args.name).ok_or_else(|| {
        Error::UserError(format!(
            "unknown filter '{}' (available: {})",
            args.name,
            FILTERS.names().join(", ")
        ))
    })?;
    let result = filter.apply(Value::from(args.value));
    writeln!(out, "{}", result)?;
    Ok(())
}

fn cmd_filters(out: &mut dyn Write) -> Result<()> {
    for filter in FILTERS.iter() {
        writeln!(out, "{}", filter)?;
    }
    Ok(())
}

fn read_template(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read template from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template '{}'", path.display()))
}

/// Load the render environment; an absent environment is an empty object.
fn load_env(path: Option<&Path>, inline: Option<&str>) -> Result<Value> {
    if let Some(json) = inline {
        return serde_json::from_str(json).context("invalid --env-json");
    }
    let Some(path) = path else {
        return Ok(Value::Object(BTreeMap::new()));
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read environment '{}'", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML environment '{}'", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON environment '{}'", path.display()))
    }
}
