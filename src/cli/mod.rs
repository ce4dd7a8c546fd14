//! CLI argument parsing for mht.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mht: render precompiled HTML templates from the command line.
///
/// A compiled template is a single expression referencing the filter
/// library (`r`) and the environment (`e`), for example
/// `'<p>' + r.html(e.name) + '</p>'`.
#[derive(Parser, Debug)]
#[command(name = "mht")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log evaluation details to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for mht.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a compiled template.
    ///
    /// Reads the compiled expression from a file (or stdin with `-`),
    /// evaluates it against the environment and prints the result.
    Render(RenderArgs),

    /// Apply a single filter to a string.
    Filter(FilterArgs),

    /// List the available filters.
    Filters,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// File holding the compiled template, or `-` for stdin.
    pub template: PathBuf,

    /// Environment file: JSON, or YAML when it ends in .yaml/.yml.
    #[arg(short, long)]
    pub env: Option<PathBuf>,

    /// Environment given inline as JSON.
    #[arg(long, conflicts_with = "env")]
    pub env_json: Option<String>,

    /// Runtime config file (YAML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treat the template as a JSON expression tree instead of expression text.
    #[arg(long)]
    pub ast: bool,
}

/// Arguments for the `filter` command.
#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Filter name (id, html, uri).
    pub name: String,

    /// Input string.
    pub value: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
