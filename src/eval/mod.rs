//! Evaluation of compiled template expressions.
//!
//! This module provides:
//!
//! - **Parser**: turns compiled expression text into an [`Expr`] tree
//! - **Interpreter**: walks a tree with exactly two names bound, the filter
//!   library and the environment
//!
//! # Expression language
//!
//! Compiled templates are single expressions such as
//!
//! ```text
//! '<a href="/u/' + r.uri(e.user) + '">' + r.html(e.name) + '</a>'
//! ```
//!
//! Supported: string and number literals, `true false null undefined`,
//! member access (`a.b`, `a[k]`), calls, unary `! - + typeof`, arithmetic,
//! comparison and equality operators, `&& || ??` and `?:`.
//!
//! Parsing happens on every [`render`](crate::render) call. Callers that
//! render the same template repeatedly can keep the [`Expr`] from [`parse`]
//! and pass it to [`evaluate`] themselves.

pub mod ast;
mod interpreter;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

pub use ast::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp};
pub use interpreter::{MAX_EVAL_DEPTH, evaluate};
pub use parser::{parse, parse_with_limit};
