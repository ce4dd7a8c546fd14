//! Tree-walking evaluation of compiled expressions.
//!
//! Exactly two names resolve inside an expression: the filter library and
//! the environment, under the names given by [`Bindings`]. Any other
//! identifier is a reference error.

use super::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use crate::config::Bindings;
use crate::error::{Error, Result};
use crate::value::{Lookup, Value};
use std::borrow::Cow;
use std::cell::Cell;
use std::cmp::Ordering;

/// Evaluate `expr` with the filter library and `env` bound.
///
/// Values read out of `env` are borrowed, not copied, until an operator or
/// filter produces a new value.
pub fn evaluate<'env>(
    expr: &Expr,
    bindings: &Bindings,
    env: &'env Value,
) -> Result<Cow<'env, Value>> {
    Interpreter {
        bindings,
        env,
        depth: Cell::new(0),
    }
    .eval(expr)
}

/// Bound on recursive evaluation (operands that are not on a left spine).
/// Trees from [`parse`](super::parse) under the default nesting limit stay
/// well below it.
pub const MAX_EVAL_DEPTH: usize = 512;

/// A step on the left spine of an expression, applied to the value of
/// everything to its left.
enum Link<'a> {
    Member(&'a str),
    Index(&'a Expr),
    Call(&'a Expr, &'a [Expr]),
    Binary(BinaryOp, &'a Expr),
    Logical(LogicalOp, &'a Expr),
}

struct Interpreter<'b, 'env> {
    bindings: &'b Bindings,
    env: &'env Value,
    depth: Cell<usize>,
}

impl<'env> Interpreter<'_, 'env> {
    fn eval(&self, expr: &Expr) -> Result<Cow<'env, Value>> {
        let depth = self.depth.get();
        if depth >= MAX_EVAL_DEPTH {
            return Err(Error::Range("Maximum call stack size exceeded".to_string()));
        }
        self.depth.set(depth + 1);
        let result = self.eval_spine(expr);
        self.depth.set(depth);
        result
    }

    /// Left-deep chains (`a + b + c`, `e.a.b`, `r.html(x)`) are walked down
    /// to their innermost operand, then folded back up in a loop.
    fn eval_spine(&self, expr: &Expr) -> Result<Cow<'env, Value>> {
        let mut links = Vec::new();
        let mut node = expr;
        let mut value = loop {
            match node {
                Expr::Member { object, property } => {
                    links.push(Link::Member(property));
                    node = object;
                }
                Expr::Index { object, index } => {
                    links.push(Link::Index(index));
                    node = object;
                }
                Expr::Call { callee, arguments } => {
                    links.push(Link::Call(callee, arguments));
                    node = callee;
                }
                Expr::Binary { op, left, right } => {
                    links.push(Link::Binary(*op, right));
                    node = left;
                }
                Expr::Logical { op, left, right } => {
                    links.push(Link::Logical(*op, right));
                    node = left;
                }
                Expr::Literal { value } => break Cow::Owned(value.to_value()),
                Expr::Identifier { name } => break self.resolve(name)?,
                Expr::Unary { op, operand } => break self.unary(*op, operand)?,
                Expr::Conditional {
                    test,
                    consequent,
                    alternate,
                } => {
                    break if self.eval(test)?.is_truthy() {
                        self.eval(consequent)?
                    } else {
                        self.eval(alternate)?
                    };
                }
            }
        };

        for link in links.into_iter().rev() {
            value = self.step(link, value)?;
        }
        Ok(value)
    }

    /// Apply one link to the already evaluated value on its left.
    fn step(&self, link: Link<'_>, left: Cow<'env, Value>) -> Result<Cow<'env, Value>> {
        match link {
            Link::Member(property) => member(left, property),
            Link::Index(index) => {
                let key = self.eval(index)?.coerce_string().into_owned();
                member(left, &key)
            }
            Link::Call(callee, arguments) => {
                let mut args = arguments
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                match &*left {
                    Value::Filter(filter) => {
                        let first = if args.is_empty() {
                            Cow::Owned(Value::Undefined)
                        } else {
                            args.swap_remove(0)
                        };
                        Ok(filter.call(first))
                    }
                    _ => Err(Error::Type(format!("{} is not a function", callee))),
                }
            }
            Link::Binary(op, right) => {
                let right = self.eval(right)?;
                match (op, left) {
                    // Append in place so long concatenations stay linear.
                    (BinaryOp::Add, Cow::Owned(Value::String(mut out))) => {
                        out.push_str(&right.to_primitive().coerce_string());
                        Ok(Cow::Owned(Value::String(out)))
                    }
                    (op, left) => Ok(Cow::Owned(binary(op, &left, &right))),
                }
            }
            Link::Logical(op, right) => {
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !matches!(*left, Value::Undefined | Value::Null),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
        }
    }

    fn resolve(&self, name: &str) -> Result<Cow<'env, Value>> {
        if name == self.bindings.filters {
            Ok(Cow::Owned(Value::Filters))
        } else if name == self.bindings.env {
            Ok(Cow::Borrowed(self.env))
        } else {
            Err(Error::Reference {
                name: name.to_string(),
            })
        }
    }

    fn unary(&self, op: UnaryOp, operand: &Expr) -> Result<Cow<'env, Value>> {
        // `typeof` of an unbound name is "undefined" rather than an error.
        if op == UnaryOp::Typeof {
            if let Expr::Identifier { name } = operand {
                if name != &self.bindings.filters && name != &self.bindings.env {
                    return Ok(Cow::Owned(Value::from("undefined")));
                }
            }
        }

        let value = self.eval(operand)?;
        let result = match op {
            UnaryOp::Not => Value::Bool(!value.is_truthy()),
            UnaryOp::Negate => Value::Number(-value.coerce_number()),
            UnaryOp::Plus => Value::Number(value.coerce_number()),
            UnaryOp::Typeof => Value::from(value.type_name()),
        };
        Ok(Cow::Owned(result))
    }
}

fn member<'a>(object: Cow<'a, Value>, key: &str) -> Result<Cow<'a, Value>> {
    match object {
        Cow::Borrowed(object) => Ok(match object.lookup(key)? {
            Lookup::Found(value) => Cow::Borrowed(value),
            Lookup::Computed(value) => Cow::Owned(value),
            Lookup::Missing => Cow::Owned(Value::Undefined),
        }),
        Cow::Owned(object) => Ok(Cow::Owned(match object.lookup(key)? {
            Lookup::Found(value) => value.clone(),
            Lookup::Computed(value) => value,
            Lookup::Missing => Value::Undefined,
        })),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => {
            let (left, right) = (left.to_primitive(), right.to_primitive());
            if matches!(*left, Value::String(_)) || matches!(*right, Value::String(_)) {
                let mut out = left.coerce_string().into_owned();
                out.push_str(&right.coerce_string());
                Value::String(out)
            } else {
                Value::Number(left.coerce_number() + right.coerce_number())
            }
        }
        BinaryOp::Sub => Value::Number(left.coerce_number() - right.coerce_number()),
        BinaryOp::Mul => Value::Number(left.coerce_number() * right.coerce_number()),
        BinaryOp::Div => Value::Number(left.coerce_number() / right.coerce_number()),
        BinaryOp::Rem => Value::Number(left.coerce_number() % right.coerce_number()),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Eq => Value::Bool(left.loose_equals(right)),
        BinaryOp::NotEq => Value::Bool(!left.loose_equals(right)),
        BinaryOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_equals(right)),
    }
}

/// Strings compare by UTF-16 code units; anything else numerically.
/// `None` when either side is NaN.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let (left, right) = (left.to_primitive(), right.to_primitive());
    match (&*left, &*right) {
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => left.coerce_number().partial_cmp(&right.coerce_number()),
    }
}
