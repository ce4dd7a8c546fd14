//! Expression tree for compiled templates.
//!
//! Trees come from [`parse`](super::parse) or can be deserialized directly
//! (JSON, YAML) when a compiler emits them pre-parsed.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// A compiled template expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: Literal,
    },
    /// A reference to one of the two bindings.
    Identifier {
        name: String,
    },
    /// `object.property`
    Member {
        object: Box<Expr>,
        property: String,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        arguments: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuiting operators; they yield one of their operands.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    Typeof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: Literal::String(value.into()),
        }
    }

    pub fn number(value: f64) -> Self {
        Expr::Literal {
            value: Literal::Number(value),
        }
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Deserialize a tree from JSON.
    ///
    /// A concatenation of `n` parts is a left spine `n` levels deep, so
    /// serde_json's recursion limit is lifted and the stack grows on demand.
    pub fn from_json(json: &str) -> serde_json::Result<Expr> {
        let mut json_de = serde_json::Deserializer::from_str(json);
        json_de.disable_recursion_limit();
        let expr = Expr::deserialize(serde_stacker::Deserializer::new(&mut json_de))?;
        json_de.end()?;
        Ok(expr)
    }

    /// Move boxed children into `out`, leaving placeholders behind.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Literal { .. } | Expr::Identifier { .. } => {}
            Expr::Member { object, .. } => out.push(take(object)),
            Expr::Index { object, index } => {
                out.push(take(object));
                out.push(take(index));
            }
            Expr::Call { callee, arguments } => {
                out.push(take(callee));
                out.append(arguments);
            }
            Expr::Unary { operand, .. } => out.push(take(operand)),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                out.push(take(left));
                out.push(take(right));
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                out.push(take(test));
                out.push(take(consequent));
                out.push(take(alternate));
            }
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Expr::Literal { .. } | Expr::Identifier { .. })
    }
}

fn take(expr: &mut Box<Expr>) -> Expr {
    mem::replace(
        &mut **expr,
        Expr::Literal {
            value: Literal::Undefined,
        },
    )
}

// Dropping a long left spine recursively would overflow the stack.
impl Drop for Expr {
    fn drop(&mut self) {
        if self.is_leaf() {
            return;
        }
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Undefined => Value::Undefined,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Typeof => "typeof ",
        }
    }
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
        }
    }
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

enum Piece<'a> {
    Expr(&'a Expr),
    Text(&'a str),
}

/// Source-like rendering, used in error messages ("e.name is not a function").
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pieces are pushed in reverse so they pop in output order.
        let mut stack = vec![Piece::Expr(self)];
        while let Some(piece) = stack.pop() {
            let expr = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Expr(expr) => expr,
            };
            match expr {
                Expr::Literal { value } => match value {
                    Literal::String(s) => write!(f, "{:?}", s)?,
                    other => f.write_str(&other.to_value().coerce_string())?,
                },
                Expr::Identifier { name } => f.write_str(name)?,
                Expr::Member { object, property } => {
                    stack.extend([Piece::Text(property), Piece::Text("."), Piece::Expr(object)]);
                }
                Expr::Index { object, index } => {
                    stack.extend([
                        Piece::Text("]"),
                        Piece::Expr(index),
                        Piece::Text("["),
                        Piece::Expr(object),
                    ]);
                }
                Expr::Call { callee, arguments } => {
                    stack.push(Piece::Text(")"));
                    for (i, arg) in arguments.iter().enumerate().rev() {
                        stack.push(Piece::Expr(arg));
                        if i > 0 {
                            stack.push(Piece::Text(", "));
                        }
                    }
                    stack.extend([Piece::Text("("), Piece::Expr(callee)]);
                }
                Expr::Unary { op, operand } => {
                    stack.extend([Piece::Expr(operand), Piece::Text(op.symbol())]);
                }
                Expr::Binary { op, left, right } => {
                    push_infix(&mut stack, left, op.symbol(), right);
                }
                Expr::Logical { op, left, right } => {
                    push_infix(&mut stack, left, op.symbol(), right);
                }
                Expr::Conditional {
                    test,
                    consequent,
                    alternate,
                } => {
                    stack.extend([
                        Piece::Text(")"),
                        Piece::Expr(alternate),
                        Piece::Text(" : "),
                        Piece::Expr(consequent),
                        Piece::Text(" ? "),
                        Piece::Expr(test),
                        Piece::Text("("),
                    ]);
                }
            }
        }
        Ok(())
    }
}

fn push_infix<'a>(stack: &mut Vec<Piece<'a>>, left: &'a Expr, symbol: &'static str, right: &'a Expr) {
    stack.extend([
        Piece::Text(")"),
        Piece::Expr(right),
        Piece::Text(" "),
        Piece::Text(symbol),
        Piece::Text(" "),
        Piece::Expr(left),
        Piece::Text("("),
    ]);
}
