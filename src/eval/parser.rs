//! Expression parsing.
//!
//! Operator precedence, lowest first:
//! - Conditional: `?:` (right-associative)
//! - Logical: `||`, `??`, then `&&`
//! - Equality: `==`, `!=`, `===`, `!==`
//! - Relational: `<`, `<=`, `>`, `>=`
//! - Additive: `+`, `-`
//! - Multiplicative: `*`, `/`, `%`
//! - Unary: `!`, `-`, `+`, `typeof`
//! - Postfix: member access, indexing, calls
//! - Primary: literals, identifiers, parenthesized expressions

use super::ast::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp};
use super::lexer::{Token, TokenKind, tokenize};
use crate::config::types::DEFAULT_MAX_NESTING;
use crate::error::{Error, Result};

/// Parse a compiled expression into a tree.
///
/// The source is treated as the operand of a `return` statement: one
/// expression, optionally followed by `;`. Empty input yields `undefined`.
///
/// # Examples
///
/// ```
/// use micro_html_template::eval::{parse, Expr};
///
/// let expr = parse("r.html(e.name)").unwrap();
/// assert_eq!(
///     expr,
///     Expr::call(
///         Expr::member(Expr::ident("r"), "html"),
///         vec![Expr::member(Expr::ident("e"), "name")],
///     )
/// );
/// ```
pub fn parse(source: &str) -> Result<Expr> {
    parse_with_limit(source, DEFAULT_MAX_NESTING)
}

/// Parse with an explicit bound on expression nesting.
pub fn parse_with_limit(source: &str, max_nesting: usize) -> Result<Expr> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
        depth: 0,
        max_nesting,
    };
    parser.parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_nesting: usize,
}

impl Parser {
    fn parse_program(&mut self) -> Result<Expr> {
        let expr = if self.check(&TokenKind::Semicolon) || self.check(&TokenKind::Eof) {
            Expr::Literal {
                value: Literal::Undefined,
            }
        } else {
            self.parse_expr()?
        };

        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> Result<Expr> {
        let test = self.parse_or()?;
        if !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.advance();
        let consequent = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_expr()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;

        loop {
            let op = match self.peek() {
                TokenKind::Or => LogicalOp::Or,
                TokenKind::NullCoalesce => LogicalOp::Nullish,
                _ => break,
            };
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;

        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.peek() {
                TokenKind::Eq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::StrictEq => BinaryOp::StrictEq,
                TokenKind::StrictNotEq => BinaryOp::StrictNotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Ident(name) if name == "typeof" => UnaryOp::Typeof,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let property = match self.peek() {
                        TokenKind::Ident(name) => name.clone(),
                        _ => return Err(self.unexpected()),
                    };
                    self.advance();
                    expr = Expr::member(expr, property);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let arguments = self.parse_arguments()?;
                    expr = Expr::call(expr, arguments);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut arguments = Vec::new();

        while !self.check(&TokenKind::RParen) {
            arguments.push(self.parse_expr()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let expr = match self.peek() {
            TokenKind::Number(n) => Expr::number(*n),
            TokenKind::String(s) => Expr::string(s.clone()),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Expr::Literal {
                    value: Literal::Bool(true),
                },
                "false" => Expr::Literal {
                    value: Literal::Bool(false),
                },
                "null" => Expr::Literal {
                    value: Literal::Null,
                },
                "undefined" => Expr::Literal {
                    value: Literal::Undefined,
                },
                _ => Expr::ident(name.clone()),
            },
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(expr)
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_nesting {
            return Err(Error::syntax(
                "expression nested too deeply",
                self.current().position,
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn current(&self) -> &Token {
        // The token list always ends with Eof, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(Error::syntax(
                format!("expected {}, found {}", kind, self.peek()),
                self.current().position,
            ))
        }
    }

    fn unexpected(&self) -> Error {
        let token = self.current();
        let message = match &token.kind {
            TokenKind::Eof => "unexpected end of input".to_string(),
            other => format!("unexpected {}", other),
        };
        Error::syntax(message, token.position)
    }
}
