//! Tokenizer for compiled template expressions.

use crate::error::{Error, Result};
use crate::value::{parse_number, parse_radix};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    String(String),

    Dot,          // .
    LBracket,     // [
    RBracket,     // ]
    LParen,       // (
    RParen,       // )
    Comma,        // ,
    Question,     // ?
    Colon,        // :
    Semicolon,    // ;
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Bang,         // !
    Eq,           // ==
    NotEq,        // !=
    StrictEq,     // ===
    StrictNotEq,  // !==
    Lt,           // <
    LtEq,         // <=
    Gt,           // >
    GtEq,         // >=
    And,          // &&
    Or,           // ||
    NullCoalesce, // ??

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            TokenKind::Ident(name) => return write!(f, "identifier '{}'", name),
            TokenKind::Number(n) => return write!(f, "number {}", n),
            TokenKind::String(_) => "string",
            TokenKind::Dot => "'.'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Bang => "'!'",
            TokenKind::Eq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::StrictEq => "'==='",
            TokenKind::StrictNotEq => "'!=='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::NullCoalesce => "'??'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character.
    pub position: usize,
}

/// Split a compiled expression into tokens, ending with [`TokenKind::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer {
        source,
        chars: source.char_indices().peekable(),
    }
    .run()
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some((pos, ch)) = self.chars.next() {
            let kind = match ch {
                c if is_line_terminator(c) || is_whitespace(c) => continue,
                '\'' | '"' => self.string(ch, pos)?,
                '0'..='9' => self.number(pos)?,
                '.' if matches!(self.chars.peek(), Some((_, '0'..='9'))) => self.number(pos)?,
                c if is_ident_start(c) => self.ident(pos),
                '.' => TokenKind::Dot,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '?' if self.eat('?') => TokenKind::NullCoalesce,
                '?' => TokenKind::Question,
                '!' if self.eat('=') => {
                    if self.eat('=') {
                        TokenKind::StrictNotEq
                    } else {
                        TokenKind::NotEq
                    }
                }
                '!' => TokenKind::Bang,
                '=' if self.eat('=') => {
                    if self.eat('=') {
                        TokenKind::StrictEq
                    } else {
                        TokenKind::Eq
                    }
                }
                '<' if self.eat('=') => TokenKind::LtEq,
                '<' => TokenKind::Lt,
                '>' if self.eat('=') => TokenKind::GtEq,
                '>' => TokenKind::Gt,
                '&' if self.eat('&') => TokenKind::And,
                '|' if self.eat('|') => TokenKind::Or,
                other => {
                    return Err(Error::syntax(
                        format!("invalid or unexpected token '{}'", other),
                        pos,
                    ));
                }
            };
            tokens.push(Token {
                kind,
                position: pos,
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            position: self.source.len(),
        });
        Ok(tokens)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn end_of(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(pos, _)| pos)
    }

    fn ident(&mut self, start: usize) -> TokenKind {
        while self.chars.next_if(|&(_, c)| is_ident_part(c)).is_some() {}
        let end = self.end_of();
        TokenKind::Ident(self.source[start..end].to_string())
    }

    fn number(&mut self, start: usize) -> Result<TokenKind> {
        let radix = match self.source[start..].get(..2).map(str::to_ascii_lowercase) {
            Some(prefix) if prefix == "0x" => Some(16),
            Some(prefix) if prefix == "0o" => Some(8),
            Some(prefix) if prefix == "0b" => Some(2),
            _ => None,
        };

        let value = if let Some(radix) = radix {
            self.chars.next();
            let digits_start = self.end_of();
            while self.chars.next_if(|&(_, c)| c.is_digit(radix)).is_some() {}
            let end = self.end_of();
            if end == digits_start {
                return Err(Error::syntax("invalid or unexpected token", start));
            }
            parse_number(&self.source[start..end])
        } else {
            while self.chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
            let end = self.end_of();
            let integer = &self.source[start..end];
            if is_legacy_octal(integer) {
                parse_radix(&integer[1..], 8)
            } else {
                self.decimal_tail(start)?
            }
        };

        if let Some(&(pos, c)) = self.chars.peek() {
            if is_ident_start(c) || c.is_ascii_digit() {
                return Err(Error::syntax(
                    "identifier starts immediately after numeric literal",
                    pos,
                ));
            }
        }
        Ok(TokenKind::Number(value))
    }

    /// Fraction and exponent of a decimal literal whose integer digits are
    /// already consumed.
    fn decimal_tail(&mut self, start: usize) -> Result<f64> {
        if self.eat('.') {
            while self.chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
        }
        if self.chars.next_if(|&(_, c)| c == 'e' || c == 'E').is_some() {
            self.chars.next_if(|&(_, c)| c == '+' || c == '-');
            let digits_start = self.end_of();
            while self.chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
            if self.end_of() == digits_start {
                return Err(Error::syntax("invalid or unexpected token", start));
            }
        }
        let end = self.end_of();
        self.source[start..end]
            .parse::<f64>()
            .map_err(|_| Error::syntax("invalid or unexpected token", start))
    }

    fn string(&mut self, quote: char, start: usize) -> Result<TokenKind> {
        let mut value = String::new();
        let unterminated = || Error::syntax("unterminated string literal", start);

        loop {
            let (pos, ch) = self.chars.next().ok_or_else(unterminated)?;
            match ch {
                c if c == quote => return Ok(TokenKind::String(value)),
                '\\' => self.escape(&mut value, pos)?,
                '\n' | '\r' => return Err(unterminated()),
                c => value.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String, start: usize) -> Result<()> {
        let (_, ch) = self
            .chars
            .next()
            .ok_or_else(|| Error::syntax("unterminated string literal", start))?;
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{C}'),
            'v' => out.push('\u{B}'),
            // Legacy octal escapes: up to three digits from \0-\3, two from \4-\7.
            '0'..='7' => {
                let max_digits = if ch <= '3' { 3 } else { 2 };
                let mut code = u32::from(ch) - u32::from('0');
                for _ in 1..max_digits {
                    match self.chars.next_if(|&(_, c)| matches!(c, '0'..='7')) {
                        Some((_, c)) => code = code * 8 + (u32::from(c) - u32::from('0')),
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'x' => {
                let code = self.hex_digits(2, start)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let code = self.unicode_escape(start)?;
                out.push(self.combine_surrogates(code, start)?);
            }
            '\r' => {
                self.eat('\n');
            }
            c if is_line_terminator(c) => {}
            c => out.push(c),
        }
        Ok(())
    }

    fn unicode_escape(&mut self, start: usize) -> Result<u32> {
        if !self.eat('{') {
            return self.hex_digits(4, start);
        }
        let mut code: u32 = 0;
        let mut digits = 0;
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c != '}') {
            let digit = c
                .to_digit(16)
                .ok_or_else(|| Error::syntax("invalid Unicode escape sequence", start))?;
            code = code.saturating_mul(16).saturating_add(digit);
            digits += 1;
        }
        if digits == 0 || !self.eat('}') || code > 0x10FFFF {
            return Err(Error::syntax("invalid Unicode escape sequence", start));
        }
        Ok(code)
    }

    fn hex_digits(&mut self, count: usize, start: usize) -> Result<u32> {
        let mut code = 0;
        for _ in 0..count {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| Error::syntax("invalid hexadecimal escape sequence", start))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Join a `\uXXXX\uXXXX` surrogate pair; an unpaired half becomes U+FFFD.
    fn combine_surrogates(&mut self, code: u32, start: usize) -> Result<char> {
        let next = self.end_of();
        if (0xD800..0xDC00).contains(&code) && self.source[next..].starts_with("\\u") {
            let rest = &self.source[next + 2..];
            let low = rest
                .get(..4)
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .filter(|low| (0xDC00..0xE000).contains(low));
            if let Some(low) = low {
                for _ in 0..6 {
                    self.chars.next();
                }
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined)
                    .ok_or_else(|| Error::syntax("invalid Unicode escape sequence", start));
            }
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Tab, VT, FF, BOM and the space separators (category Zs). Unlike
/// `char::is_whitespace`, U+0085 is not included.
fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{B}'
            | '\u{C}'
            | ' '
            | '\u{A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// `0` followed by octal digits only; `08` and `09` stay decimal.
fn is_legacy_octal(integer: &str) -> bool {
    integer.len() > 1
        && integer.starts_with('0')
        && integer.bytes().all(|b| (b'0'..=b'7').contains(&b))
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}'
}
