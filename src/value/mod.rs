//! Dynamic values flowing through template evaluation.
//!
//! A [`Value`] is what an environment holds and what every expression
//! evaluates to. The coercions here (string, number, truthiness, equality)
//! are the ones compiled templates were generated against, so their output
//! must stay byte-for-byte stable.

mod coerce;

#[cfg(test)]
mod tests;

pub use coerce::{format_number, parse_number};
pub(crate) use coerce::parse_radix;

use crate::error::{Error, Result};
use crate::filters::{FILTERS, Filter};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed template value.
///
/// Environments are usually built from JSON or YAML through the serde
/// conversions; `Filters` and `Filter` only ever appear during evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    /// The filter library bound into the expression scope.
    Filters,
    /// A single filter, obtained by reading a member of the filter library.
    Filter(Filter),
}

/// Result of reading a property from a value.
#[derive(Debug)]
pub(crate) enum Lookup<'a> {
    /// The property is stored in the value itself.
    Found(&'a Value),
    /// The property is derived (a length, a string index, a filter).
    Computed(Value),
    Missing,
}

impl Value {
    /// Create an object value from key/value pairs.
    pub fn object<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Coerce to a string.
    ///
    /// Strings are borrowed; everything else is formatted: numbers without a
    /// trailing `.0`, arrays joined with `,` (null and undefined elements
    /// become empty), plain objects as `[object Object]`.
    pub fn coerce_string(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s),
            Value::Undefined => Cow::Borrowed("undefined"),
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Number(n) => Cow::Owned(format_number(*n)),
            Value::Array(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Undefined | Value::Null => Cow::Borrowed(""),
                        other => other.coerce_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Value::Object(_) | Value::Filters => Cow::Borrowed("[object Object]"),
            Value::Filter(filter) => {
                Cow::Owned(format!("function {}() {{ [native code] }}", filter.name()))
            }
        }
    }

    /// Coerce to a number. Unparseable input yields NaN.
    pub fn coerce_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Array(_) => parse_number(&self.coerce_string()),
            Value::Object(_) | Value::Filters | Value::Filter(_) => f64::NAN,
        }
    }

    /// Whether the value counts as true in a condition.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Filters | Value::Filter(_) => true,
        }
    }

    /// The `typeof` name of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Filter(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) | Value::Filters => "object",
        }
    }

    /// Reduce composite values to their string form; primitives pass through.
    pub fn to_primitive(&self) -> Cow<'_, Value> {
        match self {
            Value::Array(_) | Value::Object(_) | Value::Filters | Value::Filter(_) => {
                Cow::Owned(Value::String(self.coerce_string().into_owned()))
            }
            _ => Cow::Borrowed(self),
        }
    }

    /// Strict equality: same type and same value. NaN is never equal to
    /// itself; containers compare structurally.
    pub fn strict_equals(&self, other: &Value) -> bool {
        self == other
    }

    /// Loose equality with type coercion between primitives.
    pub fn loose_equals(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            (Undefined | Null, _) | (_, Undefined | Null) => false,
            (Number(a), String(_)) => *a == other.coerce_number(),
            (String(_), Number(b)) => self.coerce_number() == *b,
            (Bool(_), _) => Number(self.coerce_number()).loose_equals(other),
            (_, Bool(_)) => self.loose_equals(&Number(other.coerce_number())),
            (Array(_) | Object(_) | Filters | Filter(_), String(_) | Number(_))
            | (String(_) | Number(_), Array(_) | Object(_) | Filters | Filter(_)) => {
                self.to_primitive().loose_equals(&other.to_primitive())
            }
            _ => self.strict_equals(other),
        }
    }

    /// Read a named property.
    ///
    /// Reading from `undefined` or `null` is a type error; any other missing
    /// property is [`Lookup::Missing`].
    pub(crate) fn lookup(&self, key: &str) -> Result<Lookup<'_>> {
        let found = match self {
            Value::Undefined | Value::Null => {
                return Err(Error::Type(format!(
                    "Cannot read properties of {} (reading '{}')",
                    self.coerce_string(),
                    key
                )));
            }
            Value::Object(map) => map.get(key).map(Lookup::Found),
            Value::Array(items) => {
                if key == "length" {
                    Some(Lookup::Computed(Value::Number(items.len() as f64)))
                } else {
                    array_index(key)
                        .and_then(|i| items.get(i))
                        .map(Lookup::Found)
                }
            }
            Value::String(s) => {
                if key == "length" {
                    Some(Lookup::Computed(Value::Number(
                        s.encode_utf16().count() as f64
                    )))
                } else {
                    array_index(key)
                        .and_then(|i| s.encode_utf16().nth(i))
                        .map(|unit| Lookup::Computed(Value::String(String::from_utf16_lossy(&[unit]))))
                }
            }
            Value::Filters => FILTERS
                .get(key)
                .map(|filter| Lookup::Computed(Value::Filter(filter))),
            Value::Filter(filter) if key == "name" => {
                Some(Lookup::Computed(Value::String(filter.name().to_string())))
            }
            Value::Bool(_) | Value::Number(_) | Value::Filter(_) => None,
        };
        Ok(found.unwrap_or(Lookup::Missing))
    }
}

/// Parse a canonical array index ("0", "17"; not "01" or "+1").
fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coerce_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Undefined | Value::Null | Value::Filters | Value::Filter(_) => {
                serde_json::Value::Null
            }
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serde_json::Value::from(n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
