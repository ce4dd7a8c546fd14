//! Output-escaping filters.
//!
//! This module provides the fixed filter library bound into every compiled
//! template:
//!
//! - **id**: returns its argument unchanged, for values already safe in
//!   their output context
//! - **html**: allow-list escaper for HTML text and attribute values
//! - **uri**: percent-encoder for URI components embedded in HTML
//!
//! Templates reach filters by name through the expression text
//! (`r.html(e.name)`); the library itself is a single immutable
//! [`FILTERS`] table shared by every render.

mod html;
mod tables;
mod uri;


pub use html::escape_html;
pub use uri::{encode_uri_component, escape_uri};

use crate::value::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::trace;

/// A named filter from the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Identity.
    Id,
    /// HTML allow-list escaping.
    Html,
    /// URI component encoding.
    Uri,
}

impl Filter {
    /// The name templates use to reach this filter.
    pub fn name(self) -> &'static str {
        match self {
            Filter::Id => "id",
            Filter::Html => "html",
            Filter::Uri => "uri",
        }
    }

    /// Look up a filter by name.
    pub fn from_name(name: &str) -> Option<Self> {
        FILTERS.get(name)
    }

    /// Apply the filter to a value.
    pub fn apply(self, value: Value) -> Value {
        self.call(Cow::Owned(value)).into_owned()
    }

    /// Apply the filter without copying a borrowed argument; `id` hands the
    /// same value back.
    pub(crate) fn call<'a>(self, value: Cow<'a, Value>) -> Cow<'a, Value> {
        trace!(filter = self.name(), "applying filter");
        match self {
            Filter::Id => id(value),
            Filter::Html => Cow::Owned(Value::String(html(&value))),
            Filter::Uri => Cow::Owned(Value::String(uri(&value))),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The filter library: a fixed, read-only registry.
#[derive(Debug)]
pub struct Filters {
    entries: [Filter; 3],
}

/// The process-wide filter library.
pub static FILTERS: Filters = Filters {
    entries: [Filter::Id, Filter::Html, Filter::Uri],
};

impl Filters {
    /// Find a filter by name.
    pub fn get(&self, name: &str) -> Option<Filter> {
        self.entries.iter().copied().find(|f| f.name() == name)
    }

    /// Iterate over the filters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = Filter> + '_ {
        self.entries.iter().copied()
    }

    /// Names of all filters, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Filter::name).collect()
    }
}

/// Return `value` unchanged.
pub fn id<T>(value: T) -> T {
    value
}

/// Coerce `value` to a string and escape it for HTML.
///
/// See [`escape_html`] for the escaping rules.
pub fn html(value: &Value) -> String {
    escape_html(&value.coerce_string())
}

/// Coerce `value` to a string and encode it as a URI component.
///
/// See [`escape_uri`] for the encoding rules.
pub fn uri(value: &Value) -> String {
    escape_uri(&value.coerce_string())
}
