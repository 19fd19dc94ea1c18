//! Query strings with named placeholders.
//!
//! A template such as `field:<value>` is written by hand; values are embedded
//! safely at render time:
//!
//! ```rust
//! use solr_query::QueryString;
//!
//! let mut query = QueryString::new("title:<title> AND year:<year>");
//! query.set_placeholder("title", "Rust: the book").set_placeholder("year", 2018);
//!
//! assert_eq!(query.to_string(), "title:\"Rust\\: the book\" AND year:2018");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use tracing::{trace, Level};

use crate::expression::{CompositeExpression, CompositeType, DateTimeExpression};
use crate::util::sanitize;
use crate::Value;

/// Template with `<name>` placeholders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryString {
    query: String,
    placeholders: BTreeMap<String, Value>,
}

impl QueryString {
    /// Creates a template.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            placeholders: BTreeMap::new(),
        }
    }

    /// The raw template.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sets one placeholder, keeping the others.
    pub fn set_placeholder(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.placeholders.insert(name.into(), value.into());
        self
    }

    /// Replaces all placeholders.
    pub fn set_placeholders<I, K, V>(&mut self, placeholders: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.placeholders = placeholders
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self
    }

    /// Renders the template.
    ///
    /// Single pass: at each position the longest matching `<name>` token is
    /// replaced and substituted text is never scanned again. Unknown
    /// placeholders are kept verbatim.
    pub fn render(&self) -> String {
        let mut replacements: Vec<(String, String)> = self
            .placeholders
            .iter()
            .map(|(name, value)| (format!("<{}>", name), render_value(value)))
            .collect();
        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut out = String::with_capacity(self.query.len());
        let mut rest = self.query.as_str();

        while let Some(pos) = rest.find('<') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            match replacements.iter().find(|(token, _)| tail.starts_with(token.as_str())) {
                Some((token, text)) => {
                    out.push_str(text);
                    rest = &tail[token.len()..];
                }
                None => {
                    if tracing::enabled!(Level::TRACE) {
                        if let Some(end) = tail.find('>') {
                            trace!(placeholder = &tail[..=end], "unresolved placeholder");
                        }
                    }
                    out.push('<');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::DateTime(date) => DateTimeExpression::new(*date).to_string(),
        Value::List(values) => CompositeExpression::new(values.clone(), CompositeType::Space)
            .grouped()
            .to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => sanitize(other),
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
