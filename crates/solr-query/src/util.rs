//! Escaping, quoting and sanitizing of raw values.
//!
//! All three functions pass already-built expressions through untouched, so an
//! expression is never escaped twice.

use crate::expression::{CompositeExpression, CompositeType, DateTimeExpression};
use crate::Value;

/// Number of fractional digits used when sanitizing floats.
pub const FLOAT_PRECISION: usize = 14;

/// Characters with a meaning in the Lucene query syntax.
pub const RESERVED_CHARS: [char; 19] = [
    '\\', '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '/',
];

/// Escapes every reserved character of `text` with a backslash.
///
/// Single pass: inserted backslashes are never escaped again.
pub fn escape_str(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes and wraps `text` in double quotes.
///
/// Text that already starts and ends with a quote keeps its quotes; only the
/// inner part is escaped.
pub fn quote_str(text: &str) -> String {
    let inner = match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(inner) => inner,
        None => text,
    };
    format!("\"{}\"", escape_str(inner))
}

/// Escapes a value. Lists render as a group of sanitized members.
///
/// ```rust
/// use solr_query::{util, Value};
///
/// assert_eq!(util::escape(&Value::from("foo:bar")), "foo\\:bar");
/// ```
pub fn escape(value: &Value) -> String {
    match value {
        Value::Expr(expr) => expr.to_string(),
        Value::Null => String::new(),
        Value::List(_) => sanitize(value),
        other => escape_str(&other.to_string()),
    }
}

/// Escapes and quotes a value.
pub fn quote(value: &Value) -> String {
    match value {
        Value::Expr(expr) => expr.to_string(),
        other => quote_str(&other.to_string()),
    }
}

/// Converts a value into safe query text depending on its type.
///
/// | Value | Output |
/// |-------|--------|
/// | expression | rendered as is |
/// | integer | decimal |
/// | float | fixed point, 14 fractional digits |
/// | non-empty string | escaped and quoted |
/// | list | group |
/// | datetime | UTC timestamp |
/// | `true` | `true` |
/// | null, `false`, `""` | empty |
pub fn sanitize(value: &Value) -> String {
    match value {
        Value::Expr(expr) => expr.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Str(s) if s.is_empty() => String::new(),
        Value::Str(s) => quote_str(s),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::List(values) => CompositeExpression::new(values.clone(), CompositeType::Space)
            .grouped()
            .to_string(),
        Value::DateTime(date) => DateTimeExpression::new(*date).to_string(),
    }
}

/// Fixed point rendering without exponent or thousands separators.
pub fn format_float(value: f64) -> String {
    format!("{:.*}", FLOAT_PRECISION, value)
}
