//! Dynamic input values.
//!
//! Builder methods, expression payloads and template placeholders all accept a
//! [`Value`]. Conversions exist from the usual Rust scalars, strings, vectors,
//! `Option<T>`, chrono date-times and [`Expression`]s, so call sites read
//! naturally:
//!
//! ```rust
//! use solr_query::{Expression, Value};
//!
//! let values: Vec<Value> = vec![
//!     "foo".into(),
//!     42.into(),
//!     Value::Null,
//!     Expression::phrase("foo bar").into(),
//! ];
//! assert_eq!(values[1].to_string(), "42");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::expression::{CompositeExpression, CompositeType, DateTimeExpression, Expression};

/// A raw value to be rendered into query text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Point in time with its own timezone.
    DateTime(DateTime<Tz>),
    /// Already-built expression; never escaped or quoted again.
    Expr(Box<Expression>),
}

impl Value {
    /// Builds a list value from anything iterable.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(values.into_iter().map(Into::into).collect())
    }

    /// Returns true for `Null` and for strings that are empty after trimming.
    ///
    /// Numeric zero and the string `"0"` are not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Str(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the wrapped expression, if any.
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::DateTime(_) => "datetime",
            Value::Expr(_) => "expression",
        }
    }
}

/// Plain textual form, without escaping or quoting.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(values) => write!(
                f,
                "{}",
                CompositeExpression::new(values.clone(), CompositeType::Space).grouped()
            ),
            Value::DateTime(date) => write!(f, "{}", DateTimeExpression::new(*date)),
            Value::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value.with_timezone(&Tz::UTC))
    }
}

impl From<Expression> for Value {
    fn from(value: Expression) -> Self {
        Value::Expr(Box::new(value))
    }
}

impl From<CompositeType> for Value {
    fn from(value: CompositeType) -> Self {
        Value::Str(value.as_str().to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::list(values)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Value::list(values)
    }
}
