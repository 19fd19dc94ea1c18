//! Error types for query building.

use thiserror::Error;

use crate::Value;

/// Errors raised by strongly-typed configuration setters.
///
/// Builder convenience methods never fail; they return `None` for blank
/// input instead. Only misuse of a setter surfaces as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// An argument had the wrong runtime type.
    #[error(
        "invalid argument #{position} `{name}` given: expected {}, got {actual}",
        format_expectations(.expected)
    )]
    InvalidArgument {
        /// One-based position of the argument.
        position: usize,
        /// Name of the argument.
        name: String,
        /// Accepted type names.
        expected: Vec<String>,
        /// Type name of the value that was passed.
        actual: String,
    },

    /// Timezone name is not part of the IANA database.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Date format string contains invalid strftime items.
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
}

impl QueryError {
    /// Creates an [`QueryError::InvalidArgument`] for the given value.
    pub fn invalid_argument(position: usize, name: &str, expected: &[&str], actual: &Value) -> Self {
        Self::InvalidArgument {
            position,
            name: name.to_string(),
            expected: expected.iter().map(|e| e.to_string()).collect(),
            actual: actual.type_name().to_string(),
        }
    }
}

/// Joins expectations as `a`, `a or b`, `a, b or c`.
fn format_expectations(expected: &[String]) -> String {
    match expected.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Result type for query operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;
