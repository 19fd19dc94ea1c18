//! Resolution of arbitrary values into expressions.

use super::ast::{CompositeExpression, CompositeType, DateTimeExpression, Expression, WildcardExpression};
use crate::Value;

/// Turns raw values into the matching expression variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionFactory;

impl ExpressionFactory {
    /// Resolves `value` to an expression.
    ///
    /// | Value | Expression |
    /// |-------|------------|
    /// | expression | unchanged |
    /// | null | `*` |
    /// | list | group |
    /// | datetime | UTC timestamp |
    /// | scalar without whitespace | term |
    /// | other scalar | phrase |
    ///
    /// ```rust
    /// use solr_query::{ExpressionFactory, Value};
    ///
    /// assert_eq!(ExpressionFactory::create_expression(Value::Null).to_string(), "*");
    /// assert_eq!(ExpressionFactory::create_expression("a:b").to_string(), "a\\:b");
    /// assert_eq!(ExpressionFactory::create_expression("a b").to_string(), "\"a b\"");
    /// ```
    pub fn create_expression(value: impl Into<Value>) -> Expression {
        match value.into() {
            Value::Expr(expr) => *expr,
            Value::Null => WildcardExpression::any().into(),
            Value::List(values) => CompositeExpression::new(values, CompositeType::Space).grouped(),
            Value::DateTime(date) => DateTimeExpression::new(date).into(),
            scalar => {
                let text = scalar.to_string();
                if text.chars().any(char::is_whitespace) {
                    Expression::Phrase(text)
                } else {
                    Expression::Term(text)
                }
            }
        }
    }
}
