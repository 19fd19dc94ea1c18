//! Solr query expression module.
//!
//! This module provides the expression types of the Lucene/Solr query-string
//! syntax, their formatter, and two ways of constructing them:
//!
//! - **[`ExpressionBuilder`]**: validating façade; blank input yields `None`
//! - **[`ExpressionFactory`]**: resolves an arbitrary [`Value`](crate::Value)
//!   to the matching expression
//!
//! ## Example
//!
//! ```rust
//! use solr_query::expression::{ExpressionBuilder, Formatter};
//! use solr_query::Value;
//!
//! let eb = ExpressionBuilder::new();
//! let expr = eb
//!     .and_x([
//!         Value::from(eb.field("type", "article")),
//!         Value::from(eb.field("tags", vec!["rust", "solr"])),
//!         Value::from(eb.boost(eb.phrase("query builder"), 2.0)),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     Formatter::format_expression(&expr),
//!     "(type:\"article\" AND tags:(\"rust\" \"solr\") AND \"query builder\"^2)"
//! );
//! ```

mod ast;
mod builder;
mod factory;
mod formatter;

// Re-export AST types
pub use ast::{
    BooleanExpression, BooleanOperator, BoostExpression, CompositeExpression, CompositeType,
    DateTimeExpression, Expression, FieldExpression, FunctionExpression, FuzzyExpression,
    GeofiltExpression, GeolocationExpression, LocalParamsExpression, ParameterExpression,
    ProximityExpression, RangeExpression, Wildcard, WildcardExpression,
};

// Re-export builder types
pub use builder::ExpressionBuilder;

// Re-export factory
pub use factory::ExpressionFactory;

// Re-export formatter types
pub use formatter::Formatter;
