//! # solr-query
//!
//! A Rust library for building Solr/Lucene query strings from typed
//! expressions.
//!
//! This crate provides:
//! - **Escaping**: `escape`, `quote` and `sanitize` for raw values
//! - **Expressions**: one variant per query construct, rendered through
//!   [`std::fmt::Display`]
//! - **Expression Builder**: a façade that silently drops blank input
//! - **Query Strings**: hand-written templates with `<name>` placeholders
//!
//! ## Builder Usage
//!
//! ```rust
//! use solr_query::{ExpressionBuilder, Value};
//!
//! let eb = ExpressionBuilder::new();
//!
//! let query = eb
//!     .grp([
//!         Value::from(eb.phrase("foo bar baz")),
//!         Value::from(eb.prhb(eb.grp([
//!             Value::from(eb.req(eb.boost(eb.field("field1", "foo"), 10.0))),
//!             Value::from(eb.prhb(eb.fzz(eb.field("field2", eb.lit("test")), 0.2))),
//!             Value::from(eb.prx(["word1", "word2"], 3)),
//!         ]))),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     query.to_string(),
//!     "(\"foo bar baz\" -(+field1:\"foo\"^10 -field2:test~0.2 \"word1 word2\"~3))"
//! );
//! ```
//!
//! ## Query String Usage
//!
//! ```rust
//! use solr_query::QueryString;
//!
//! let mut query = QueryString::new("field:<ph>");
//! query.set_placeholder("ph", vec![1, 2, 3]);
//!
//! assert_eq!(query.to_string(), "field:(1 2 3)");
//! ```
//!
//! ## Query Syntax Quick Reference
//!
//! | Construct | Builder | Output |
//! |-----------|---------|--------|
//! | Phrase | `eq`, `phrase` | `"foo bar"` |
//! | Field | `field` | `title:"foo"` |
//! | Required / prohibited | `req`, `prhb` | `+expr`, `-expr` |
//! | Negation | `not` | `(*:* NOT expr)` |
//! | Boost | `boost` | `expr^10` |
//! | Fuzzy | `fzz` | `expr~0.8` |
//! | Proximity | `prx` | `"a b"~3` |
//! | Range | `range`, `btwn_range` | `[a TO b]`, `{a TO b}` |
//! | Wildcard | `wild` | `foo*` |
//! | Group | `grp`, `and_x`, `or_x` | `(a OR b)` |
//! | Local params | `local_params` | `{!dismax qf="title"}` |
//! | Geo filter | `geofilt` | `{!geofilt sfield="geo" pt="1,2" d=5}` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
pub mod expression;
mod query;
pub mod util;
mod value;

pub use config::{BuilderConfig, BuilderConfigBuilder, DEFAULT_GEO_PRECISION};
pub use error::{QueryError, QueryResult};
pub use expression::{
    CompositeType, Expression, ExpressionBuilder, ExpressionFactory, Formatter, Wildcard,
};
pub use query::QueryString;
pub use value::Value;
