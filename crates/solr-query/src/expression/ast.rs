//! Query expression types.
//!
//! Every construct of the Lucene/Solr query-string syntax is a variant of the
//! closed [`Expression`] enum. Payloads are plain data; rendering lives in the
//! formatter and is reached through [`std::fmt::Display`].
//!
//! ```text
//! field:"value"            Field
//! +expr  -expr             Boolean
//! (*:* NOT expr)           Boolean (NOT notation)
//! expr^2                   Boost
//! term~0.8                 Fuzzy
//! "w1 w2"~10               Proximity
//! [a TO b}                 Range
//! pre*suf                  Wildcard
//! (a OR b)                 Group
//! sum(1, 2)                Function
//! {!dismax qf="title"}     LocalParams
//! 2012-12-13T14:15:16Z     DateTime
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{QueryError, QueryResult};
use crate::Value;

/// A renderable query fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Opaque text rendered verbatim.
    Literal(String),
    /// Single escaped token.
    Term(String),
    /// Escaped and quoted exact-match phrase.
    Phrase(String),
    /// `field:value` constraint.
    Field(FieldExpression),
    /// Required, prohibited or NOT-notation expression.
    Boolean(BooleanExpression),
    /// Relevance boost.
    Boost(BoostExpression),
    /// Edit-distance match.
    Fuzzy(FuzzyExpression),
    /// Word-distance match.
    Proximity(ProximityExpression),
    /// Bounded range.
    Range(RangeExpression),
    /// Prefix/suffix pattern.
    Wildcard(WildcardExpression),
    /// Sequence of expressions joined by a separator.
    Composite(CompositeExpression),
    /// Composite wrapped in parentheses.
    Group(CompositeExpression),
    /// Function call.
    Function(FunctionExpression),
    /// Comma separated argument list.
    Parameters(ParameterExpression),
    /// `{!type key=value}` block.
    LocalParams(LocalParamsExpression),
    /// `lat,long` pair.
    Geolocation(GeolocationExpression),
    /// Geo-distance filter.
    Geofilt(GeofiltExpression),
    /// Formatted timestamp.
    DateTime(DateTimeExpression),
}

/// Field constraint: `field:value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpression {
    /// Field name; escaped unless it is an expression.
    pub field: Value,
    /// Constrained value; sanitized.
    pub value: Value,
}

/// Boolean operator prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BooleanOperator {
    /// `+`: the expression must match.
    Required,
    /// `-`: the expression must not match.
    Prohibited,
}

/// Boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpression {
    /// Operator prefix.
    pub operator: BooleanOperator,
    /// Wrapped expression; escaped.
    pub expr: Value,
    /// Render as `(*:* NOT expr)` instead of using the prefix.
    pub use_not_notation: bool,
}

/// Boost expression: `expr^boost`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostExpression {
    /// Boost factor.
    pub boost: f64,
    /// Boosted expression; sanitized.
    pub expr: Value,
}

/// Fuzzy expression: `expr~similarity`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyExpression {
    /// Matched expression; escaped.
    pub expr: Value,
    /// Similarity between 0.0 and 1.0.
    pub similarity: Option<f64>,
}

/// Proximity expression: `"word1 word2"~proximity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityExpression {
    /// Words in order.
    pub words: Vec<String>,
    /// Maximum distance between the words.
    pub proximity: i64,
}

/// Range expression: `[start TO end]`, `{start TO end}` or mixed.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpression {
    /// Lower bound; `Null` is unbounded.
    pub start: Value,
    /// Upper bound; `Null` is unbounded.
    pub end: Value,
    /// Lower bound included.
    pub inclusive_from: bool,
    /// Upper bound included.
    pub inclusive_to: bool,
}

/// Wildcard character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Wildcard {
    /// `?`: exactly one character.
    #[default]
    Single,
    /// `*`: any number of characters.
    Multi,
}

/// Wildcard expression: `prefix?suffix` or `prefix*suffix`.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardExpression {
    /// Wildcard character, never escaped.
    pub wildcard: Wildcard,
    /// Text before the wildcard.
    pub prefix: Value,
    /// Text after the wildcard.
    pub suffix: Value,
}

/// Separator used between composite members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum CompositeType {
    /// Whitespace; the engine's default operator applies.
    #[default]
    Space,
    /// `AND`.
    And,
    /// `OR`.
    Or,
}

/// Composite expression: members joined by a separator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeExpression {
    /// Members in order.
    pub expressions: Vec<Value>,
    /// Separator.
    pub kind: CompositeType,
}

/// Function expression: `name(parameters)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    /// Function name.
    pub name: String,
    /// Arguments.
    pub parameters: ParameterExpression,
}

/// Parameter list: `a, b, c`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterExpression {
    /// Argument values; `Null` renders as an empty phrase.
    pub parameters: Vec<Value>,
}

/// Local params block: `{!type key=value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalParamsExpression {
    /// Query parser type.
    pub kind: String,
    /// Parameters in insertion order.
    pub params: Vec<(String, Value)>,
    /// Use `{!type ...}` rather than `{!type=type ...}`.
    pub short_form: bool,
}

/// Geolocation: `lat,long` with fixed precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeolocationExpression {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Fractional digits of both numbers.
    pub precision: usize,
}

/// Geo-distance filter rendered as `{!geofilt ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofiltExpression {
    /// Spatial field.
    pub field: String,
    /// Center point.
    pub geolocation: Option<GeolocationExpression>,
    /// Radius.
    pub distance: Option<i64>,
    /// Extra parameters; override the generated ones in place.
    pub additional_params: Vec<(String, Value)>,
}

/// Timestamp formatted after conversion to a target timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeExpression {
    /// Point in time.
    pub date: DateTime<Tz>,
    /// strftime format.
    pub format: String,
    /// Target timezone; `None` keeps the date's own zone.
    pub timezone: Option<Tz>,
}

// =============================================================================
// Implementations
// =============================================================================

impl Expression {
    /// Creates a literal that is rendered verbatim.
    pub fn literal(text: impl Into<String>) -> Self {
        Expression::Literal(text.into())
    }

    /// Creates an escaped single term.
    pub fn term(text: impl Into<String>) -> Self {
        Expression::Term(text.into())
    }

    /// Creates a quoted phrase.
    pub fn phrase(text: impl Into<String>) -> Self {
        Expression::Phrase(text.into())
    }

    /// Creates a parenthesised group.
    pub fn group<I, V>(expressions: I, kind: CompositeType) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        CompositeExpression::new(expressions, kind).grouped()
    }

    /// Creates an ungrouped composite.
    pub fn composite<I, V>(expressions: I, kind: CompositeType) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expression::Composite(CompositeExpression::new(expressions, kind))
    }

    /// Compares two renderable values by their query text.
    pub fn is_equal(&self, other: &impl std::fmt::Display) -> bool {
        self.to_string() == other.to_string()
    }
}

impl FieldExpression {
    /// Creates a field constraint.
    pub fn new(field: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl BooleanOperator {
    /// Prefix character.
    pub fn symbol(self) -> char {
        match self {
            BooleanOperator::Required => '+',
            BooleanOperator::Prohibited => '-',
        }
    }
}

impl BooleanExpression {
    /// Creates a prefix boolean expression.
    pub fn new(operator: BooleanOperator, expr: impl Into<Value>) -> Self {
        Self {
            operator,
            expr: expr.into(),
            use_not_notation: false,
        }
    }

    /// Creates a prohibited expression in `(*:* NOT expr)` notation.
    pub fn not(expr: impl Into<Value>) -> Self {
        Self {
            operator: BooleanOperator::Prohibited,
            expr: expr.into(),
            use_not_notation: true,
        }
    }
}

impl BoostExpression {
    /// Creates a boost expression.
    pub fn new(boost: f64, expr: impl Into<Value>) -> Self {
        Self {
            boost,
            expr: expr.into(),
        }
    }
}

impl FuzzyExpression {
    /// Creates a fuzzy expression.
    pub fn new(expr: impl Into<Value>, similarity: Option<f64>) -> Self {
        Self {
            expr: expr.into(),
            similarity,
        }
    }
}

impl ProximityExpression {
    /// Creates a proximity expression.
    pub fn new<I, S>(words: I, proximity: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            proximity,
        }
    }
}

impl RangeExpression {
    /// Creates a range with per-side inclusivity.
    pub fn new(
        start: impl Into<Value>,
        end: impl Into<Value>,
        inclusive_from: bool,
        inclusive_to: bool,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            inclusive_from,
            inclusive_to,
        }
    }

    /// Creates a range including both bounds.
    pub fn inclusive(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(start, end, true, true)
    }

    /// Creates a range excluding both bounds.
    pub fn exclusive(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(start, end, false, false)
    }
}

impl Wildcard {
    /// The wildcard character.
    pub fn as_char(self) -> char {
        match self {
            Wildcard::Single => '?',
            Wildcard::Multi => '*',
        }
    }
}

impl From<char> for Wildcard {
    /// `*` maps to [`Wildcard::Multi`]; anything else to [`Wildcard::Single`].
    fn from(c: char) -> Self {
        if c == '*' {
            Wildcard::Multi
        } else {
            Wildcard::Single
        }
    }
}

impl WildcardExpression {
    /// Creates a wildcard expression.
    pub fn new(wildcard: Wildcard, prefix: impl Into<Value>, suffix: impl Into<Value>) -> Self {
        Self {
            wildcard,
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The bare `*` wildcard.
    pub fn any() -> Self {
        Self::new(Wildcard::Multi, Value::Null, Value::Null)
    }
}

impl CompositeType {
    /// Marker text; empty for [`CompositeType::Space`].
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeType::Space => "",
            CompositeType::And => "AND",
            CompositeType::Or => "OR",
        }
    }

    /// Text placed between members.
    pub fn separator(self) -> &'static str {
        match self {
            CompositeType::Space => " ",
            CompositeType::And => " AND ",
            CompositeType::Or => " OR ",
        }
    }

    /// Recognizes a trailing `AND`/`OR` marker.
    pub fn from_marker(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) if s == "AND" => Some(CompositeType::And),
            Value::Str(s) if s == "OR" => Some(CompositeType::Or),
            _ => None,
        }
    }
}

impl CompositeExpression {
    /// Creates a composite.
    pub fn new<I, V>(expressions: I, kind: CompositeType) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            expressions: expressions.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// Wraps this composite in parentheses.
    pub fn grouped(self) -> Expression {
        Expression::Group(self)
    }
}

impl FunctionExpression {
    /// Creates a function call.
    pub fn new(name: impl Into<String>, parameters: ParameterExpression) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

impl ParameterExpression {
    /// Creates a parameter list.
    pub fn new<I, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }
}

impl LocalParamsExpression {
    /// Creates a short-form block without parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Vec::new(),
            short_form: true,
        }
    }

    /// Sets a parameter, replacing an existing one with the same key in place.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Sets several parameters in order.
    pub fn with_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        params
            .into_iter()
            .fold(self, |acc, (key, value)| acc.with_param(key, value))
    }

    /// Chooses between `{!type ...}` and `{!type=type ...}`.
    pub fn with_short_form(mut self, short_form: bool) -> Self {
        self.short_form = short_form;
        self
    }
}

impl GeolocationExpression {
    /// Creates a geolocation.
    pub fn new(latitude: f64, longitude: f64, precision: usize) -> Self {
        Self {
            latitude,
            longitude,
            precision,
        }
    }
}

impl GeofiltExpression {
    /// Creates a filter on `field` without location or distance.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            geolocation: None,
            distance: None,
            additional_params: Vec::new(),
        }
    }

    /// Sets the center point.
    pub fn with_geolocation(mut self, geolocation: GeolocationExpression) -> Self {
        self.geolocation = Some(geolocation);
        self
    }

    /// Sets the radius.
    pub fn with_distance(mut self, distance: i64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Adds parameters appended after `sfield`, `pt` and `d`.
    pub fn with_additional_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.additional_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builds the equivalent local params block.
    pub fn to_local_params(&self) -> LocalParamsExpression {
        let mut params = LocalParamsExpression::new("geofilt").with_param("sfield", self.field.as_str());

        if let Some(geolocation) = self.geolocation {
            let point = Expression::Geolocation(geolocation).to_string();
            params = params.with_param("pt", Expression::literal(format!("\"{}\"", point)));
        }

        if let Some(distance) = self.distance {
            params = params.with_param("d", distance);
        }

        params.with_params(self.additional_params.iter().cloned())
    }
}

impl DateTimeExpression {
    /// `2012-12-13T14:15:16Z`.
    pub const DEFAULT_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%SZ";
    /// `2012-12-13T00:00:00Z`.
    pub const START_OF_DAY_FORMAT: &'static str = "%Y-%m-%dT00:00:00Z";
    /// `2012-12-13T23:59:59Z`.
    pub const END_OF_DAY_FORMAT: &'static str = "%Y-%m-%dT23:59:59Z";

    /// Creates a timestamp in the default format, converted to UTC.
    pub fn new(date: DateTime<Tz>) -> Self {
        Self {
            date,
            format: Self::DEFAULT_FORMAT.to_string(),
            timezone: Some(Tz::UTC),
        }
    }

    /// Sets the target timezone; `None` keeps the date's own zone.
    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets a strftime format.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidDateFormat`] if the format contains
    /// unknown specifiers.
    pub fn with_format(mut self, format: impl Into<String>) -> QueryResult<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(QueryError::InvalidDateFormat(format));
        }
        self.format = format;
        Ok(self)
    }
}

// =============================================================================
// Conversions into Expression
// =============================================================================

macro_rules! impl_into_expression {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for Expression {
                fn from(value: $payload) -> Self {
                    Expression::$variant(value)
                }
            }

            impl From<$payload> for Value {
                fn from(value: $payload) -> Self {
                    Value::from(Expression::$variant(value))
                }
            }
        )*
    };
}

impl_into_expression!(
    FieldExpression => Field,
    BooleanExpression => Boolean,
    BoostExpression => Boost,
    FuzzyExpression => Fuzzy,
    ProximityExpression => Proximity,
    RangeExpression => Range,
    WildcardExpression => Wildcard,
    CompositeExpression => Composite,
    FunctionExpression => Function,
    ParameterExpression => Parameters,
    LocalParamsExpression => LocalParams,
    GeolocationExpression => Geolocation,
    GeofiltExpression => Geofilt,
    DateTimeExpression => DateTime,
);
