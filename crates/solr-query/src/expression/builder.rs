//! Validating façade for building query expressions.
//!
//! Methods accept loosely typed input through [`Value`] and return `None` when
//! the input is blank, so optional parts of a query simply disappear:
//!
//! ```rust
//! use solr_query::ExpressionBuilder;
//!
//! let eb = ExpressionBuilder::new();
//! let query = eb.grp([
//!     eb.field("title", "rust").into(),
//!     eb.field("author", "").into(), // dropped
//!     eb.prhb(eb.field("lang", "php")).into(),
//!     solr_query::Value::Null,
//! ]);
//!
//! assert_eq!(query.unwrap().to_string(), "(title:\"rust\" -lang:\"php\")");
//! ```

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, trace};

use super::ast::{
    BooleanExpression, BooleanOperator, BoostExpression, CompositeExpression, CompositeType,
    DateTimeExpression, Expression, FieldExpression, FunctionExpression, FuzzyExpression,
    GeofiltExpression, GeolocationExpression, LocalParamsExpression, ParameterExpression,
    ProximityExpression, RangeExpression, Wildcard, WildcardExpression,
};
use crate::config::BuilderConfig;
use crate::error::{QueryError, QueryResult};
use crate::Value;

/// Fluent constructor of query expressions.
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder {
    config: BuilderConfig,
}

impl ExpressionBuilder {
    /// Creates a builder with the default configuration (UTC).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Timezone dates are converted to unless a call overrides it.
    pub fn default_timezone(&self) -> Tz {
        self.config.default_timezone
    }

    /// Sets the default timezone from an IANA name.
    ///
    /// # Errors
    ///
    /// - [`QueryError::InvalidArgument`] if `timezone` is not a string.
    /// - [`QueryError::UnknownTimezone`] if the name is not known.
    ///
    /// ```rust
    /// use solr_query::{ExpressionBuilder, QueryError};
    ///
    /// let mut eb = ExpressionBuilder::new();
    /// eb.set_default_timezone("Europe/Berlin").unwrap();
    /// assert_eq!(eb.default_timezone().name(), "Europe/Berlin");
    ///
    /// let err = eb.set_default_timezone(true).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "invalid argument #1 `timezone` given: expected string or timezone, got bool"
    /// );
    /// ```
    pub fn set_default_timezone(&mut self, timezone: impl Into<Value>) -> QueryResult<&mut Self> {
        let timezone: Value = timezone.into();
        let tz = match &timezone {
            Value::Str(name) => name
                .parse::<Tz>()
                .map_err(|_| QueryError::UnknownTimezone(name.clone()))?,
            other => {
                return Err(QueryError::invalid_argument(
                    1,
                    "timezone",
                    &["string", "timezone"],
                    other,
                ))
            }
        };
        Ok(self.set_default_tz(tz))
    }

    /// Sets the default timezone.
    pub fn set_default_tz(&mut self, timezone: Tz) -> &mut Self {
        debug!(timezone = %timezone.name(), "default timezone changed");
        self.config.default_timezone = timezone;
        self
    }

    // =========================================================================
    // Terms
    // =========================================================================

    /// Exact match: `"expr"`. Expressions pass through unchanged.
    pub fn eq(&self, expr: impl Into<Value>) -> Option<Expression> {
        let value: Value = expr.into();
        match value {
            value if !permit("eq", &value) => None,
            Value::Expr(expr) => Some(*expr),
            value => Some(Expression::Phrase(value.to_string())),
        }
    }

    /// Field constraint: `field:expr`. Lists are grouped first.
    pub fn field(&self, field: impl Into<Value>, expr: impl Into<Value>) -> Option<Expression> {
        let value: Value = expr.into();
        let value = match value {
            Value::List(values) => Value::from(self.grp(values)),
            value => value,
        };
        if !permit("field", &value) {
            return None;
        }
        Some(FieldExpression::new(field, value).into())
    }

    /// Quoted phrase: `"text"`.
    pub fn phrase(&self, text: impl Into<Value>) -> Option<Expression> {
        let value: Value = text.into();
        match value {
            value if !permit("phrase", &value) => None,
            Value::Expr(expr) => Some(*expr),
            value => Some(Expression::Phrase(value.to_string())),
        }
    }

    /// Text rendered verbatim.
    pub fn lit(&self, expr: impl Into<Value>) -> Option<Expression> {
        let value: Value = expr.into();
        if !permit("lit", &value) {
            return None;
        }
        Some(Expression::Literal(value.to_string()))
    }

    /// Boost: `expr^boost`.
    pub fn boost(&self, expr: impl Into<Value>, boost: impl Into<Option<f64>>) -> Option<Expression> {
        let value: Value = expr.into();
        let boost: Option<f64> = boost.into();
        let boost = boost?;
        if !permit("boost", &value) {
            return None;
        }
        Some(BoostExpression::new(boost, value).into())
    }

    /// Fuzzy match: `expr~similarity`.
    pub fn fzz(&self, expr: impl Into<Value>, similarity: impl Into<Option<f64>>) -> Option<Expression> {
        let value: Value = expr.into();
        if !permit("fzz", &value) {
            return None;
        }
        Some(FuzzyExpression::new(value, similarity.into()).into())
    }

    /// Proximity match: `"word1 word2"~proximity`.
    ///
    /// Nested lists are flattened and blank words dropped.
    pub fn prx<I, V>(&self, words: I, proximity: i64) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut flat = Vec::new();
        flatten_words(words.into_iter().map(Into::into), &mut flat);
        if flat.is_empty() {
            trace!(method = "prx", "no words given");
            return None;
        }
        Some(ProximityExpression::new(flat, proximity).into())
    }

    /// Range with per-side inclusivity. `Null` bounds are open (`*`).
    pub fn range(
        &self,
        start: impl Into<Value>,
        end: impl Into<Value>,
        inclusive_from: bool,
        inclusive_to: bool,
    ) -> Expression {
        RangeExpression::new(start, end, inclusive_from, inclusive_to).into()
    }

    /// Exclusive range: `{start TO end}`.
    pub fn btwn_range(&self, start: impl Into<Value>, end: impl Into<Value>) -> Expression {
        RangeExpression::exclusive(start, end).into()
    }

    /// Wildcard: `prefix?suffix` or `prefix*suffix`.
    ///
    /// An empty prefix is allowed, so `*foo` can be built; a `Null` prefix is not.
    pub fn wild(
        &self,
        prefix: impl Into<Value>,
        wildcard: impl Into<Wildcard>,
        suffix: impl Into<Value>,
    ) -> Option<Expression> {
        let prefix: Value = prefix.into();
        if prefix == Value::Null {
            trace!(method = "wild", "dropping null prefix");
            return None;
        }
        Some(WildcardExpression::new(wildcard.into(), prefix, suffix).into())
    }

    // =========================================================================
    // Boolean operators
    // =========================================================================

    /// Required: `+expr`.
    pub fn req(&self, expr: impl Into<Value>) -> Option<Expression> {
        self.boolean("req", BooleanOperator::Required, expr.into())
    }

    /// Prohibited: `-expr`.
    pub fn prhb(&self, expr: impl Into<Value>) -> Option<Expression> {
        self.boolean("prhb", BooleanOperator::Prohibited, expr.into())
    }

    /// Negation usable on its own: `(*:* NOT expr)`.
    pub fn not(&self, expr: impl Into<Value>) -> Option<Expression> {
        let value: Value = expr.into();
        if !permit("not", &value) {
            return None;
        }
        Some(BooleanExpression::not(value).into())
    }

    /// `Some(true)` requires, `Some(false)` prohibits, `None` returns the value.
    pub fn bool(&self, expr: impl Into<Value>, operator: Option<bool>) -> Value {
        let value: Value = expr.into();
        match operator {
            None => value,
            Some(true) => self.req(value).into(),
            Some(false) => self.prhb(value).into(),
        }
    }

    fn boolean(&self, method: &'static str, operator: BooleanOperator, value: Value) -> Option<Expression> {
        if !permit(method, &value) {
            return None;
        }
        Some(BooleanExpression::new(operator, value).into())
    }

    // =========================================================================
    // Composites
    // =========================================================================

    /// Group: `(a b c)`.
    ///
    /// The separator is taken from a trailing `"AND"`/`"OR"` marker, which may
    /// also follow a single list argument.
    ///
    /// ```rust
    /// use solr_query::ExpressionBuilder;
    ///
    /// let eb = ExpressionBuilder::new();
    /// assert_eq!(eb.grp(["foo", "bar", "OR"]).unwrap().to_string(), "(\"foo\" OR \"bar\")");
    /// assert!(eb.grp(["", " "]).is_none());
    /// ```
    pub fn grp<I, V>(&self, args: I) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.composite("grp", args, None, true)
    }

    /// Group with an explicit separator.
    pub fn grp_as<I, V>(&self, args: I, kind: CompositeType) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.composite("grp", args, Some(kind), true)
    }

    /// Conjunction group: `(a AND b)`.
    pub fn and_x<I, V>(&self, args: I) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.composite("and_x", args, Some(CompositeType::And), true)
    }

    /// Disjunction group: `(a OR b)`.
    pub fn or_x<I, V>(&self, args: I) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.composite("or_x", args, Some(CompositeType::Or), true)
    }

    /// Composite without parentheses: `a b c`.
    pub fn comp<I, V>(&self, args: I) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.composite("comp", args, None, false)
    }

    /// Composite with an explicit separator.
    pub fn comp_as<I, V>(&self, args: I, kind: CompositeType) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.composite("comp", args, Some(kind), false)
    }

    fn composite<I, V>(
        &self,
        method: &'static str,
        args: I,
        kind: Option<CompositeType>,
        grouped: bool,
    ) -> Option<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let (members, marker) = composite_arguments(args.into_iter().map(Into::into).collect());
        if members.is_empty() {
            trace!(method, "no non-blank members");
            return None;
        }

        let composite = CompositeExpression::new(members, kind.or(marker).unwrap_or_default());
        Some(if grouped {
            composite.grouped()
        } else {
            composite.into()
        })
    }

    /// The value itself, or `*:*` if it is blank.
    pub fn all(&self, expr: impl Into<Value>) -> Value {
        let value: Value = expr.into();
        if !value.is_blank() {
            return value;
        }
        FieldExpression::new(Expression::literal("*"), Expression::literal("*")).into()
    }

    // =========================================================================
    // Dates
    // =========================================================================

    /// Timestamp converted to the default timezone; `*` if absent.
    pub fn date(&self, date: impl Into<Option<DateTime<Tz>>>) -> Expression {
        self.date_in(date, Some(self.default_timezone()))
    }

    /// Timestamp converted to `timezone`; `None` keeps the date's own zone.
    pub fn date_in(&self, date: impl Into<Option<DateTime<Tz>>>, timezone: Option<Tz>) -> Expression {
        let date: Option<DateTime<Tz>> = date.into();
        match date {
            Some(date) => DateTimeExpression::new(date).with_timezone(timezone).into(),
            None => WildcardExpression::any().into(),
        }
    }

    /// Midnight of the day in the default timezone.
    pub fn start_of_day(&self, date: impl Into<Option<DateTime<Tz>>>) -> Option<Expression> {
        self.start_of_day_in(date, Some(self.default_timezone()))
    }

    /// Midnight of the day in `timezone`.
    pub fn start_of_day_in(
        &self,
        date: impl Into<Option<DateTime<Tz>>>,
        timezone: Option<Tz>,
    ) -> Option<Expression> {
        let date: Option<DateTime<Tz>> = date.into();
        let date = date?;
        Some(fixed_date(date, DateTimeExpression::START_OF_DAY_FORMAT, timezone).into())
    }

    /// Last second of the day in the default timezone.
    pub fn end_of_day(&self, date: impl Into<Option<DateTime<Tz>>>) -> Option<Expression> {
        self.end_of_day_in(date, Some(self.default_timezone()))
    }

    /// Last second of the day in `timezone`.
    pub fn end_of_day_in(
        &self,
        date: impl Into<Option<DateTime<Tz>>>,
        timezone: Option<Tz>,
    ) -> Option<Expression> {
        let date: Option<DateTime<Tz>> = date.into();
        let date = date?;
        Some(fixed_date(date, DateTimeExpression::END_OF_DAY_FORMAT, timezone).into())
    }

    /// Inclusive range covering the whole day in the default timezone.
    ///
    /// ```rust
    /// use chrono::TimeZone;
    /// use chrono_tz::Tz;
    /// use solr_query::ExpressionBuilder;
    ///
    /// let eb = ExpressionBuilder::new();
    /// let date = Tz::UTC.with_ymd_and_hms(2010, 10, 11, 0, 0, 0).unwrap();
    /// assert_eq!(
    ///     eb.day(date).unwrap().to_string(),
    ///     "[2010-10-11T00:00:00Z TO 2010-10-11T23:59:59Z]"
    /// );
    /// ```
    pub fn day(&self, date: impl Into<Option<DateTime<Tz>>>) -> Option<Expression> {
        self.day_in(date, Some(self.default_timezone()))
    }

    /// Inclusive range covering the whole day in `timezone`.
    pub fn day_in(&self, date: impl Into<Option<DateTime<Tz>>>, timezone: Option<Tz>) -> Option<Expression> {
        let date: Option<DateTime<Tz>> = date.into();
        let date = date?;
        let start = fixed_date(date, DateTimeExpression::START_OF_DAY_FORMAT, timezone);
        let end = fixed_date(date, DateTimeExpression::END_OF_DAY_FORMAT, timezone);
        Some(RangeExpression::inclusive(start, end).into())
    }

    /// Range between two dates in the default timezone; an absent side is `*`.
    ///
    /// Returns `None` if both sides are absent.
    pub fn date_range(
        &self,
        from: impl Into<Option<DateTime<Tz>>>,
        to: impl Into<Option<DateTime<Tz>>>,
        inclusive_from: bool,
        inclusive_to: bool,
    ) -> Option<Expression> {
        self.date_range_in(from, to, inclusive_from, inclusive_to, Some(self.default_timezone()))
    }

    /// Range between two dates in `timezone`.
    pub fn date_range_in(
        &self,
        from: impl Into<Option<DateTime<Tz>>>,
        to: impl Into<Option<DateTime<Tz>>>,
        inclusive_from: bool,
        inclusive_to: bool,
        timezone: Option<Tz>,
    ) -> Option<Expression> {
        let from: Option<DateTime<Tz>> = from.into();
        let to: Option<DateTime<Tz>> = to.into();
        if from.is_none() && to.is_none() {
            trace!(method = "date_range", "both bounds absent");
            return None;
        }
        Some(self.range(
            self.date_in(from, timezone),
            self.date_in(to, timezone),
            inclusive_from,
            inclusive_to,
        ))
    }

    // =========================================================================
    // Functions and local params
    // =========================================================================

    /// Function call: `name(params)`.
    ///
    /// `params` may be `Null`, a list, a single value or a
    /// [`params`](Self::params) expression.
    pub fn func(&self, name: &str, params: impl Into<Value>) -> Option<Expression> {
        if name.trim().is_empty() {
            trace!(method = "func", "dropping blank function name");
            return None;
        }
        let params: Value = params.into();
        let parameters = match params {
            Value::Null => ParameterExpression::default(),
            Value::List(values) => ParameterExpression::new(values),
            Value::Expr(expr) => match *expr {
                Expression::Parameters(parameters) => parameters,
                other => ParameterExpression::new([other]),
            },
            value => ParameterExpression::new([value]),
        };
        Some(FunctionExpression::new(name, parameters).into())
    }

    /// Parameter list: `a, b, c`. A single list argument is unpacked.
    pub fn params<I, V>(&self, args: I) -> Expression
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut args: Vec<Value> = args.into_iter().map(Into::into).collect();
        if let [Value::List(_)] = args.as_slice() {
            if let Some(Value::List(inner)) = args.pop() {
                args = inner;
            }
        }
        ParameterExpression::new(args).into()
    }

    /// Local params block: `{!kind k=v}` or `{!type=kind k=v}`.
    pub fn local_params(&self, kind: &str, params: &[(&str, Value)], short_form: bool) -> Option<Expression> {
        if kind.trim().is_empty() {
            trace!(method = "local_params", "dropping blank type");
            return None;
        }
        let params = LocalParamsExpression::new(kind)
            .with_params(params.iter().cloned())
            .with_short_form(short_form);
        Some(params.into())
    }

    /// Short-form local params followed by a query: `{!dismax} "My Query"`.
    pub fn local_params_query(
        &self,
        kind: &str,
        params: &[(&str, Value)],
        query: impl Into<Value>,
    ) -> Option<Expression> {
        let params = self.local_params(kind, params, true)?;
        Some(with_query(params, query.into()))
    }

    // =========================================================================
    // Geo
    // =========================================================================

    /// Geolocation `lat,long`; `None` precision uses the configured default.
    pub fn lat_long(&self, latitude: f64, longitude: f64, precision: Option<usize>) -> GeolocationExpression {
        GeolocationExpression::new(
            latitude,
            longitude,
            precision.unwrap_or(self.config.geo_precision),
        )
    }

    /// Geo-distance filter: `{!geofilt sfield="field" pt="lat,long" d=distance}`.
    ///
    /// `additional_params` are appended; a key already present is overridden
    /// in place.
    ///
    /// ```rust
    /// use solr_query::ExpressionBuilder;
    ///
    /// let eb = ExpressionBuilder::new();
    /// let filter = eb.geofilt("geo", Some(eb.lat_long(1.5, 2.5, Some(1))), Some(10), &[]);
    /// assert_eq!(filter.unwrap().to_string(), "{!geofilt sfield=\"geo\" pt=\"1.5,2.5\" d=10}");
    /// ```
    pub fn geofilt(
        &self,
        field: &str,
        geolocation: Option<GeolocationExpression>,
        distance: Option<i64>,
        additional_params: &[(&str, Value)],
    ) -> Option<Expression> {
        if field.trim().is_empty() {
            trace!(method = "geofilt", "dropping blank field");
            return None;
        }
        let mut filter = GeofiltExpression::new(field).with_additional_params(additional_params.iter().cloned());
        filter.geolocation = geolocation;
        filter.distance = distance;
        Some(filter.into())
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Disables caching of `expr`: `{!cache=false} expr`.
    ///
    /// The match-all query `*:*` collapses to `{!cache=false}`.
    pub fn no_cache(&self, expr: impl Into<Value>) -> Option<Expression> {
        let value: Value = expr.into();
        if !permit("no_cache", &value) {
            return None;
        }
        let params = LocalParamsExpression::new("cache").with_param("cache", Expression::literal("false"));
        if value.to_string() == "*:*" {
            return Some(params.into());
        }
        Some(with_query(params.into(), value))
    }

    /// Tags `expr` for later exclusion: `{!tag=name} expr`.
    pub fn tag(&self, name: &str, expr: impl Into<Value>) -> Option<Expression> {
        self.modifier("tag", "tag", name, expr.into())
    }

    /// Excludes tagged filters: `{!ex=name} expr`.
    pub fn exclude_tag(&self, name: &str, expr: impl Into<Value>) -> Option<Expression> {
        self.modifier("exclude_tag", "ex", name, expr.into())
    }

    fn modifier(&self, method: &'static str, kind: &str, name: &str, value: Value) -> Option<Expression> {
        if name.trim().is_empty() {
            trace!(method, "dropping blank tag name");
            return None;
        }
        let params = LocalParamsExpression::new(kind).with_param(kind, Expression::term(name));
        Some(with_query(params.into(), value))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Returns false and traces for blank input.
fn permit(method: &'static str, value: &Value) -> bool {
    if value.is_blank() {
        trace!(method, "dropping blank input");
        return false;
    }
    true
}

/// Splits arguments into non-blank members and an optional separator marker.
///
/// A single list argument, optionally followed by a marker, is unpacked; a
/// trailing marker inside the members takes precedence.
fn composite_arguments(mut args: Vec<Value>) -> (Vec<Value>, Option<CompositeType>) {
    let unpack = match args.as_slice() {
        [Value::List(_)] => Some(None),
        [Value::List(_), marker] => CompositeType::from_marker(marker).map(Some),
        _ => None,
    };

    let mut kind = None;
    if let Some(marker) = unpack {
        if let Value::List(inner) = args.swap_remove(0) {
            args = inner;
        }
        kind = marker;
    }

    if let Some(marker) = args.last().and_then(CompositeType::from_marker) {
        args.pop();
        kind = Some(marker);
    }

    args.retain(|value| !value.is_blank());
    (args, kind)
}

/// Collects the non-blank textual words of nested lists.
fn flatten_words(values: impl Iterator<Item = Value>, out: &mut Vec<String>) {
    for value in values {
        match value {
            Value::List(inner) => flatten_words(inner.into_iter(), out),
            value if value.is_blank() => {}
            value => out.push(value.to_string()),
        }
    }
}

/// Date expression with a fixed, known-good format.
fn fixed_date(date: DateTime<Tz>, format: &str, timezone: Option<Tz>) -> DateTimeExpression {
    DateTimeExpression {
        date,
        format: format.to_string(),
        timezone,
    }
}

/// `params query`, or `params` alone for a blank query.
fn with_query(params: Expression, query: Value) -> Expression {
    if query.is_blank() {
        return params;
    }
    Expression::composite([Value::from(params), query], CompositeType::Space)
}
