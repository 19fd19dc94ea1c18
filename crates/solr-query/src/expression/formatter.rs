//! Expression formatter.
//!
//! Renders an [`Expression`] tree into Solr query-string syntax. Children are
//! rendered recursively through the escaping utilities, which pass nested
//! expressions through untouched.

use std::fmt::{self, Write};

use super::ast::{
    BooleanExpression, BoostExpression, CompositeExpression, DateTimeExpression, Expression,
    FieldExpression, FunctionExpression, FuzzyExpression, GeolocationExpression,
    LocalParamsExpression, ParameterExpression, ProximityExpression, RangeExpression,
    WildcardExpression,
};
use crate::util::{escape, escape_str, quote_str, sanitize};
use crate::Value;

/// Expression formatter.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    _private: (),
}

impl Formatter {
    /// Create a new formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Format an expression.
    pub fn format(&self, expr: &Expression) -> String {
        Self::format_expression(expr)
    }

    /// Format an expression (static method).
    pub fn format_expression(expr: &Expression) -> String {
        match expr {
            Expression::Literal(text) => text.clone(),
            Expression::Term(text) => escape_str(text),
            Expression::Phrase(text) => quote_str(text),
            Expression::Field(field) => Self::format_field(field),
            Expression::Boolean(boolean) => Self::format_boolean(boolean),
            Expression::Boost(boost) => Self::format_boost(boost),
            Expression::Fuzzy(fuzzy) => Self::format_fuzzy(fuzzy),
            Expression::Proximity(proximity) => Self::format_proximity(proximity),
            Expression::Range(range) => Self::format_range(range),
            Expression::Wildcard(wildcard) => Self::format_wildcard(wildcard),
            Expression::Composite(composite) => Self::format_composite(composite),
            Expression::Group(composite) => Self::format_group(composite),
            Expression::Function(function) => Self::format_function(function),
            Expression::Parameters(parameters) => Self::format_parameters(parameters),
            Expression::LocalParams(params) => Self::format_local_params(params),
            Expression::Geolocation(geolocation) => Self::format_geolocation(geolocation),
            Expression::Geofilt(geofilt) => Self::format_local_params(&geofilt.to_local_params()),
            Expression::DateTime(date) => Self::format_date_time(date),
        }
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn format_field(field: &FieldExpression) -> String {
        let name = escape(&field.field);
        let value = sanitize(&field.value);

        // Local params prefix the field: {!func}field
        if matches!(field.value.as_expression(), Some(Expression::LocalParams(_))) {
            return format!("{}{}", value, name);
        }

        format!("{}:{}", name, value)
    }

    fn format_boolean(boolean: &BooleanExpression) -> String {
        let expr = escape(&boolean.expr);
        if boolean.use_not_notation {
            format!("(*:* NOT {})", expr)
        } else {
            format!("{}{}", boolean.operator.symbol(), expr)
        }
    }

    fn format_boost(boost: &BoostExpression) -> String {
        format!("{}^{}", sanitize(&boost.expr), boost.boost)
    }

    fn format_fuzzy(fuzzy: &FuzzyExpression) -> String {
        let mut out = escape(&fuzzy.expr);
        out.push('~');
        if let Some(similarity) = fuzzy.similarity {
            let _ = write!(out, "{}", similarity);
        }
        out
    }

    fn format_proximity(proximity: &ProximityExpression) -> String {
        format!("{}~{}", quote_str(&proximity.words.join(" ")), proximity.proximity)
    }

    fn format_range(range: &RangeExpression) -> String {
        format!(
            "{}{} TO {}{}",
            if range.inclusive_from { '[' } else { '{' },
            Self::format_bound(&range.start),
            Self::format_bound(&range.end),
            if range.inclusive_to { ']' } else { '}' },
        )
    }

    fn format_bound(value: &Value) -> String {
        match value {
            Value::Null => "*".to_string(),
            other => sanitize(other),
        }
    }

    /// Phrase prefixes and suffixes share one pair of quotes with the wildcard:
    /// `"foo bar*baz"`.
    fn format_wildcard(wildcard: &WildcardExpression) -> String {
        let (prefix, phrase_prefix) = match wildcard.prefix.as_expression() {
            Some(expr @ Expression::Phrase(_)) => {
                let mut text = expr.to_string();
                text.pop();
                (text, true)
            }
            _ => (escape(&wildcard.prefix), false),
        };

        let (suffix, phrase_suffix) = match wildcard.suffix.as_expression() {
            Some(expr @ Expression::Phrase(_)) => {
                let text = expr.to_string();
                (text[1..].to_string(), true)
            }
            _ => (escape(&wildcard.suffix), false),
        };

        let mut out = String::with_capacity(prefix.len() + suffix.len() + 3);
        if !phrase_prefix && phrase_suffix {
            out.push('"');
        }
        out.push_str(&prefix);
        out.push(wildcard.wildcard.as_char());
        if phrase_prefix && !phrase_suffix && suffix.is_empty() {
            out.push('"');
        }
        out.push_str(&suffix);
        if phrase_prefix && !phrase_suffix && !suffix.is_empty() {
            out.push('"');
        }
        out
    }

    // =========================================================================
    // Composites
    // =========================================================================

    fn format_composite(composite: &CompositeExpression) -> String {
        composite
            .expressions
            .iter()
            .map(sanitize)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(composite.kind.separator())
    }

    fn format_group(composite: &CompositeExpression) -> String {
        let part = Self::format_composite(composite);
        if part.is_empty() {
            return part;
        }
        format!("({})", part)
    }

    fn format_function(function: &FunctionExpression) -> String {
        format!(
            "{}({})",
            function.name,
            Self::format_parameters(&function.parameters)
        )
    }

    fn format_parameters(parameters: &ParameterExpression) -> String {
        parameters
            .parameters
            .iter()
            .map(|value| match value {
                Value::Null => quote_str(""),
                other => sanitize(other),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    // =========================================================================
    // Local params and geo
    // =========================================================================

    fn format_local_params(params: &LocalParamsExpression) -> String {
        let mut out = String::from("{!");
        if !params.short_form {
            out.push_str("type=");
        }
        out.push_str(&params.kind);

        match params.params.as_slice() {
            [(key, value)] if params.short_form && *key == params.kind => {
                out.push('=');
                out.push_str(&sanitize(value));
            }
            all => {
                for (key, value) in all {
                    let _ = write!(out, " {}={}", key, sanitize(value));
                }
            }
        }

        out.push('}');
        out
    }

    fn format_geolocation(geolocation: &GeolocationExpression) -> String {
        format!(
            "{:.*},{:.*}",
            geolocation.precision,
            geolocation.latitude,
            geolocation.precision,
            geolocation.longitude
        )
    }

    // =========================================================================
    // Dates
    // =========================================================================

    fn format_date_time(date: &DateTimeExpression) -> String {
        let mut out = String::new();
        let written = match date.timezone {
            Some(tz) => write!(out, "{}", date.date.with_timezone(&tz).format(&date.format)),
            None => write!(out, "{}", date.date.format(&date.format)),
        };
        if written.is_err() {
            // `format` is a public field and may bypass `with_format` validation.
            tracing::warn!(format = %date.format, "invalid date format, rendering empty");
            out.clear();
        }
        out
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Formatter::format_expression(self))
    }
}

impl fmt::Display for DateTimeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Formatter::format_date_time(self))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ast::{BooleanOperator, CompositeType, Wildcard};
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn phrase(text: &str) -> Value {
        Expression::phrase(text).into()
    }

    fn render(expr: impl Into<Expression>) -> String {
        expr.into().to_string()
    }

    #[test]
    fn test_formatter_instance_matches_display() {
        let formatter = Formatter::new();
        let expr = Expression::group(["a", "b"], CompositeType::Or);
        assert_eq!(formatter.format(&expr), expr.to_string());
        assert_eq!(formatter.format(&expr), "(\"a\" OR \"b\")");
    }

    #[test]
    fn test_date_time_display_matches_expression() {
        let date = Tz::Europe__Berlin.with_ymd_and_hms(2012, 12, 13, 15, 15, 16).unwrap();
        let expr = DateTimeExpression::new(date);
        assert_eq!(expr.to_string(), "2012-12-13T14:15:16Z");
        assert_eq!(expr.to_string(), render(expr.clone()));
    }

    #[test]
    fn test_format_phrase() {
        assert_eq!(Expression::phrase("foo:bar").to_string(), "\"foo\\:bar\"");
        assert_eq!(Expression::phrase("foo").to_string(), "\"foo\"");
        assert_eq!(Expression::phrase("völ").to_string(), "\"völ\"");
        assert_eq!(Expression::phrase("foo bar").to_string(), "\"foo bar\"");
    }

    #[test]
    fn test_format_term_and_literal() {
        assert_eq!(Expression::term("foo:bar").to_string(), "foo\\:bar");
        assert_eq!(Expression::literal("foo:bar").to_string(), "foo:bar");
    }

    #[test]
    fn test_wildcard_escapes_prefix_and_suffix_but_not_wildcard() {
        let w = WildcardExpression::new(Wildcard::Single, "foo:bar", "bar");
        assert_eq!(Expression::from(w).to_string(), "foo\\:bar?bar");

        let w = WildcardExpression::new(Wildcard::Multi, "foo", "bar:foo");
        assert_eq!(Expression::from(w).to_string(), "foo*bar\\:foo");

        let w = WildcardExpression::new(Wildcard::Single, "foo:bar", Value::Null);
        assert_eq!(Expression::from(w).to_string(), "foo\\:bar?");
    }

    #[test]
    fn test_wildcard_with_phrases() {
        let w = WildcardExpression::new(Wildcard::Multi, phrase("foo bar"), "baz");
        assert_eq!(Expression::from(w).to_string(), "\"foo bar*baz\"");

        let w = WildcardExpression::new(Wildcard::Multi, phrase("foo bar:baz"), "baz");
        assert_eq!(Expression::from(w).to_string(), "\"foo bar\\:baz*baz\"");

        let w = WildcardExpression::new(Wildcard::Single, phrase("foo bar"), Value::Null);
        assert_eq!(Expression::from(w).to_string(), "\"foo bar?\"");

        let w = WildcardExpression::new(Wildcard::Single, "foo", phrase("bar baz"));
        assert_eq!(Expression::from(w).to_string(), "\"foo?bar baz\"");
    }

    #[test]
    fn test_format_group() {
        let g = Expression::group(vec![Value::from("foo:bar"), phrase("foo bar")], CompositeType::Space);
        assert_eq!(g.to_string(), "(\"foo\\:bar\" \"foo bar\")");

        let w: Value = WildcardExpression::new(Wildcard::Multi, "foo", Value::Null).into();
        let g = Expression::group(vec![w, phrase("foo bar")], CompositeType::Space);
        assert_eq!(g.to_string(), "(foo* \"foo bar\")");
    }

    #[test]
    fn test_format_group_drops_empty_members() {
        let empty = Expression::group(Vec::<Value>::new(), CompositeType::Space);
        assert_eq!(empty.to_string(), "");

        let g = Expression::group(
            vec![Value::Null, Value::from(false), Value::from(""), phrase("foo bar")],
            CompositeType::Space,
        );
        assert_eq!(g.to_string(), "(\"foo bar\")");
    }

    #[test]
    fn test_format_group_types() {
        assert_eq!(Expression::group([1, 2, 3], CompositeType::Space).to_string(), "(1 2 3)");
        assert_eq!(Expression::group([1, 2, 3], CompositeType::And).to_string(), "(1 AND 2 AND 3)");
        assert_eq!(Expression::group([1, 2, 3], CompositeType::Or).to_string(), "(1 OR 2 OR 3)");
        assert_eq!(
            Expression::group(["one two", "three four"], CompositeType::Space).to_string(),
            "(\"one two\" \"three four\")"
        );
    }

    #[test]
    fn test_format_composite_without_parens() {
        let c = Expression::composite(["foo", "bar"], CompositeType::Or);
        assert_eq!(c.to_string(), "\"foo\" OR \"bar\"");
    }

    #[test]
    fn test_format_boost() {
        assert_eq!(Expression::from(BoostExpression::new(10.0, "foo")).to_string(), "\"foo\"^10");
        assert_eq!(Expression::from(BoostExpression::new(10.1, "foo")).to_string(), "\"foo\"^10.1");

        let w: Value = WildcardExpression::new(Wildcard::Multi, "foo", Value::Null).into();
        assert_eq!(Expression::from(BoostExpression::new(200.0, w)).to_string(), "foo*^200");

        let g = Expression::group(["foo", "bar"], CompositeType::Space);
        assert_eq!(
            Expression::from(BoostExpression::new(200.0, g)).to_string(),
            "(\"foo\" \"bar\")^200"
        );
    }

    #[test]
    fn test_format_field() {
        assert_eq!(
            Expression::from(FieldExpression::new("field", "value:foo")).to_string(),
            "field:\"value\\:foo\""
        );
        assert_eq!(
            Expression::from(FieldExpression::new("fie-ld", "foo")).to_string(),
            "fie\\-ld:\"foo\""
        );

        let g = Expression::group(vec![Value::from("foo"), phrase("foo bar")], CompositeType::Space);
        assert_eq!(
            Expression::from(FieldExpression::new("field", g)).to_string(),
            "field:(\"foo\" \"foo bar\")"
        );
    }

    #[test]
    fn test_format_field_with_local_params() {
        let f = FieldExpression::new("field", LocalParamsExpression::new("func"));
        assert_eq!(Expression::from(f).to_string(), "{!func}field");
    }

    #[test]
    fn test_format_boolean() {
        let g = Expression::group(["foo", "bar"], CompositeType::Space);
        let b = BooleanExpression::new(BooleanOperator::Required, g);
        assert_eq!(Expression::from(b).to_string(), "+(\"foo\" \"bar\")");

        let b = BooleanExpression::new(BooleanOperator::Required, phrase("foo bar"));
        assert_eq!(Expression::from(b).to_string(), "+\"foo bar\"");

        let b = BooleanExpression::new(BooleanOperator::Required, "foo");
        assert_eq!(Expression::from(b).to_string(), "+foo");

        let w = WildcardExpression::new(Wildcard::Single, "foo", "bar");
        let b = BooleanExpression::new(BooleanOperator::Required, w);
        assert_eq!(Expression::from(b).to_string(), "+foo?bar");

        let b = BooleanExpression::new(BooleanOperator::Prohibited, "foo");
        assert_eq!(Expression::from(b).to_string(), "-foo");

        let w = WildcardExpression::new(Wildcard::Single, "foo", phrase("bar baz"));
        let b = BooleanExpression::new(BooleanOperator::Prohibited, w);
        assert_eq!(Expression::from(b).to_string(), "-\"foo?bar baz\"");
    }

    #[test]
    fn test_format_not_notation() {
        let b = BooleanExpression::not(Expression::from(FieldExpression::new("field", "foo")));
        assert_eq!(Expression::from(b).to_string(), "(*:* NOT field:\"foo\")");
    }

    #[test]
    fn test_format_proximity() {
        assert_eq!(
            Expression::from(ProximityExpression::new(["foo", "bar"], 100)).to_string(),
            "\"foo bar\"~100"
        );
        assert_eq!(
            Expression::from(ProximityExpression::new(["bar", "foo"], 200)).to_string(),
            "\"bar foo\"~200"
        );
    }

    #[test]
    fn test_format_range() {
        assert_eq!(
            Expression::from(RangeExpression::inclusive("foo", "bar")).to_string(),
            "[\"foo\" TO \"bar\"]"
        );
        assert_eq!(
            Expression::from(RangeExpression::inclusive("foo", phrase("foo bar"))).to_string(),
            "[\"foo\" TO \"foo bar\"]"
        );
        assert_eq!(
            Expression::from(RangeExpression::new("foo", phrase("foo bar"), true, false)).to_string(),
            "[\"foo\" TO \"foo bar\"}"
        );
        let w: Value = WildcardExpression::new(Wildcard::Single, phrase("foo bar"), Value::Null).into();
        assert_eq!(
            Expression::from(RangeExpression::exclusive("foo", w)).to_string(),
            "{\"foo\" TO \"foo bar?\"}"
        );
        assert_eq!(Expression::from(RangeExpression::inclusive(-1, 0)).to_string(), "[-1 TO 0]");
        assert_eq!(Expression::from(RangeExpression::inclusive(0, 1)).to_string(), "[0 TO 1]");
    }

    #[test]
    fn test_format_open_range() {
        let r = RangeExpression::inclusive(Value::Null, Value::Null);
        assert_eq!(Expression::from(r).to_string(), "[* TO *]");

        let r = RangeExpression::new(Value::Null, 10, false, true);
        assert_eq!(Expression::from(r).to_string(), "{* TO 10]");
    }

    #[test]
    fn test_format_fuzzy() {
        assert_eq!(Expression::from(FuzzyExpression::new("foo", None)).to_string(), "foo~");
        assert_eq!(Expression::from(FuzzyExpression::new("foo", Some(0.8))).to_string(), "foo~0.8");
        assert_eq!(Expression::from(FuzzyExpression::new("foo", Some(0.0))).to_string(), "foo~0");
    }

    #[test]
    fn test_format_date_time() {
        let date = Tz::Europe__Berlin.with_ymd_and_hms(2012, 12, 13, 15, 15, 16).unwrap();
        assert_eq!(render(DateTimeExpression::new(date)), "2012-12-13T14:15:16Z");

        let date = Tz::Europe__Berlin.with_ymd_and_hms(2012, 12, 13, 11, 15, 16).unwrap();
        let expr = DateTimeExpression::new(date).with_timezone(Some(Tz::Europe__Moscow));
        assert_eq!(render(expr), "2012-12-13T14:15:16Z");

        let date = Tz::Europe__Berlin.with_ymd_and_hms(2012, 12, 13, 14, 15, 16).unwrap();
        let expr = DateTimeExpression::new(date).with_timezone(None);
        assert_eq!(render(expr), "2012-12-13T14:15:16Z");
    }

    #[test]
    fn test_format_function() {
        let f = FunctionExpression::new("sum", ParameterExpression::new(vec![
            Value::from(1),
            Value::from(2),
            Value::from(3),
            Value::from("text"),
        ]));
        assert_eq!(Expression::from(f).to_string(), "sum(1, 2, 3, \"text\")");

        let f = FunctionExpression::new("func", ParameterExpression::default());
        assert_eq!(Expression::from(f).to_string(), "func()");

        let f = FunctionExpression::new("func", ParameterExpression::new([Value::Null, Value::Null]));
        assert_eq!(Expression::from(f).to_string(), "func(\"\", \"\")");
    }

    #[test]
    fn test_format_local_params() {
        assert_eq!(Expression::from(LocalParamsExpression::new("func")).to_string(), "{!func}");
        assert_eq!(
            Expression::from(LocalParamsExpression::new("func").with_short_form(false)).to_string(),
            "{!type=func}"
        );
        assert_eq!(
            Expression::from(LocalParamsExpression::new("dismax").with_param("qf", "myfield")).to_string(),
            "{!dismax qf=\"myfield\"}"
        );
    }

    #[test]
    fn test_format_local_params_short_form_collapses() {
        let p = LocalParamsExpression::new("dismax").with_param("dismax", "My Query");
        assert_eq!(Expression::from(p.clone()).to_string(), "{!dismax=\"My Query\"}");
        assert_eq!(
            Expression::from(p.with_short_form(false)).to_string(),
            "{!type=dismax dismax=\"My Query\"}"
        );
    }

    #[test]
    fn test_format_geolocation() {
        let g = GeolocationExpression::new(12.345678901234, 89.01234567, 12);
        assert_eq!(Expression::from(g).to_string(), "12.345678901234,89.012345670000");

        let g = GeolocationExpression::new(12.34567890, 89.012345678901, 12);
        assert_eq!(Expression::from(g).to_string(), "12.345678900000,89.012345678901");

        let g = GeolocationExpression::new(12.345678901234, 89.01234567, 4);
        assert_eq!(Expression::from(g).to_string(), "12.3457,89.0123");
    }
}
