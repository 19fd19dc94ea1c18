//! Integration tests for query-string templates.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use solr_query::expression::RangeExpression;
use solr_query::{CompositeType, Expression, ExpressionBuilder, QueryString, Value};

#[test]
fn test_simple_query() {
    let query = QueryString::new("field:value");
    assert_eq!(query.to_string(), "field:value");
    assert_eq!(query.query(), "field:value");
}

#[test]
fn test_string_placeholder() {
    let mut query = QueryString::new("field:<ph>");
    assert_eq!(query.to_string(), "field:<ph>");

    query.set_placeholder("ph", "text");
    assert_eq!(query.to_string(), "field:\"text\"");
}

#[test]
fn test_setters_chain() {
    let mut query = QueryString::new("<a> <b>");
    query.set_placeholder("a", "x").set_placeholder("b", "y");
    assert_eq!(query.to_string(), "\"x\" \"y\"");
}

#[test]
fn test_group_placeholder() {
    let mut query = QueryString::new("field:<ph>");
    query.set_placeholder("ph", Expression::group(1..=3, CompositeType::Space));
    assert_eq!(query.to_string(), "field:(1 2 3)");
}

#[test]
fn test_date_placeholders() {
    let from = Utc.with_ymd_and_hms(2012, 10, 11, 9, 8, 7).unwrap();
    let to = Tz::UTC.with_ymd_and_hms(2013, 12, 11, 10, 9, 8).unwrap();

    let mut query = QueryString::new("field:[<from> TO <to>]");
    query.set_placeholders([("from", Value::from(from)), ("to", Value::from(to))]);

    assert_eq!(query.to_string(), "field:[2012-10-11T09:08:07Z TO 2013-12-11T10:09:08Z]");
}

#[test]
fn test_local_date_placeholder_is_converted_to_utc() {
    let date = Tz::Europe__Berlin.with_ymd_and_hms(2012, 12, 13, 15, 15, 16).unwrap();
    let mut query = QueryString::new("field:<date>");
    query.set_placeholder("date", date);
    assert_eq!(query.to_string(), "field:2012-12-13T14:15:16Z");
}

#[test]
fn test_list_placeholder() {
    let mut query = QueryString::new("field:<ph>");
    query.set_placeholder("ph", vec![1, 2, 3, 4, 5]);
    assert_eq!(query.to_string(), "field:(1 2 3 4 5)");
}

#[test]
fn test_boolean_placeholder() {
    let mut query = QueryString::new("field:<ph>");
    query.set_placeholder("ph", true);
    assert_eq!(query.to_string(), "field:true");

    query.set_placeholder("ph", false);
    assert_eq!(query.to_string(), "field:false");
}

#[test]
fn test_expression_placeholder() {
    let mut query = QueryString::new("field:<ph>");
    query.set_placeholder("ph", Expression::from(RangeExpression::exclusive(0, 100)));
    assert_eq!(query.to_string(), "field:{0 TO 100}");
}

#[test]
fn test_builder_output_as_placeholder() {
    let eb = ExpressionBuilder::new();
    let mut query = QueryString::new("<filter> AND type:<type>");
    query
        .set_placeholder("filter", eb.or_x(["a b", "c"]))
        .set_placeholder("type", "article");
    assert_eq!(query.to_string(), "(\"a b\" OR \"c\") AND type:\"article\"");
}

#[test]
fn test_set_placeholders() {
    let mut query = QueryString::new("field:<ph>");
    query.set_placeholders([("ph", "text")]);
    assert_eq!(query.to_string(), "field:\"text\"");
}

#[test]
fn test_escaped_text_placeholder() {
    let mut query = QueryString::new("title:<title>");
    query.set_placeholder("title", "C++ (2nd edition)");
    assert_eq!(query.to_string(), "title:\"C\\+\\+ \\(2nd edition\\)\"");
}
