//! Tests for value coercions.

use super::*;
use serde_json::json;

#[test]
fn test_string_coercion_of_primitives() {
    assert_eq!(Value::Undefined.coerce_string(), "undefined");
    assert_eq!(Value::Null.coerce_string(), "null");
    assert_eq!(Value::Bool(true).coerce_string(), "true");
    assert_eq!(Value::Bool(false).coerce_string(), "false");
    assert_eq!(Value::from("plain").coerce_string(), "plain");
}

#[test]
fn test_string_coercion_borrows_strings() {
    let value = Value::from("borrowed");
    assert!(matches!(value.coerce_string(), Cow::Borrowed(_)));
}

#[test]
fn test_number_formatting() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(-42.0), "-42");
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(0.1), "0.1");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(123.456), "123.456");
    assert_eq!(format_number(1e20), "100000000000000000000");
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(1.25e22), "1.25e+22");
    assert_eq!(format_number(0.000001), "0.000001");
    assert_eq!(format_number(1.5e-7), "1.5e-7");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_array_and_object_coercion() {
    let array = Value::from(json!([1, "a", null, [2, 3], true]));
    assert_eq!(array.coerce_string(), "1,a,,2,3,true");
    assert_eq!(Value::Array(vec![]).coerce_string(), "");

    let object = Value::from(json!({"a": 1}));
    assert_eq!(object.coerce_string(), "[object Object]");
    assert_eq!(Value::Filters.coerce_string(), "[object Object]");
    assert_eq!(
        Value::Filter(Filter::Html).coerce_string(),
        "function html() { [native code] }"
    );
}

#[test]
fn test_number_parsing() {
    assert_eq!(parse_number(""), 0.0);
    assert_eq!(parse_number("  \n "), 0.0);
    assert_eq!(parse_number(" 42 "), 42.0);
    assert_eq!(parse_number("-1.5e3"), -1500.0);
    assert_eq!(parse_number(".5"), 0.5);
    assert_eq!(parse_number("0x1F"), 31.0);
    assert_eq!(parse_number("0b101"), 5.0);
    assert_eq!(parse_number("0o17"), 15.0);
    assert_eq!(parse_number("Infinity"), f64::INFINITY);
    assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
    assert!(parse_number("inf").is_nan());
    assert!(parse_number("nan").is_nan());
    assert!(parse_number("12px").is_nan());
    assert!(parse_number("0x").is_nan());
    assert!(parse_number("1e").is_nan());
}

#[test]
fn test_numeric_coercion() {
    assert!(Value::Undefined.coerce_number().is_nan());
    assert_eq!(Value::Null.coerce_number(), 0.0);
    assert_eq!(Value::Bool(true).coerce_number(), 1.0);
    assert_eq!(Value::from("7").coerce_number(), 7.0);
    assert_eq!(Value::from(json!([5])).coerce_number(), 5.0);
    assert_eq!(Value::Array(vec![]).coerce_number(), 0.0);
    assert!(Value::from(json!({})).coerce_number().is_nan());
}

#[test]
fn test_truthiness() {
    assert!(!Value::Undefined.is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Number(f64::NAN).is_truthy());
    assert!(Value::from("0").is_truthy());
    assert!(Value::Array(vec![]).is_truthy());
    assert!(Value::Object(BTreeMap::new()).is_truthy());
    assert!(Value::Filter(Filter::Id).is_truthy());
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Undefined.type_name(), "undefined");
    assert_eq!(Value::Null.type_name(), "object");
    assert_eq!(Value::from(1.0).type_name(), "number");
    assert_eq!(Value::from("s").type_name(), "string");
    assert_eq!(Value::Filters.type_name(), "object");
    assert_eq!(Value::Filter(Filter::Uri).type_name(), "function");
}

#[test]
fn test_strict_equality() {
    assert!(Value::from(1.0).strict_equals(&Value::from(1.0)));
    assert!(!Value::from(1.0).strict_equals(&Value::from("1")));
    assert!(!Value::Null.strict_equals(&Value::Undefined));
    assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
    assert!(Value::Number(0.0).strict_equals(&Value::Number(-0.0)));
}

#[test]
fn test_loose_equality() {
    assert!(Value::Null.loose_equals(&Value::Undefined));
    assert!(!Value::Null.loose_equals(&Value::from(0.0)));
    assert!(Value::from(1.0).loose_equals(&Value::from("1")));
    assert!(Value::Bool(true).loose_equals(&Value::from("1")));
    assert!(Value::from(json!([2])).loose_equals(&Value::from(2.0)));
    assert!(Value::from(json!({})).loose_equals(&Value::from("[object Object]")));
    assert!(!Value::from("a").loose_equals(&Value::from("b")));
}

#[test]
fn test_lookup_on_object() {
    let env = Value::object([("name", "Ada")]);
    assert!(matches!(
        env.lookup("name").unwrap(),
        Lookup::Found(Value::String(s)) if s == "Ada"
    ));
    assert!(matches!(env.lookup("missing").unwrap(), Lookup::Missing));
}

#[test]
fn test_lookup_on_array_and_string() {
    let list = Value::from(json!(["a", "b"]));
    assert!(matches!(list.lookup("1").unwrap(), Lookup::Found(Value::String(s)) if s == "b"));
    assert!(matches!(list.lookup("01").unwrap(), Lookup::Missing));
    assert!(matches!(list.lookup("length").unwrap(), Lookup::Computed(Value::Number(n)) if n == 2.0));

    let text = Value::from("héllo");
    assert!(matches!(text.lookup("length").unwrap(), Lookup::Computed(Value::Number(n)) if n == 5.0));
    assert!(matches!(text.lookup("1").unwrap(), Lookup::Computed(Value::String(s)) if s == "é"));
}

#[test]
fn test_lookup_on_filters() {
    assert!(matches!(
        Value::Filters.lookup("html").unwrap(),
        Lookup::Computed(Value::Filter(Filter::Html))
    ));
    assert!(matches!(Value::Filters.lookup("eval").unwrap(), Lookup::Missing));
}

#[test]
fn test_lookup_on_undefined_is_type_error() {
    let err = Value::Undefined.lookup("prop").unwrap_err();
    assert_eq!(
        err,
        Error::Type("Cannot read properties of undefined (reading 'prop')".to_string())
    );

    let err = Value::Null.lookup("x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "TypeError: Cannot read properties of null (reading 'x')"
    );
}

#[test]
fn test_json_conversion_round_trips_integers() {
    let value = Value::from(json!({"n": 3, "f": 1.5, "list": [true, null]}));
    let back: serde_json::Value = value.into();
    assert_eq!(back, json!({"n": 3, "f": 1.5, "list": [true, null]}));
}

#[test]
fn test_deserialize_from_json_text() {
    let value: Value = serde_json::from_str(r#"{"user": {"name": "Ada"}}"#).unwrap();
    assert_eq!(
        value,
        Value::object([("user", Value::object([("name", "Ada")]))])
    );
}
