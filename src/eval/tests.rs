//! Tests for expression evaluation.

use super::*;
use crate::config::Bindings;
use crate::error::Error;
use crate::value::Value;
use serde_json::json;
use std::borrow::Cow;

fn eval_with(source: &str, env: serde_json::Value) -> Result<Value, Error> {
    let env = Value::from(env);
    let expr = parse(source)?;
    evaluate(&expr, &Bindings::default(), &env).map(Cow::into_owned)
}

fn eval_str(source: &str, env: serde_json::Value) -> String {
    eval_with(source, env).unwrap().coerce_string().into_owned()
}

#[test]
fn test_env_member_access() {
    assert_eq!(eval_str("e.name", json!({"name": "Ada"})), "Ada");
    assert_eq!(
        eval_str("e.user.address.city", json!({"user": {"address": {"city": "Oslo"}}})),
        "Oslo"
    );
}

#[test]
fn test_filter_call() {
    assert_eq!(eval_str("r.html(e.name)", json!({"name": "<b>"})), "&lt;b&gt;");
    assert_eq!(eval_str("r.uri(e.q)", json!({"q": "a b"})), "a%20b");
    assert_eq!(eval_str("r['html']('&')", json!({})), "&amp;");
}

#[test]
fn test_id_filter_keeps_type() {
    let value = eval_with("r.id(e.list)", json!({"list": [1, 2]})).unwrap();
    assert_eq!(value, Value::from(json!([1, 2])));
}

#[test]
fn test_id_filter_borrows_from_env() {
    let env = Value::object([("name", "Ada")]);
    let expr = parse("r.id(e.name)").unwrap();
    let result = evaluate(&expr, &Bindings::default(), &env).unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
}

#[test]
fn test_filter_without_argument_receives_undefined() {
    assert_eq!(eval_str("r.html()", json!({})), "undefined");
    assert_eq!(eval_str("r.html('a', 'ignored')", json!({})), "a");
}

#[test]
fn test_concatenated_template() {
    let source = r#"'<a href="/u/' + r.uri(e.user) + '">' + r.html(e.name) + '</a>'"#;
    let env = json!({"user": "ada lovelace", "name": "Ada & Co"});
    assert_eq!(
        eval_str(source, env),
        r#"<a href="/u/ada%20lovelace">Ada &amp; Co</a>"#
    );
}

#[test]
fn test_addition_and_concatenation() {
    assert_eq!(eval_str("1 + 2", json!({})), "3");
    assert_eq!(eval_str("'1' + 2", json!({})), "12");
    assert_eq!(eval_str("1 + 2 + 'x'", json!({})), "3x");
    assert_eq!(eval_str("e.n + 1", json!({"n": 41})), "42");
    assert_eq!(eval_str("e.list + ''", json!({"list": [1, null, "a"]})), "1,,a");
    assert_eq!(eval_str("true + 1", json!({})), "2");
    assert_eq!(eval_str("'a' + undefined", json!({})), "aundefined");
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval_str("7 % 3 * 2 - 1", json!({})), "1");
    assert_eq!(eval_str("1 / 0", json!({})), "Infinity");
    assert_eq!(eval_str("0 / 0", json!({})), "NaN");
    assert_eq!(eval_str("-e.n", json!({"n": "5"})), "-5");
    assert_eq!(eval_str("+'0x10'", json!({})), "16");
    assert_eq!(eval_str("0.1 + 0.2", json!({})), "0.30000000000000004");
}

#[test]
fn test_comparison() {
    assert_eq!(eval_str("e.n > 3", json!({"n": 5})), "true");
    assert_eq!(eval_str("'b' < 'a'", json!({})), "false");
    assert_eq!(eval_str("'10' < '9'", json!({})), "true");
    assert_eq!(eval_str("'10' < 9", json!({})), "false");
    assert_eq!(eval_str("e.missing >= 0", json!({})), "false");
}

#[test]
fn test_equality() {
    assert_eq!(eval_str("e.n === 1", json!({"n": 1})), "true");
    assert_eq!(eval_str("e.n === '1'", json!({"n": 1})), "false");
    assert_eq!(eval_str("e.n == '1'", json!({"n": 1})), "true");
    assert_eq!(eval_str("e.missing == null", json!({})), "true");
    assert_eq!(eval_str("e.missing === null", json!({})), "false");
    assert_eq!(eval_str("e.a !== e.b", json!({"a": "x", "b": "y"})), "true");
}

#[test]
fn test_logical_operators_return_operands() {
    assert_eq!(eval_str("e.name || 'anonymous'", json!({"name": ""})), "anonymous");
    assert_eq!(eval_str("e.name && r.html(e.name)", json!({"name": "<i>"})), "&lt;i&gt;");
    assert_eq!(eval_str("e.count ?? 'none'", json!({"count": 0})), "0");
    assert_eq!(eval_str("e.count ?? 'none'", json!({"count": null})), "none");
    assert_eq!(eval_str("!e.flag", json!({"flag": false})), "true");
}

#[test]
fn test_short_circuit_skips_errors() {
    assert_eq!(eval_str("e.user && e.user.name", json!({})), "undefined");
    assert_eq!(eval_str("true || e.a.b.c", json!({})), "true");
}

#[test]
fn test_conditional() {
    let source = "e.admin ? '<b>' + r.html(e.name) + '</b>' : r.html(e.name)";
    assert_eq!(
        eval_str(source, json!({"admin": true, "name": "A&B"})),
        "<b>A&amp;B</b>"
    );
    assert_eq!(eval_str(source, json!({"admin": false, "name": "A&B"})), "A&amp;B");
}

#[test]
fn test_array_and_string_access() {
    let env = json!({"items": ["x", "y"], "word": "hey"});
    assert_eq!(eval_str("e.items[1]", env.clone()), "y");
    assert_eq!(eval_str("e.items.length", env.clone()), "2");
    assert_eq!(eval_str("e.items[5]", env.clone()), "undefined");
    assert_eq!(eval_str("e.word[0] + e.word.length", env.clone()), "h3");
    assert_eq!(eval_str("e['items'][0]", env), "x");
}

#[test]
fn test_typeof() {
    assert_eq!(eval_str("typeof e.n", json!({"n": 1})), "number");
    assert_eq!(eval_str("typeof r.html", json!({})), "function");
    assert_eq!(eval_str("typeof r", json!({})), "object");
    assert_eq!(eval_str("typeof window", json!({})), "undefined");
}

#[test]
fn test_missing_nested_property_is_type_error() {
    let err = eval_with("e.missing.prop", json!({})).unwrap_err();
    assert_eq!(
        err,
        Error::Type("Cannot read properties of undefined (reading 'prop')".to_string())
    );
}

#[test]
fn test_unbound_identifier_is_reference_error() {
    for (source, name) in [("window", "window"), ("process.env", "process"), ("filters.html(e.x)", "filters")] {
        let err = eval_with(source, json!({})).unwrap_err();
        assert_eq!(err, Error::Reference { name: name.to_string() });
    }
}

#[test]
fn test_calling_non_function_is_type_error() {
    let err = eval_with("e.name()", json!({"name": "Ada"})).unwrap_err();
    assert_eq!(err, Error::Type("e.name is not a function".to_string()));

    let err = eval_with("r.escape(e.name)", json!({"name": "Ada"})).unwrap_err();
    assert_eq!(err, Error::Type("r.escape is not a function".to_string()));
}

#[test]
fn test_arguments_evaluate_before_callable_check() {
    let err = eval_with("e.name(e.a.b)", json!({"name": "Ada"})).unwrap_err();
    assert!(matches!(err, Error::Type(msg) if msg.starts_with("Cannot read properties")));
}

#[test]
fn test_custom_binding_names() {
    let bindings = Bindings {
        filters: "filters".to_string(),
        env: "env".to_string(),
    };
    let env = Value::object([("name", "<b>")]);
    let expr = parse("filters.html(env.name)").unwrap();
    let result = evaluate(&expr, &bindings, &env).unwrap();
    assert_eq!(result.coerce_string(), "&lt;b&gt;");

    let expr = parse("r.html(e.name)").unwrap();
    let err = evaluate(&expr, &bindings, &env).unwrap_err();
    assert_eq!(err, Error::Reference { name: "r".to_string() });
}

#[test]
fn test_tree_from_json() {
    let tree: Expr = serde_json::from_value(json!({
        "type": "call",
        "callee": {
            "type": "member",
            "object": {"type": "identifier", "name": "r"},
            "property": "html"
        },
        "arguments": [{
            "type": "member",
            "object": {"type": "identifier", "name": "e"},
            "property": "name"
        }]
    }))
    .unwrap();
    assert_eq!(tree, parse("r.html(e.name)").unwrap());

    let env = Value::object([("name", "<b>")]);
    let result = evaluate(&tree, &Bindings::default(), &env).unwrap();
    assert_eq!(result.coerce_string(), "&lt;b&gt;");
}

#[test]
fn test_literal_tree_serialization() {
    let expr = parse("'a' + 1").unwrap();
    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(
        json,
        json!({
            "type": "binary",
            "op": "add",
            "left": {"type": "literal", "value": {"kind": "string", "value": "a"}},
            "right": {"type": "literal", "value": {"kind": "number", "value": 1.0}}
        })
    );
}

#[test]
fn test_display_of_expressions() {
    let expr = parse("r.html(e.a + 'x', e['b'])").unwrap();
    assert_eq!(expr.to_string(), r#"r.html((e.a + "x"), e["b"])"#);
}

fn concatenation(terms: usize) -> String {
    let mut source = String::from("''");
    for _ in 0..terms {
        source.push_str(" + '<li>' + r.html(e.x) + '</li>'");
    }
    source
}

#[test]
fn test_long_concatenation_renders() {
    let source = concatenation(50_000);
    let rendered = eval_str(&source, json!({"x": "a&b"}));
    assert_eq!(rendered.len(), 50_000 * "<li>a&amp;b</li>".len());
    assert!(rendered.starts_with("<li>a&amp;b</li><li>"));
}

#[test]
fn test_long_logical_and_member_chains() {
    let mut source = String::from("e.none");
    for _ in 0..20_000 {
        source.push_str(" || e.none");
    }
    source.push_str(" || 'last'");
    assert_eq!(eval_str(&source, json!({})), "last");

    let source = format!("e{}", ".self".repeat(20_000));
    let env = json!({"self": 1});
    assert!(matches!(eval_with(&source, env), Err(Error::Type(_))));
}

#[test]
fn test_display_of_long_chain() {
    let expr = parse(&concatenation(10_000)).unwrap();
    let text = expr.to_string();
    assert!(text.starts_with("((((("));
    assert!(text.ends_with(r#" + "</li>")"#));
}

#[test]
fn test_deep_operand_nesting_is_range_error() {
    let mut expr = Expr::ident("e");
    for _ in 0..10_000 {
        expr = Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(expr),
        };
    }
    let err = evaluate(&expr, &Bindings::default(), &Value::Undefined).unwrap_err();
    assert_eq!(
        err,
        Error::Range("Maximum call stack size exceeded".to_string())
    );

    let mut expr = Expr::ident("e");
    for _ in 0..MAX_EVAL_DEPTH - 1 {
        expr = Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(expr),
        };
    }
    assert!(evaluate(&expr, &Bindings::default(), &Value::Undefined).is_ok());
}

#[test]
fn test_tree_json_round_trip_of_long_concatenation() {
    // Same stack size as the main thread `mht render --ast` runs on.
    let handle = std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| {
            let source = vec!["r.html(e.x)"; 500].join(" + ");
            let expr = parse(&source).unwrap();
            let json = serde_json::to_string(&expr).unwrap();
            let tree = Expr::from_json(&json).unwrap();
            assert_eq!(tree, expr);

            let env = Value::object([("x", "<")]);
            let result = evaluate(&tree, &Bindings::default(), &env).unwrap();
            assert_eq!(result.coerce_string(), "&lt;".repeat(500));
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn test_tree_from_json_rejects_trailing_input() {
    assert!(Expr::from_json(r#"{"type": "identifier", "name": "e"} x"#).is_err());
}

#[test]
fn test_legacy_octal_literals() {
    assert_eq!(eval_str("010 + 1", json!({})), "9");
    assert_eq!(eval_str(r"'\101\1'", json!({})), "A\u{1}");
}
