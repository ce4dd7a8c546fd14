//! Tests for command implementations.

use super::*;
use crate::cli::{Command, FilterArgs, RenderArgs};
use micro_html_template::exit_codes;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn render_args(template: PathBuf) -> RenderArgs {
    RenderArgs {
        template,
        env: None,
        env_json: None,
        config: None,
        ast: false,
    }
}

fn run(command: Command) -> Result<String> {
    let mut out = Vec::new();
    dispatch(command, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map_or(exit_codes::USER_ERROR, Error::exit_code)
}

#[test]
fn test_render_with_json_env() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "page.tpl", "'<p>' + r.html(e.name) + '</p>'\n");
    let env = write_file(&dir, "env.json", r#"{"name": "Tom & Jerry"}"#);

    let mut args = render_args(template);
    args.env = Some(env);
    let output = run(Command::Render(args)).unwrap();
    assert_eq!(output, "<p>Tom &amp; Jerry</p>\n");
}

#[test]
fn test_render_with_yaml_env() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "link.tpl", "r.uri(e.query)");
    let env = write_file(&dir, "env.yaml", "query: it's (a) test!\n");

    let mut args = render_args(template);
    args.env = Some(env);
    let output = run(Command::Render(args)).unwrap();
    assert_eq!(output, "it%27s%20%28a%29%20test%21\n");
}

#[test]
fn test_render_with_inline_env_and_no_env() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "t.tpl", "e.n * 2");

    let mut args = render_args(template.clone());
    args.env_json = Some(r#"{"n": 21}"#.to_string());
    assert_eq!(run(Command::Render(args)).unwrap(), "42\n");

    let template = write_file(&dir, "u.tpl", "typeof e.n");
    assert_eq!(run(Command::Render(render_args(template))).unwrap(), "undefined\n");
}

#[test]
fn test_render_with_config_bindings() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "t.tpl", "filters.html(env.x)");
    let config = write_file(&dir, "mht.yaml", "bindings:\n  filters: filters\n  env: env\n");

    let mut args = render_args(template);
    args.config = Some(config);
    args.env_json = Some(r#"{"x": "<>"}"#.to_string());
    assert_eq!(run(Command::Render(args)).unwrap(), "&lt;&gt;\n");
}

#[test]
fn test_render_expression_tree() {
    let dir = TempDir::new().unwrap();
    let tree = r#"{
        "type": "call",
        "callee": {"type": "member", "object": {"type": "identifier", "name": "r"}, "property": "html"},
        "arguments": [{"type": "literal", "value": {"kind": "string", "value": "a<b"}}]
    }"#;
    let template = write_file(&dir, "t.json", tree);

    let mut args = render_args(template);
    args.ast = true;
    assert_eq!(run(Command::Render(args)).unwrap(), "a&lt;b\n");
}

#[test]
fn test_render_invalid_tree_is_user_error() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "t.json", r#"{"type": "nope"}"#);

    let mut args = render_args(template);
    args.ast = true;
    let err = run(Command::Render(args)).unwrap_err();
    assert_eq!(exit_code(&err), exit_codes::USER_ERROR);
}

#[test]
fn test_render_failure_has_render_exit_code() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "t.tpl", "e.missing.prop");

    let err = run(Command::Render(render_args(template))).unwrap_err();
    assert_eq!(exit_code(&err), exit_codes::RENDER_FAILURE);
    assert_eq!(
        err.to_string(),
        "TypeError: Cannot read properties of undefined (reading 'prop')"
    );
}

#[test]
fn test_render_missing_template_is_user_error() {
    let dir = TempDir::new().unwrap();
    let err = run(Command::Render(render_args(dir.path().join("absent.tpl")))).unwrap_err();
    assert_eq!(exit_code(&err), exit_codes::USER_ERROR);
    assert!(err.to_string().starts_with("failed to read template"));
}

#[test]
fn test_render_invalid_env_is_user_error() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "t.tpl", "e.x");
    let env = write_file(&dir, "env.json", "{not json");

    let mut args = render_args(template);
    args.env = Some(env);
    let err = run(Command::Render(args)).unwrap_err();
    assert_eq!(exit_code(&err), exit_codes::USER_ERROR);
}

#[test]
fn test_filter_command() {
    let args = FilterArgs {
        name: "html".to_string(),
        value: "<script>".to_string(),
    };
    assert_eq!(run(Command::Filter(args)).unwrap(), "&lt;script&gt;\n");

    let args = FilterArgs {
        name: "id".to_string(),
        value: "<script>".to_string(),
    };
    assert_eq!(run(Command::Filter(args)).unwrap(), "<script>\n");
}

#[test]
fn test_unknown_filter() {
    let args = FilterArgs {
        name: "json".to_string(),
        value: "x".to_string(),
    };
    let err = run(Command::Filter(args)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown filter 'json' (available: id, html, uri)"
    );
    assert_eq!(exit_code(&err), exit_codes::USER_ERROR);
}

#[test]
fn test_filters_command_lists_names() {
    assert_eq!(run(Command::Filters).unwrap(), "id\nhtml\nuri\n");
}
