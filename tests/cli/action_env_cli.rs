use std::fs;

use serde_json::{Value, json};
use tempfile::tempdir;

const SCHEMA: &str = "type: object\nrequired: [name]\nproperties:\n  name:\n    type: string\n";

fn action_command() -> assert_cmd::Command {
    let mut command = assert_cmd::cargo::cargo_bin_cmd!("schemacheck");
    command
        .env("RUST_LOG", "off")
        .env_remove("INPUT_SCHEMA")
        .env_remove("INPUT_SCHEMAS")
        .env_remove("INPUT_IGNOREERRORS");
    command
}

fn read_result_output(path: &std::path::Path) -> Value {
    let written = fs::read_to_string(path).expect("read output file");
    let mut lines = written.lines();
    let header = lines.next().expect("output header");
    let delimiter = header
        .strip_prefix("result<<")
        .expect("heredoc result output");
    let body = lines.next().expect("output body");
    assert_eq!(lines.next(), Some(delimiter));
    serde_json::from_str(body).expect("result json")
}

#[test]
fn reads_inputs_from_environment_and_writes_result_output() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("data")).expect("mkdir data");
    fs::write(dir.path().join("schema.yaml"), SCHEMA).expect("write schema");
    fs::write(dir.path().join("data/doc.yaml"), "name: widget\n").expect("write data");
    let output_path = dir.path().join("github_output");

    action_command()
        .env("GITHUB_OUTPUT", &output_path)
        .env("GITHUB_ACTIONS", "true")
        .env("INPUT_DATA", dir.path().join("data/*.yaml"))
        .env("INPUT_SCHEMA", dir.path().join("schema.yaml"))
        .assert()
        .code(0);

    assert_eq!(read_result_output(&output_path), json!({"valid": true}));
}

#[test]
fn blank_optional_inputs_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("schema.yaml"), SCHEMA).expect("write schema");
    fs::write(dir.path().join("doc.yaml"), "name: widget\n").expect("write data");
    let output_path = dir.path().join("github_output");

    action_command()
        .env("GITHUB_OUTPUT", &output_path)
        .env_remove("GITHUB_ACTIONS")
        .env("INPUT_DATA", dir.path().join("doc.yaml"))
        .env("INPUT_SCHEMA", dir.path().join("schema.yaml"))
        .env("INPUT_SCHEMAS", "")
        .env("INPUT_FORMAT", "")
        .env("INPUT_IGNOREERRORS", "")
        .env("INPUT_ALLERRORS", "")
        .env("INPUT_STRICT", "")
        .env("INPUT_VALIDATESCHEMA", " ")
        .env("INPUT_CODEOPTIMIZE", "")
        .env("INPUT_LOOPENUM", "")
        .env("INPUT_DRAFT", "")
        .assert()
        .code(0);

    assert_eq!(read_result_output(&output_path), json!({"valid": true}));
}

#[test]
fn blank_schema_input_defers_to_schemas() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("schema.yaml"), SCHEMA).expect("write schema");
    fs::write(dir.path().join("doc.yaml"), "name: widget\n").expect("write data");

    action_command()
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_ACTIONS")
        .env("INPUT_DATA", dir.path().join("doc.yaml"))
        .env("INPUT_SCHEMA", "")
        .env("INPUT_SCHEMAS", dir.path().join("schema.yaml"))
        .assert()
        .code(0);
}

#[test]
fn blank_data_input_is_usage_error() {
    action_command()
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_ACTIONS")
        .env("INPUT_DATA", "")
        .env("INPUT_SCHEMA", "schema.json")
        .assert()
        .code(3);
}

#[test]
fn legacy_schemas_input_is_accepted() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("schema.yaml"), SCHEMA).expect("write schema");
    fs::write(dir.path().join("doc.yaml"), "name: 7\n").expect("write data");
    let output_path = dir.path().join("github_output");

    let output = action_command()
        .env("GITHUB_OUTPUT", &output_path)
        .env("GITHUB_ACTIONS", "true")
        .env("INPUT_DATA", dir.path().join("doc.yaml"))
        .env("INPUT_SCHEMAS", dir.path().join("schema.yaml"))
        .output()
        .expect("run schemacheck");

    assert_eq!(output.status.code(), Some(2));
    let result = read_result_output(&output_path);
    assert_eq!(result["valid"], json!(false));
    assert_eq!(result["errors"][0]["errors"][0]["instance_path"], json!("/name"));

    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.lines().any(|line| line.starts_with("::error::validation errors: ")));
}

#[test]
fn ignored_failures_are_annotated_as_warnings() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("schema.yaml"), SCHEMA).expect("write schema");
    fs::write(dir.path().join("doc.yaml"), "{}\n").expect("write data");

    let output = action_command()
        .env_remove("GITHUB_OUTPUT")
        .env("GITHUB_ACTIONS", "true")
        .env("INPUT_DATA", dir.path().join("doc.yaml"))
        .env("INPUT_SCHEMA", dir.path().join("schema.yaml"))
        .env("INPUT_IGNOREERRORS", "true")
        .output()
        .expect("run schemacheck");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.lines().any(|line| line.starts_with("::warning::")));
}

#[test]
fn missing_data_input_is_usage_error() {
    action_command()
        .env_remove("INPUT_DATA")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_ACTIONS")
        .env("INPUT_SCHEMA", "schema.json")
        .assert()
        .code(3);
}
