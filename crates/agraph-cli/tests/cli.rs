//! End-to-end runs of the `agraph` binary.

use std::io::Write;
use std::process::{Command, Output};

fn agraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_agraph"))
        .args(args)
        .output()
        .expect("failed to run agraph")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "agraph failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap().trim_end().to_string()
}

#[test]
fn format_prints_canonical_text() {
    let out = agraph(&["format", r#"{"b": 1, "a": [1, 2.5], "ccc": null}"#]);
    assert_eq!(stdout(&out), r#"{"a": [1, 2.5], "b": 1, "ccc": null}"#);
}

#[test]
fn format_json_reports_type() {
    let out = agraph(&["--format", "json", "format", "[1]::path"]);
    assert!(!out.status.success(), "a path of integers is not a path");

    let out = agraph(&["--format", "json", "format", r#""x""#]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["type"], "string");
    assert_eq!(json["text"], r#""x""#);
}

#[test]
fn encode_then_decode() {
    let text = r#"{"k": [true, null, "s"], "n": 1.5}"#;
    let hex = stdout(&agraph(&["encode", text]));
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(stdout(&agraph(&["decode", &hex])), text);
}

#[test]
fn decode_rejects_garbage() {
    assert!(!agraph(&["decode", "zz"]).status.success());
    assert!(!agraph(&["decode", "0100"]).status.success());
}

#[test]
fn set_property_replaces_and_removes() {
    let object = r#"{"a": 1, "b": 2}"#;
    assert_eq!(
        stdout(&agraph(&["set-property", object, "b", "5"])),
        r#"{"a": 1, "b": 5}"#
    );
    assert_eq!(
        stdout(&agraph(&["set-property", object, "c", "[9]"])),
        r#"{"a": 1, "b": 2, "c": [9]}"#
    );
    assert_eq!(stdout(&agraph(&["set-property", object, "a"])), r#"{"b": 2}"#);
    assert!(!agraph(&["set-property", "[1]", "a", "1"]).status.success());
}

#[test]
fn compare_numbers_across_types() {
    let out = agraph(&["--format", "json", "compare", "1", "1.0"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["ordering"], "=");
    assert_eq!(json["hashes_equal"], true);

    let out = agraph(&["--format", "json", "compare", "null", "false"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["ordering"], "<");
}

#[test]
fn inspect_lists_tokens() {
    let out = agraph(&["--format", "json", "inspect", r#"{"a": [1]}"#]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["count"], 1);
    let tokens: Vec<&str> = json["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["token"].as_str().unwrap())
        .collect();
    assert_eq!(
        tokens,
        [
            "begin object Plain (1)",
            "key \"a\"",
            "begin array List (1)",
            "elem 1",
            "end array",
            "end object"
        ]
    );
}

#[test]
fn reads_values_from_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"id": 1, "label": "V", "properties": {{}}}}::vertex"#).unwrap();
    let arg = format!("@{}", file.path().display());
    assert_eq!(
        stdout(&agraph(&["format", &arg])),
        r#"{"id": 1, "label": "V", "properties": {}}::vertex"#
    );
    assert!(!agraph(&["format", "@/definitely/not/here"]).status.success());
}

#[test]
fn quiet_suppresses_output() {
    let out = agraph(&["--quiet", "format", "[1, 2]"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}
