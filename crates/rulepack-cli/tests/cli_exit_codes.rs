//! # CLI Exit Code Tests
//!
//! Runs the built `rulepack` binary and checks the single stdout line and
//! the process exit code for success and failure paths.

use std::path::Path;
use std::process::{Command, Output};

fn rulepack(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rulepack"))
        .current_dir(dir)
        .args(args)
        .env_remove("RULEPACK_INPUT")
        .env_remove("RULEPACK_OUTPUT")
        .env_remove("RULEPACK_BASE_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("run rulepack")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn pack_with_defaults_writes_updater_dat() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data/SpeedReaderConfig.json"),
        r#"[{"domain":"example.com","url_rules":["example.com/*"]}]"#,
    )
    .unwrap();

    let output = rulepack(dir.path(), &["pack"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output).trim(), "Serialized");
    assert!(dir.path().join("data/speedreader-updater.dat").exists());
}

#[test]
fn invalid_document_exits_one_without_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"[{"url_rules":["a"]}]"#).unwrap();

    let output = rulepack(
        dir.path(),
        &["pack", "--input", "config.json", "--output", "out.dat"],
    );
    assert_eq!(output.status.code(), Some(1));
    let line = stdout(&output);
    assert!(line.starts_with("Error: "), "stdout: {line}");
    assert!(line.contains("does not match expected format"), "stdout: {line}");
    assert!(!dir.path().join("out.dat").exists());
}

#[test]
fn missing_input_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = rulepack(dir.path(), &["pack", "--input", "absent.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Error: "));
}

#[test]
fn output_env_var_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"[{"domain":"a.com","url_rules":["a.com/*"]}]"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rulepack"))
        .current_dir(dir.path())
        .args(["pack"])
        .env("RULEPACK_INPUT", "config.json")
        .env("RULEPACK_OUTPUT", "from-env.dat")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert!(dir.path().join("from-env.dat").exists());
}

#[test]
fn config_file_supplies_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("conf")).unwrap();
    std::fs::write(
        dir.path().join("conf/input.json"),
        r#"[{"domain":"a.com","url_rules":["a.com/*"]}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("conf/rulepack.yaml"),
        "input: input.json\noutput: build/out.dat\n",
    )
    .unwrap();

    let output = rulepack(dir.path(), &["pack", "--config", "conf/rulepack.yaml"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert!(dir.path().join("conf/build/out.dat").exists());
}

#[test]
fn validate_reports_schema_is_alright() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"[{"domain":"a.com","url_rules":["a.com/*"]}]"#,
    )
    .unwrap();

    let output = rulepack(dir.path(), &["validate", "config.json"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "Schema is alright.");
}

#[test]
fn validate_prints_error_text() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"[{"domain":"a.com","url_rules":[""]}]"#,
    )
    .unwrap();

    let output = rulepack(dir.path(), &["validate", "config.json"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("url_rules"), "stdout: {text}");
    assert_eq!(text, text.to_lowercase());
}

#[test]
fn inspect_round_trips_packed_artifact() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"[{"domain":"example.com","url_rules":["example.com/*"]}]"#,
    )
    .unwrap();
    let packed = rulepack(
        dir.path(),
        &["pack", "--input", "config.json", "--output", "out.dat"],
    );
    assert_eq!(packed.status.code(), Some(0));

    let output = rulepack(dir.path(), &["inspect", "out.dat", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"domain": "example.com", "url_rules": ["example.com/*"]}])
    );
}

#[test]
fn inspect_corrupt_artifact_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.dat"), b"not gzip at all").unwrap();

    let output = rulepack(dir.path(), &["inspect", "bad.dat"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Error: "));
}

#[test]
fn schema_prints_embedded_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = rulepack(dir.path(), &["schema"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["definitions"]["Configuration"].is_object());
}
