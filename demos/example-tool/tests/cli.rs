//! End-to-end runs of the example tool binary.

use pretty_assertions::assert_eq;
use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cfgstack-example-tool"));
    command
        .args(args)
        .env_remove("EXAMPLE_MESSAGE")
        .env_remove("EXAMPLE_CONFIG_FILE");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("run example tool")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "tool failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn prints_default_message() {
    assert_eq!(stdout(&run(&[], &[])), "Hello!");
}

#[test]
fn message_flag_wins() {
    let output = run(&["--message", "HI"], &[("EXAMPLE_MESSAGE", "from env")]);
    assert_eq!(stdout(&output), "HI");
}

#[test]
fn env_supplies_message() {
    assert_eq!(stdout(&run(&[], &[("EXAMPLE_MESSAGE", "from env")])), "from env");
}

#[test]
fn config_file_sits_between_env_and_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tool.json5");
    fs::write(&path, "{ message: 'from file' }").expect("write config");
    let path = path.to_string_lossy().into_owned();

    let output = run(
        &["--config-file", &path],
        &[("EXAMPLE_MESSAGE", "from env")],
    );
    assert_eq!(stdout(&output), "from file");

    let output = run(&["--config-file", &path, "--message", "HI"], &[]);
    assert_eq!(stdout(&output), "HI");
}

#[test]
fn missing_config_file_fails() {
    let output = run(&["--config-file", "/nonexistent/tool.json5"], &[]);
    assert!(!output.status.success());
}
