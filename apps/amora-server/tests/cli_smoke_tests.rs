//! CLI smoke tests for the amora-server binary: help output, configuration
//! validation and flag handling.

use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_amora_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_amora-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute amora-server")
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

fn valid_config(dir: &TempDir) -> String {
    let home = dir.path().join("home").to_string_lossy().replace('\\', "/");
    write_config(
        dir,
        "valid.yaml",
        &format!(
            r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0

database:
  url: "sqlite://amora-test.db"

auth:
  token_secret: "smoke-test-secret"
  token_ttl_hours: 1

paygate:
  webhook_secret: "smoke-whsec"
  tolerance_secs: 300

logging:
  default:
    console_level: error
    file: ""
    file_level: info
"#
        ),
    )
}

#[test]
fn help_lists_subcommands_and_flags() {
    let output = run_amora_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("amora-server") || stdout.contains("Amora"));
    assert!(stdout.contains("Usage:") || stdout.contains("USAGE:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
}

#[test]
fn version_prints_number() {
    let output = run_amora_server(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("amora-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn invalid_subcommand_fails() {
    let output = run_amora_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid") || stderr.contains("unexpected"),
        "Should mention the invalid command: {stderr}"
    );
}

#[test]
fn missing_config_file_fails_check() {
    let output = run_amora_server(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not found") || stderr.contains("config"),
        "Should mention the missing file: {stderr}"
    );
}

#[test]
fn malformed_yaml_fails_check() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "invalid.yaml", "invalid: yaml: content: [unclosed");

    let output = run_amora_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn wrong_section_shape_fails_check() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // logging must map subsystem names to sections, not hold a bare level
    let config_path = write_config(
        &temp_dir,
        "badshape.yaml",
        r#"
database:
  url: "sqlite://amora-test.db"

logging:
  level: "info"
"#,
    );

    let output = run_amora_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success(), "Should reject bad logging shape");
}

#[test]
fn valid_config_passes_check() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = valid_config(&temp_dir);

    let output = run_amora_server(&["--config", &config_path, "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
        eprintln!("STDOUT: {}", String::from_utf8_lossy(&output.stdout));
    }
    assert!(output.status.success(), "Should succeed with valid config");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn print_config_dumps_effective_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = valid_config(&temp_dir);

    let output = run_amora_server(&["--config", &config_path, "--print-config"]);
    assert!(output.status.success(), "print-config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"));
    assert!(stdout.contains("paygate:"));
    assert!(stdout.contains("smoke-test-secret"));
}

#[test]
fn port_override_shows_in_printed_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = valid_config(&temp_dir);

    let output = run_amora_server(&["--config", &config_path, "--port", "3131", "--print-config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("3131"),
        "CLI port override should appear in effective config: {stdout}"
    );
}

#[test]
fn subcommand_help_works() {
    for sub in ["run", "check"] {
        let output = run_amora_server(&[sub, "--help"]);
        assert!(output.status.success(), "{sub} --help should succeed");
    }
}
