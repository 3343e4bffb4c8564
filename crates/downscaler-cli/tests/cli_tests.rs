//! CLI integration tests

use std::process::Command;

fn kds(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-p", "downscaler-cli", "--quiet", "--"])
        .args(args)
        .env_remove("UPSCALE_PERIOD")
        .env_remove("DEFAULT_UPTIME")
        .env_remove("DOWNSCALE_PERIOD")
        .env_remove("DEFAULT_DOWNTIME")
        .env_remove("DEFAULT_TIMEZONE")
        .env_remove("DEFAULT_WEEKFRAME")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = kds(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("resolve"), "Should show resolve command");
    assert!(stdout.contains("validate"), "Should show validate command");
    assert!(stdout.contains("--format"), "Should show format option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = kds(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("kds"), "Should show binary name");
}

/// Test resolve subcommand help
#[test]
fn test_resolve_help() {
    let output = kds(&["resolve", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Resolve help should succeed");
    assert!(
        stdout.contains("--annotation"),
        "Should show annotation option"
    );
    assert!(
        stdout.contains("--ns-annotation"),
        "Should show ns-annotation option"
    );
    assert!(stdout.contains("--downtime"), "Should show downtime flag");
    assert!(stdout.contains("--at"), "Should show at option");
}

/// Test resolving a downtime annotation at a fixed instant
#[test]
fn test_resolve_downtime_annotation() {
    // Wednesday noon UTC, inside the configured downtime
    let output = kds(&[
        "--format",
        "json",
        "resolve",
        "--annotation",
        "downscaler/downtime=Mon-Fri 08:00-17:00 UTC",
        "--at",
        "2024-06-12T12:00:00Z",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Resolve should succeed: {stdout}");
    assert!(
        stdout.contains("\"scaling\": \"down\""),
        "Should resolve to down: {stdout}"
    );
}

/// Test that the default scope alone resolves to up
#[test]
fn test_resolve_defaults_to_up() {
    let output = kds(&["--format", "json", "resolve", "--at", "2024-06-12T12:00:00Z"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Resolve should succeed: {stdout}");
    assert!(
        stdout.contains("\"scaling\": \"up\""),
        "Should resolve to up: {stdout}"
    );
    assert!(
        stdout.contains("\"excluded\": false"),
        "Should not be excluded: {stdout}"
    );
}

/// Test that workload annotations beat CLI flags
#[test]
fn test_resolve_annotation_beats_flag() {
    let output = kds(&[
        "--format",
        "json",
        "resolve",
        "--annotation",
        "downscaler/uptime=always",
        "--downtime",
        "always",
        "--at",
        "2024-06-12T12:00:00Z",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Resolve should succeed: {stdout}");
    assert!(
        stdout.contains("\"scaling\": \"up\""),
        "Workload uptime should win: {stdout}"
    );
}

/// Test that invalid annotation values fail resolution
#[test]
fn test_resolve_invalid_annotation() {
    let output = kds(&[
        "resolve",
        "--annotation",
        "downscaler/downtime=not a timespan",
    ]);

    assert!(!output.status.success(), "Invalid annotation should fail");
}

/// Test that conflicting flags fail resolution
#[test]
fn test_resolve_conflicting_flags() {
    let output = kds(&["resolve", "--uptime", "always", "--downtime", "never"]);

    assert!(!output.status.success(), "Conflicting flags should fail");
}

/// Test validating timespan expressions
#[test]
fn test_validate_spans() {
    let output = kds(&["validate", "Mon-Fri 08:00-17:00 UTC", "always"]);
    assert!(output.status.success(), "Valid spans should pass");

    let output = kds(&["validate", "Mon-Funday 08:00-17:00 UTC"]);
    assert!(!output.status.success(), "Invalid weekday should fail");
}

/// Test validating annotations as one scope
#[test]
fn test_validate_annotations() {
    let output = kds(&[
        "validate",
        "--annotation",
        "downscaler/grace-period=15m",
        "--annotation",
        "downscaler/downscale-replicas=50%",
    ]);
    assert!(output.status.success(), "Valid annotations should pass");

    let output = kds(&[
        "validate",
        "--annotation",
        "downscaler/uptime=always",
        "--annotation",
        "downscaler/downtime=never",
    ]);
    assert!(
        !output.status.success(),
        "Incompatible annotations should fail"
    );
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = kds(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}
