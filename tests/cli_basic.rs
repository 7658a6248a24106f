//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and that input
//! errors are reported with the right exit code before any page is loaded.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `pagetext` binary, isolated from any
/// user config file.
fn pagetext() -> Command {
    let mut cmd = Command::cargo_bin("pagetext").expect("binary 'pagetext' should be built");
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/pagetext-test")
        .env("RUST_LOG", "warn");
    cmd
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    pagetext()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: pagetext"))
        .stdout(predicate::str::contains("url"))
        .stdout(predicate::str::contains("pdf"));
}

#[test]
fn version_flag_shows_semver() {
    pagetext()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^pagetext \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    pagetext()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: pagetext"));
}

#[test]
fn invalid_subcommand_fails() {
    pagetext()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn url_help() {
    pagetext()
        .args(["url", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--renderer"))
        .stdout(predicate::str::contains("--retries"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn pdf_help() {
    pagetext()
        .args(["pdf", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tolerance"))
        .stdout(predicate::str::contains("--heading-threshold"));
}

// ─── Input errors ────────────────────────────────────────────────────────────

#[test]
fn invalid_url_exits_with_client_error() {
    pagetext()
        .args(["url", "notaurl"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            r#"{"error":"Invalid URL provided: notaurl"}"#,
        ));
}

#[test]
fn invalid_url_text_format() {
    pagetext()
        .args(["url", "ftp://example.com", "--format", "text"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error: Invalid URL provided"));
}

#[test]
fn unknown_renderer_is_rejected() {
    pagetext()
        .args(["url", "https://example.com", "--renderer", "lynx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown renderer"));
}

#[test]
fn missing_pdf_fails() {
    pagetext()
        .args(["pdf", "/nonexistent/pagetext/missing.pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PDF processing failed"));
}

#[test]
fn non_positive_tolerance_is_rejected() {
    pagetext()
        .args(["pdf", "whatever.pdf", "--tolerance", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--tolerance must be positive"));
}

#[test]
fn malformed_config_file_fails() {
    let path = std::env::temp_dir()
        .join(format!("pagetext-bad-config-{}.toml", std::process::id()));
    std::fs::write(&path, "max_retries = \"lots\"\n").unwrap();

    pagetext()
        .args(["url", "https://example.com", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid TOML"));

    let _ = std::fs::remove_file(&path);
}
