//! CLI integration tests for the SalesDesk command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Context management round-trips through the config file
//!
//! Note: These tests do not require running backends. Each test that
//! touches configuration gets its own config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the salesdesk binary.
fn salesdesk() -> Command {
    let mut cmd = Command::cargo_bin("salesdesk").unwrap();
    cmd.env_remove("SALESDESK_CONTEXT")
        .env_remove("SALESDESK_PASSWORD");
    cmd
}

/// Get a command bound to an isolated config directory.
fn salesdesk_in(dir: &TempDir) -> Command {
    let mut cmd = salesdesk();
    cmd.env("SALESDESK_CONFIG_DIR", dir.path());
    cmd
}

fn with_local_context() -> TempDir {
    let dir = TempDir::new().unwrap();
    salesdesk_in(&dir)
        .args([
            "config",
            "set-context",
            "local",
            "--accounts",
            "http://localhost:3001",
            "--catalog",
            "http://localhost:5000",
        ])
        .assert()
        .success();
    dir
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    salesdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SalesDesk"));
}

#[test]
fn test_version_displays() {
    salesdesk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("salesdesk"));
}

#[test]
fn test_help_lists_subcommands() {
    salesdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("whoami"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("products"))
        .stdout(predicate::str::contains("sales"))
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("config"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Flag Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_verbose_flag_accepted() {
    salesdesk().args(["--verbose", "--help"]).assert().success();
}

#[test]
fn test_json_flag_accepted() {
    salesdesk().args(["--json", "--help"]).assert().success();
}

#[test]
fn test_context_flag_accepted() {
    salesdesk()
        .args(["--context", "mycontext", "--help"])
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand Help Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_login_help() {
    salesdesk()
        .args(["login", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--password"));
}

#[test]
fn test_products_help() {
    salesdesk()
        .args(["products", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("get"));
}

#[test]
fn test_config_help() {
    salesdesk()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set-context"))
        .stdout(predicate::str::contains("use-context"))
        .stdout(predicate::str::contains("show"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalid Input Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    salesdesk()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_login_requires_email() {
    salesdesk()
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("EMAIL"));
}

#[test]
fn test_product_id_must_be_numeric() {
    salesdesk()
        .args(["products", "get", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_command_without_context_fails() {
    let dir = TempDir::new().unwrap();
    salesdesk_in(&dir)
        .args(["products", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no context selected"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Subcommand Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_set_context_becomes_current() {
    let dir = with_local_context();

    salesdesk_in(&dir)
        .args(["config", "get-contexts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*         local"));

    assert!(dir.path().join("client.yaml").exists());
}

#[test]
fn test_config_show_json() {
    let dir = with_local_context();

    salesdesk_in(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"accounts\": \"http://localhost:3001\""))
        .stdout(predicate::str::contains("\"catalog\": \"http://localhost:5000\""))
        .stdout(predicate::str::contains("\"timeout_secs\": 15"));
}

#[test]
fn test_set_context_requires_accounts() {
    let dir = TempDir::new().unwrap();
    salesdesk_in(&dir)
        .args(["config", "set-context", "local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--accounts"));
}

#[test]
fn test_use_unknown_context_fails() {
    let dir = with_local_context();
    salesdesk_in(&dir)
        .args(["config", "use-context", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_unknown_context_flag_fails() {
    let dir = with_local_context();
    salesdesk_in(&dir)
        .args(["--context", "missing", "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("context 'missing' not found"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_whoami_without_session() {
    let dir = with_local_context();
    salesdesk_in(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_whoami_json_without_session() {
    let dir = with_local_context();
    salesdesk_in(&dir)
        .args(["--json", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"signed_in\": false"));
}

#[test]
fn test_whoami_reads_stored_session() {
    let dir = with_local_context();
    let sessions = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions).unwrap();
    std::fs::write(
        sessions.join("local.json"),
        r#"{
  "token": "abc",
  "user": "{\"id\":\"1\",\"name\":\"Vera\",\"email\":\"vera@example.com\",\"role\":\"vendedor\"}"
}"#,
    )
    .unwrap();

    salesdesk_in(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vera <vera@example.com>"))
        .stdout(predicate::str::contains("Vendedor"));
}

#[test]
fn test_users_requires_admin_role() {
    let dir = with_local_context();
    let sessions = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions).unwrap();
    std::fs::write(
        sessions.join("local.json"),
        r#"{
  "token": "abc",
  "user": "{\"id\":\"1\",\"name\":\"Vera\",\"email\":\"vera@example.com\",\"role\":\"Consultor\"}"
}"#,
    )
    .unwrap();

    salesdesk_in(&dir)
        .args(["users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Administrador"));
}

#[test]
fn test_logout_removes_session_file() {
    let dir = with_local_context();
    let sessions = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions).unwrap();
    let file = sessions.join("local.json");
    std::fs::write(&file, r#"{"token": "abc"}"#).unwrap();

    salesdesk_in(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    assert!(!file.exists());
}
