//! Smoke tests to verify command wiring and configuration errors

use assert_cmd::Command;
use predicates::prelude::*;

/// The binary with every dbchat variable cleared.
fn dbchat() -> Command {
    let mut cmd = Command::cargo_bin("dbchat").unwrap();
    for var in ["DATABASE_URL", "GOOGLE_API_KEY", "GEMINI_MODEL", "DBCHAT_BIND"] {
        cmd.env_remove(var);
    }
    // Keep a developer's .env out of the picture
    cmd.current_dir(std::env::temp_dir());
    cmd
}

// === Help ===

#[test]
fn test_top_level_help_lists_commands() {
    dbchat()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("wait-db")
                .and(predicate::str::contains("init-db"))
                .and(predicate::str::contains("serve"))
                .and(predicate::str::contains("start")),
        );
}

#[test]
fn test_wait_db_help() {
    dbchat()
        .args(["wait-db", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seconds to sleep between attempts"));
}

#[test]
fn test_serve_help() {
    dbchat()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"));
}

#[test]
fn test_start_help_includes_serve_options() {
    dbchat()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind").and(predicate::str::contains("--interval-secs")));
}

// === Configuration errors ===

#[test]
fn test_wait_db_without_database_url_fails() {
    dbchat()
        .arg("wait-db")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL is not set"));
}

#[test]
fn test_init_db_with_blank_database_url_fails() {
    dbchat()
        .arg("init-db")
        .env("DATABASE_URL", "   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL is not set"));
}

#[test]
fn test_wait_db_with_malformed_database_url_fails_fast() {
    // Without validation this would poll forever.
    dbchat()
        .arg("wait-db")
        .env("DATABASE_URL", "not a url")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL is invalid"));
}

#[test]
fn test_serve_without_api_key_fails_before_connecting() {
    // Port 1 refuses connections; the key check must come first.
    dbchat()
        .arg("serve")
        .env("DATABASE_URL", "postgres://nobody@127.0.0.1:1/none")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_API_KEY is not set"));
}

#[test]
fn test_ask_rejects_empty_question() {
    dbchat()
        .args(["ask", "   "])
        .env("DATABASE_URL", "postgres://nobody@127.0.0.1:1/none")
        .env("GOOGLE_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    dbchat()
        .args(["serve", "--bind", "not-an-address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
