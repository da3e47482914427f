//! Integration tests for the `rxdesk` CLI binary.
//!
//! Argument parsing, help output, completions, config handling, and a few
//! end-to-end runs against a mock backend.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rxdesk` binary with env isolation.
///
/// Clears all `RXDESK_*` env vars and points the config file into
/// `config_dir` so tests never touch the user's real configuration.
fn rxdesk_cmd(config_dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rxdesk");
    cmd.env("RXDESK_CONFIG", config_dir.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RXDESK_PROFILE")
        .env_remove("RXDESK_API_URL")
        .env_remove("RXDESK_API_TOKEN")
        .env_remove("RXDESK_OUTPUT")
        .env_remove("RXDESK_INSECURE")
        .env_remove("RXDESK_TIMEOUT")
        .env_remove("RXDESK_PAGE_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = rxdesk_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("pharmacy back office")
            .and(predicate::str::contains("discounts"))
            .and(predicate::str::contains("tcs-records"))
            .and(predicate::str::contains("day-close")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rxdesk"));
}

#[test]
fn test_completions_zsh() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let output = rxdesk_cmd(dir.path()).arg("pharmacists").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("pharmacists"));
}

#[test]
fn test_menu_groups_entities_by_section() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path()).arg("menu").assert().success().stdout(
        predicate::str::contains("Promotions")
            .and(predicate::str::contains("rxdesk discounts"))
            .and(predicate::str::contains("Field Force"))
            .and(predicate::str::contains("rxdesk mr-visits")),
    );
}

#[test]
fn test_fields_describe_conditional_requirements() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .args(["payments", "fields"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("referenceNumber")
                .and(predicate::str::contains("when paymentMode is UPI/Bank Transfer")),
        );
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_list_without_backend_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = rxdesk_cmd(dir.path())
        .args(["discounts", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No backend configured"), "{text}");
    assert!(text.contains("rxdesk config init"), "{text}");
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .args(["config", "init", "--name", "staging"])
        .args(["--url", "https://staging.pharmacy.example/api"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    rxdesk_cmd(dir.path())
        .args(["config", "set", "api_token", "tok-staging"])
        .assert()
        .success();

    rxdesk_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.staging]")
                .and(predicate::str::contains("api_token = \"****\""))
                .and(predicate::str::contains("tok-staging").not()),
        );

    rxdesk_cmd(dir.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staging *"));
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .args(["config", "init", "--name", "local", "--url", "ftp://files.example"])
        .assert()
        .code(2);

    rxdesk_cmd(dir.path())
        .args(["config", "set", "page_size", "0"])
        .assert()
        .code(2);

    rxdesk_cmd(dir.path())
        .args(["config", "use", "prod"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}

#[test]
fn test_config_path_honors_env() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Input checks before any request ─────────────────────────────────

#[test]
fn test_unknown_filter_fails_before_request() {
    let dir = tempfile::tempdir().unwrap();
    rxdesk_cmd(dir.path())
        .args(["--api-url", "http://127.0.0.1:9/api"])
        .args(["discounts", "list", "--filter", "colour=red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown filter"));
}

#[test]
fn test_import_rejects_non_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("products.csv");
    std::fs::write(&csv, "name\nParacetamol\n").unwrap();

    rxdesk_cmd(dir.path())
        .args(["--api-url", "http://127.0.0.1:9/api"])
        .args(["products", "import"])
        .arg(&csv)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("products.csv"));
}

// ── Against a mock backend ──────────────────────────────────────────

fn faqs() -> serde_json::Value {
    json!([
        {"id": 1, "question": "How do I upload a prescription?", "category": "Prescriptions", "status": "Published"},
        {"id": 2, "question": "Do you deliver on Sundays?", "category": "Delivery", "status": "Draft"},
        {"id": 3, "question": "Can I return opened strips?", "category": "Returns", "status": "Published"}
    ])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_filters_in_memory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/faqs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(faqs()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = rxdesk_cmd(dir.path());
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["-o", "plain", "faqs", "list", "-f", "status=published"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n3\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes_removes_the_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/faqs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(faqs()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/faqs/"))
        .and(query_param("id", "2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = rxdesk_cmd(dir.path());
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["--yes", "faqs", "delete", "2"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("FAQ deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_of_row_not_on_page_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/faqs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(faqs()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = rxdesk_cmd(dir.path());
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["--yes", "faqs", "delete", "42"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_form_lists_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = rxdesk_cmd(dir.path());
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["discounts", "create", "--set", "name=Clearance", "--set", "value=-5"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Value must be at least 0"), "{text}");
}
