//! Integration tests for the `schoolhub` CLI binary.
//!
//! Parsing, help, completions and error handling run without a backend;
//! the round-trip tests point `--base-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `schoolhub` binary with env isolation.
///
/// Clears all `SCHOOLHUB_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn schoolhub_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("schoolhub");
    cmd.env("HOME", "/tmp/schoolhub-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/schoolhub-cli-test-nonexistent")
        .env_remove("SCHOOLHUB_PROFILE")
        .env_remove("SCHOOLHUB_BASE_URL")
        .env_remove("SCHOOLHUB_SESSION")
        .env_remove("SCHOOLHUB_OUTPUT")
        .env_remove("SCHOOLHUB_INSECURE")
        .env_remove("SCHOOLHUB_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let base_url = format!("{}/api", server.uri());
    let args: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
    tokio::task::spawn_blocking(move || {
        schoolhub_cmd()
            .args(["--base-url", &base_url, "--session-cookie", "connect.sid=test"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

async fn mount_events(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "e1", "title": "Sports Day", "date": "2025-03-01", "category": "sports" },
            { "_id": "e2", "title": "Science Fair", "date": "2025-02-10", "category": "academic" },
            { "_id": "e3", "title": "PTA Meeting", "date": "2025-04-05" }
        ])))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = schoolhub_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    schoolhub_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("school portal")
            .and(predicate::str::contains("announcements"))
            .and(predicate::str::contains("library"))
            .and(predicate::str::contains("attendance")),
    );
}

#[test]
fn test_version_flag() {
    schoolhub_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schoolhub"));
}

#[test]
fn test_subcommand_help_lists_actions() {
    schoolhub_cmd()
        .args(["library", "requests", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("approve").and(predicate::str::contains("reject")));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_for_each_shell() {
    for shell in ["bash", "zsh", "fish"] {
        schoolhub_cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    schoolhub_cmd()
        .arg("gradebook")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_output_format() {
    schoolhub_cmd()
        .args(["--output", "xml", "events", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_invalid_sort_order() {
    schoolhub_cmd()
        .args(["events", "list", "--sort", "newest"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("newest"));
}

#[test]
fn test_no_backend_configured() {
    schoolhub_cmd()
        .args(["events", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_unknown_profile() {
    schoolhub_cmd()
        .args(["--profile", "campus", "events", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'campus' not found"));
}

#[test]
fn test_config_show_without_file() {
    schoolhub_cmd().args(["config", "show"]).assert().success();
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test]
async fn test_events_list_plain_sorted_by_date() {
    let server = MockServer::start().await;
    mount_events(&server).await;

    let output = run_against(&server, &["-o", "plain", "events", "list", "--sort", "date-asc"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "e2\ne1\ne3\n");
}

#[tokio::test]
async fn test_sort_by_title() {
    let server = MockServer::start().await;
    mount_events(&server).await;

    let output = run_against(&server, &["-o", "plain", "events", "list", "--sort", "title"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "e3\ne2\ne1\n");
}

#[tokio::test]
async fn test_table_id_resolves_with_get() {
    let long_id = "65f0c2a1b4d3e8f901234567";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/library/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": long_id, "title": "Dune", "availableCopies": 2, "totalCopies": 3 },
            { "_id": "65f0c2a1b4d3e8f901234568" }
        ])))
        .mount(&server)
        .await;

    let listed = run_against(&server, &["-o", "table", "library", "books", "list"]).await;
    assert!(listed.status.success(), "{}", combined_output(&listed));
    assert!(String::from_utf8_lossy(&listed.stdout).contains(long_id));

    let shown = run_against(&server, &["library", "books", "get", long_id]).await;
    assert!(shown.status.success(), "{}", combined_output(&shown));
    assert!(String::from_utf8_lossy(&shown.stdout).contains("Dune"));
}

#[tokio::test]
async fn test_announcement_create_sends_recipients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/announcements"))
        .and(body_json(json!({
            "title": "Exam Notice",
            "content": "Finals start 3 March",
            "recipientType": "students",
            "targetClasses": ["10A", "10B"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "announcement": { "_id": "a1", "title": "Exam Notice" },
            "message": "Created",
            "queuedCount": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &[
            "announcements",
            "create",
            "--title",
            "Exam Notice",
            "--content",
            "Finals start 3 March",
            "--recipients",
            "students",
            "--classes",
            "10A,10B",
        ],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Created"));
}

#[tokio::test]
async fn test_list_sends_server_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/announcements"))
        .and(query_param("category", "exams"))
        .and(query_param("priority", "high"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "announcements": [
                { "_id": "a1", "title": "Board exams", "category": "exams", "priority": "high" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &["-o", "json", "announcements", "list", "-c", "exams", "--priority", "high"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["title"], "Board exams");
}

#[tokio::test]
async fn test_delete_reports_server_message() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Event removed" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["--yes", "events", "delete", "e1"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Event removed"));
}

#[tokio::test]
async fn test_delete_requires_confirmation_when_piped() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["events", "delete", "e1"]).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("requires confirmation"));
}

#[tokio::test]
async fn test_unknown_id_points_at_list_command() {
    let server = MockServer::start().await;
    mount_events(&server).await;

    let output = run_against(&server, &["events", "get", "ghost"]).await;

    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("'ghost' not found"), "{text}");
    assert!(text.contains("events list"), "{text}");
}

#[tokio::test]
async fn test_expired_session_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/library/books"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Not authenticated" })),
        )
        .mount(&server)
        .await;

    let output = run_against(&server, &["library", "books", "list"]).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test]
async fn test_attendance_export_writes_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendance/summary/export"))
        .and(query_param("class", "10A"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename=\"attendance-10A.xlsx\"",
                )
                .set_body_bytes(b"PK\x03\x04fake".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("june.xlsx");
    let out_arg = out.to_str().unwrap();

    let output = run_against(
        &server,
        &["attendance", "export", "-f", "class=10A", "-O", out_arg],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read(&out).unwrap(), b"PK\x03\x04fake");

    // A second run refuses to clobber without --force.
    let again = run_against(
        &server,
        &["attendance", "export", "-f", "class=10A", "-O", out_arg],
    )
    .await;
    assert_eq!(again.status.code(), Some(2));
    assert!(combined_output(&again).contains("--force"));
}
