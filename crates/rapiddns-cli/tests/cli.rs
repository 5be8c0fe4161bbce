//! End-to-end tests for the `rapiddns` binary

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the user's config, key and working directory
fn rapiddns(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rapiddns").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RAPIDDNS_API_KEY")
        .env_remove("RAPIDDNS_BASE_URL")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn records_body() -> serde_json::Value {
    json!({
        "status": 200,
        "msg": "ok",
        "data": {
            "total": 3,
            "status": "ok",
            "data": [
                {"type": "A", "value": "1.2.3.4", "subdomain": "www.example.com", "date": "2024-01-01", "timestamp": "1"},
                {"type": "A", "value": "1.2.3.5", "subdomain": "api.example.com", "date": "2024-01-02", "timestamp": "2"},
                {"type": "CNAME", "value": "edge.example.net", "subdomain": "cdn.example.com", "date": "2024-01-03", "timestamp": "3"}
            ]
        }
    })
}

async fn search_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/example.com"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .mount(&server)
        .await;
    server
}

/// Run a blocking command while the mock server keeps serving
async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    rapiddns(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_config_roundtrip() {
    let home = TempDir::new().unwrap();

    rapiddns(home.path())
        .args(["config", "get-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key is not set."));

    rapiddns(home.path())
        .args(["config", "set-key", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key set successfully."));

    rapiddns(home.path())
        .args(["config", "get-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current API key: abc123"));
}

#[test]
fn test_export_without_key_refuses() {
    let home = TempDir::new().unwrap();
    rapiddns(home.path())
        .args(["export", "start", "example.com"])
        .assert()
        .success()
        .stderr(predicate::str::contains("API key is required"))
        .stderr(predicate::str::contains("https://rapiddns.io/pricing"));
}

#[test]
fn test_unknown_flag_fails() {
    let home = TempDir::new().unwrap();
    rapiddns(home.path())
        .args(["search", "example.com", "--bogus"])
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_prints_json_with_anonymous_warning() {
    let server = search_server().await;
    let home = TempDir::new().unwrap();

    let mut cmd = rapiddns(home.path());
    cmd.args(["--base-url", server.uri().as_str(), "search", "example.com"]);

    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("No API key configured"))
        .stdout(predicate::str::contains("\"total\": 3"))
        .stdout(predicate::str::contains("www.example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_column_text() {
    let server = search_server().await;
    let home = TempDir::new().unwrap();

    let mut cmd = rapiddns(home.path());
    cmd.args([
        "--base-url",
        server.uri().as_str(),
        "-k",
        "secret",
        "search",
        "example.com",
        "--column",
        "ip",
        "-o",
        "text",
    ]);

    run(cmd).await.success().stdout("1.2.3.4\n1.2.3.5\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_silent_extraction_prints_paths() {
    let server = search_server().await;
    let home = TempDir::new().unwrap();

    let mut cmd = rapiddns(home.path());
    cmd.args([
        "--base-url",
        server.uri().as_str(),
        "-k",
        "secret",
        "search",
        "example.com",
        "--extract-subdomains",
        "--extract-ips",
        "--silent",
    ]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("example.com_subdomains.txt"))
        .stdout(predicate::str::contains("example.com_ips.txt"))
        .stdout(predicate::str::contains("example.com_ip_stats.txt"));

    let result = home.path().join("result");
    assert_eq!(
        std::fs::read_to_string(result.join("example.com_subdomains.txt")).unwrap(),
        "api.example.com\ncdn.example.com\nwww.example.com\n"
    );
    assert_eq!(
        std::fs::read_to_string(result.join("example.com_ip_stats.txt")).unwrap(),
        "1.2.3.0/24: 2 IPs\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_csv_file() {
    let server = search_server().await;
    let home = TempDir::new().unwrap();

    let mut cmd = rapiddns(home.path());
    cmd.args([
        "--base-url",
        server.uri().as_str(),
        "-k",
        "secret",
        "search",
        "example.com",
        "-o",
        "csv",
        "-f",
        "out.csv",
    ]);

    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Saved output to"));

    let csv = std::fs::read_to_string(home.path().join("result/out.csv")).unwrap();
    assert!(csv.starts_with("Subdomain,Type,Value,Date,Timestamp\n"));
    assert!(csv.contains("cdn.example.com,CNAME,edge.example.net,2024-01-03,3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_auth_error_exits_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let mut cmd = rapiddns(home.path());
    cmd.args(["--base-url", server.uri().as_str(), "-k", "bad", "search", "example.com"]);

    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("API key is invalid or expired"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_silent_search_still_warns_on_partial_results() {
    let server = MockServer::start().await;
    let page: Vec<_> = (0..100)
        .map(|i| json!({"type": "A", "value": "1.2.3.4", "subdomain": format!("h{i}.example.com")}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/search/example.com"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "msg": "ok",
            "data": {"total": 250, "status": "ok", "data": page}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/example.com"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let mut cmd = rapiddns(home.path());
    cmd.args([
        "--base-url",
        server.uri().as_str(),
        "-k",
        "secret",
        "search",
        "example.com",
        "--silent",
        "--extract-subdomains",
    ]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("example.com_subdomains.txt"))
        .stderr(predicate::str::contains("Stopped fetching at page 2"));

    let subdomains =
        std::fs::read_to_string(home.path().join("result/example.com_subdomains.txt")).unwrap();
    assert_eq!(subdomains.lines().count(), 100);
}

#[test]
fn test_set_key_repairs_corrupt_config() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config/rapiddns");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "api_key = [unterminated").unwrap();

    rapiddns(home.path())
        .args(["config", "set-key", "fresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key set successfully."));

    rapiddns(home.path())
        .args(["config", "get-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current API key: fresh"));
}
