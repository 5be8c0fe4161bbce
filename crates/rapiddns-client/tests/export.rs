//! HTTP-level tests for the export workflow

use rapiddns_client::{ExportObserver, PollConfig, RapidDnsClient, RapidDnsError};
use rapiddns_core::{ExportQueryType, ExportRequest, ExportTask};
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn fast_poll() -> PollConfig {
    PollConfig::new()
        .interval(Duration::from_millis(10))
        .retry_backoff(Duration::from_millis(10))
}

fn client(server: &MockServer) -> RapidDnsClient {
    RapidDnsClient::builder(Some("secret".into()))
        .base_url(server.uri())
        .poll(fast_poll())
        .build()
        .expect("client")
}

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn task(state: &str, url: Option<&str>) -> serde_json::Value {
    json!({
        "status": "ok",
        "msg": "",
        "data": {"id": "task-1", "status": state, "progress_percent": 50, "download_url": url}
    })
}

/// Answers status reads from a script, repeating the last entry
fn scripted(
    responses: Vec<ResponseTemplate>,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    let calls = Arc::new(AtomicUsize::new(0));
    move |_: &Request| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        responses[n.min(responses.len() - 1)].clone()
    }
}

async fn mount_submit(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/export-data"))
        .and(body_json(json!({
            "query_type": "subdomain",
            "query_input": "example.com",
            "max_results": 0,
            "compress": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status": "ok", "msg": "", "data": {"export_id": "task-1"}}),
        ))
        .expect(1)
        .mount(server)
        .await;
}

#[derive(Default)]
struct Recorder {
    states: Vec<String>,
    failures: usize,
    extracted: usize,
}

impl ExportObserver for Recorder {
    fn progress(&mut self, task: &ExportTask) {
        self.states.push(task.status.clone());
    }

    fn poll_failed(&mut self, _error: &RapidDnsError, _retry_in: Duration) {
        self.failures += 1;
    }

    fn extracted(&mut self, files: &[std::path::PathBuf]) {
        self.extracted = files.len();
    }
}

#[tokio::test]
async fn test_export_workflow_end_to_end() {
    let server = MockServer::start().await;
    mount_submit(&server).await;

    let download = format!("{}/files/task-1.zip", server.uri());
    Mock::given(method("GET"))
        .and(path("/export-data/task-1"))
        .respond_with(scripted(vec![
            ResponseTemplate::new(200).set_body_json(task("pending", None)),
            ResponseTemplate::new(500),
            ResponseTemplate::new(200).set_body_json(task("completed", Some(&download))),
        ]))
        .mount(&server)
        .await;

    let csv = "subdomain,value,type,date\nwww.example.com,1.2.3.4,A,2024-01-01\nmail.example.com,1.2.3.5,A,2024-01-02\n";
    Mock::given(method("GET"))
        .and(path("/files/task-1.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_bytes(&[("export.csv", csv)])))
        .expect(1)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let client = client(&server);
    let mut recorder = Recorder::default();
    let outcome = client
        .export()
        .start(ExportRequest::new(ExportQueryType::Subdomain, "example.com"))
        .output_dir(out.path())
        .parse_records(true)
        .run(&mut recorder)
        .await
        .unwrap();

    assert_eq!(outcome.task_id, "task-1");
    assert_eq!(outcome.download_path, out.path().join("task-1.zip"));
    assert_eq!(outcome.csv_path, Some(out.path().join("export.csv")));
    let records = outcome.records.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records.records[1].subdomain, "mail.example.com");

    assert_eq!(recorder.states, vec!["pending", "completed"]);
    assert_eq!(recorder.failures, 1);
    assert_eq!(recorder.extracted, 1);
}

#[tokio::test]
async fn test_download_does_not_send_api_key() {
    let server = MockServer::start().await;
    mount_submit(&server).await;

    let download = format!("{}/files/out.csv", server.uri());
    Mock::given(method("GET"))
        .and(path("/export-data/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task("completed", Some(&download))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/out.csv"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("x-api-key") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_string("a.example.com,9.9.9.9,A,2024-01-01\n")
            }
        })
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let outcome = client(&server)
        .export()
        .start(ExportRequest::new(ExportQueryType::Subdomain, "example.com"))
        .output_dir(out.path())
        .parse_records(true)
        .run(&mut ())
        .await
        .unwrap();

    assert!(outcome.extracted.is_empty());
    assert_eq!(outcome.records.unwrap().records[0].value, "9.9.9.9");
}

/// Serves one response whose body arrives a byte at a time
async fn trickle_server(body: &'static [u8], gap: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        for byte in body {
            tokio::time::sleep(gap).await;
            socket.write_all(std::slice::from_ref(byte)).await.unwrap();
        }
        socket.flush().await.unwrap();
    });
    format!("http://{addr}/files/slow.csv")
}

#[tokio::test]
async fn test_slow_download_outlives_request_timeout() {
    let body: &'static [u8] = b"a.example.com,1.1.1.1";
    let url = trickle_server(body, Duration::from_millis(100)).await;

    let client = RapidDnsClient::builder(None)
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("slow.csv");

    let written = client.export().download(&url, &dest).await.unwrap();

    assert_eq!(written, body.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn test_failed_task_is_fatal() {
    let server = MockServer::start().await;
    mount_submit(&server).await;
    Mock::given(method("GET"))
        .and(path("/export-data/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task("failed", None)))
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let err = client(&server)
        .export()
        .start(ExportRequest::new(ExportQueryType::Subdomain, "example.com"))
        .output_dir(out.path())
        .run(&mut ())
        .await
        .unwrap_err();
    assert!(matches!(err, RapidDnsError::ExportFailed { ref task_id } if task_id == "task-1"));
}

#[tokio::test]
async fn test_completed_without_url() {
    let server = MockServer::start().await;
    mount_submit(&server).await;
    Mock::given(method("GET"))
        .and(path("/export-data/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task("completed", Some(""))))
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let err = client(&server)
        .export()
        .start(ExportRequest::new(ExportQueryType::Subdomain, "example.com"))
        .output_dir(out.path())
        .run(&mut ())
        .await
        .unwrap_err();
    assert!(matches!(err, RapidDnsError::MissingDownloadUrl { .. }));
}

#[tokio::test]
async fn test_submit_rejects_numeric_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status": 200, "msg": "", "data": {"export_id": "task-1"}}),
        ))
        .mount(&server)
        .await;

    let err = client(&server)
        .export()
        .submit(&ExportRequest::new(ExportQueryType::Subdomain, "example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, RapidDnsError::Api { .. }));
}

#[tokio::test]
async fn test_poll_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export-data/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task("processing", None)))
        .mount(&server)
        .await;

    let poll = fast_poll().deadline(Some(Duration::from_millis(50)));
    let err = client(&server)
        .export()
        .wait_for_completion("task-1", &poll, &mut ())
        .await
        .unwrap_err();
    assert!(matches!(err, RapidDnsError::ExportTimeout { .. }));
}

#[tokio::test]
async fn test_malicious_archive_writes_nothing() {
    let server = MockServer::start().await;
    mount_submit(&server).await;

    let download = format!("{}/files/evil.zip", server.uri());
    Mock::given(method("GET"))
        .and(path("/export-data/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task("completed", Some(&download))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/evil.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(zip_bytes(&[("ok.csv", "x"), ("../evil.txt", "pwned")])),
        )
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("result");
    let err = client(&server)
        .export()
        .start(ExportRequest::new(ExportQueryType::Subdomain, "example.com"))
        .output_dir(&out)
        .run(&mut ())
        .await
        .unwrap_err();

    assert!(matches!(err, RapidDnsError::PathTraversal { .. }));
    assert!(!root.path().join("evil.txt").exists());
    assert!(!out.join("ok.csv").exists());
}
