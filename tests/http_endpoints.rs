//! HTTP endpoints over a loopback socket

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use logtree_app::{Settings, ViewerSession};
use logtree_core::TimeWindow;
use logtree_web::{serve, WebState};

async fn start(source: Option<PathBuf>, keepalive: Duration) -> (SocketAddr, Arc<ViewerSession>) {
    let session = Arc::new(ViewerSession::new(source, TimeWindow::default()));
    let state = WebState::new(Arc::clone(&session), &Settings::default()).with_keepalive(keepalive);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { serve(listener, state).await.expect("serve app") });
    (addr, session)
}

async fn send_raw(addr: SocketAddr, path: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect server");
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

/// Read from an open stream until `needle` shows up
async fn read_until(stream: &mut TcpStream, seen: &mut String, needle: &str) {
    let mut buf = [0u8; 4096];
    tokio::time::timeout(Duration::from_secs(5), async {
        while !seen.contains(needle) {
            let n = stream.read(&mut buf).await.expect("read stream");
            assert!(n > 0, "stream closed before {:?}", needle);
            seen.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {:?}", needle));
}

fn recent_log() -> NamedTempFile {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{stamp} - INFO - Planner - started").unwrap();
    writeln!(file, "\t{stamp} - ERROR - Planner - \\033[31mboom\\033[0m").unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_document_renders_tree() {
    let file = recent_log();
    let (addr, _) = start(Some(file.path().to_path_buf()), Duration::from_secs(30)).await;

    let (status, head, body) = send_raw(addr, "/").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: text/html"));
    assert_eq!(body.matches(r#"class="entry""#).count(), 2);
    assert!(body.contains(r#"id="visible-count">2<"#));
    assert!(body.contains(r#"data-parent=""#));
}

#[tokio::test]
async fn test_document_without_source_is_info_page() {
    let (addr, _) = start(None, Duration::from_secs(30)).await;
    let (status, _, body) = send_raw(addr, "/").await;
    assert_eq!(status, 200);
    assert!(body.contains("No log file was configured."));
}

#[tokio::test]
async fn test_missing_source_is_plain_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, _) = start(Some(dir.path().join("gone.log")), Duration::from_secs(30)).await;

    let (status, head, body) = send_raw(addr, "/").await;
    assert_eq!(status, 500);
    assert!(head.to_ascii_lowercase().contains("content-type: text/plain"));
    assert!(!body.contains("<html"));

    // the server keeps serving
    let (status, _, _) = send_raw(addr, "/static/style.css").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_api_tree_json() {
    let file = recent_log();
    let (addr, _) = start(Some(file.path().to_path_buf()), Duration::from_secs(30)).await;

    let (status, _, body) = send_raw(addr, "/api/tree").await;
    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).expect("tree json");
    assert_eq!(json["stats"]["totalRecords"], 2);
    assert_eq!(json["stats"]["recordsInWindow"], 2);
    let root = &json["entries"][0];
    assert_eq!(root["loggerName"], "Planner");
    assert_eq!(root["logLevel"], "INFO");
    let child_raw = root["children"][0]["rawText"].as_str().unwrap();
    assert!(child_raw.contains("\\033[31mboom"));
}

#[tokio::test]
async fn test_static_assets() {
    let (addr, _) = start(None, Duration::from_secs(30)).await;

    let (status, head, body) = send_raw(addr, "/static/style.css").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: text/css"));
    assert!(body.contains(".level-error"));

    let (status, _, body) = send_raw(addr, "/static/client.js").await;
    assert_eq!(status, 200);
    assert!(body.contains("EventSource"));
}

#[tokio::test]
async fn test_events_stream_delivers_invalidation() {
    let file = recent_log();
    let (addr, session) = start(Some(file.path().to_path_buf()), Duration::from_secs(30)).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET /events HTTP/1.1\r\nHost: {addr}\r\nAccept: text/event-stream\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while session.viewer_count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("viewer registered");

    let generation = session.invalidate().await;

    let mut seen = String::new();
    read_until(&mut stream, &mut seen, "event: invalidate").await;
    read_until(&mut stream, &mut seen, &format!("data: {}", generation)).await;
    assert!(seen.to_ascii_lowercase().contains("content-type: text/event-stream"));
}

#[tokio::test]
async fn test_events_stream_opens_with_generation_after_missed_change() {
    let file = recent_log();
    let (addr, session) = start(Some(file.path().to_path_buf()), Duration::from_secs(30)).await;

    // page rendered at generation 0, then the file changes with no viewer attached
    let (_, _, body) = send_raw(addr, "/").await;
    assert!(body.contains(r#""generation":0"#));
    let generation = session.invalidate().await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET /events HTTP/1.1\r\nHost: {addr}\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut seen = String::new();
    read_until(&mut stream, &mut seen, "event: hello").await;
    read_until(&mut stream, &mut seen, &format!("data: {}", generation)).await;
}

#[tokio::test]
async fn test_events_stream_keepalive() {
    let (addr, _) = start(None, Duration::from_millis(50)).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET /events HTTP/1.1\r\nHost: {addr}\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut seen = String::new();
    read_until(&mut stream, &mut seen, "event: keepalive").await;
}

#[tokio::test]
async fn test_disconnect_unregisters_viewer() {
    let (addr, session) = start(None, Duration::from_millis(50)).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET /events HTTP/1.1\r\nHost: {addr}\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut seen = String::new();
    read_until(&mut stream, &mut seen, "event: keepalive").await;
    assert_eq!(session.viewer_count(), 1);

    drop(stream);
    tokio::time::timeout(Duration::from_secs(5), async {
        while session.viewer_count() != 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("viewer unregistered after disconnect");
}
