//! Client fetch, output naming and batch behavior.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rawhttp::client::batch::{self, BatchSummary, UrlOutcome};
use rawhttp::client::output::{output_filename, save};
use rawhttp::client::{ClientError, fetch, fetch_url};
use rawhttp::config::{ClientConfig, ServerConfig};
use rawhttp::http::parser::DecodeError;
use rawhttp::http::request::encode_request;
use rawhttp::logging::init_test_logging;
use rawhttp::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// One-shot server that records the request and replies with `reply`.
async fn canned(reply: Vec<u8>) -> (SocketAddr, oneshot::Receiver<Vec<u8>>) {
    init_test_logging();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        buf.truncate(n);
        let _ = tx.send(buf);
        let _ = socket.write_all(&reply).await;
        let _ = socket.shutdown().await;

        // Drain until the client hangs up so closing never resets the reply
        let mut sink = [0u8; 1024];
        while let Ok(n) = socket.read(&mut sink).await {
            if n == 0 {
                break;
            }
        }
    });

    (addr, rx)
}

/// Real server over `root`, left running for the rest of the test.
async fn serve(root: &Path) -> SocketAddr {
    init_test_logging();

    fs::write(root.join("index.html"), "hi").unwrap();
    fs::write(root.join("not-found.html"), "not here").unwrap();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("a/b.html"), "nested").unwrap();

    let cfg = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        root_directory: root.to_path_buf(),
        ..ServerConfig::default()
    };
    let server = Server::bind(Arc::new(cfg)).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve(std::future::pending()));
    addr
}

fn client_config(output_dir: &Path) -> ClientConfig {
    ClientConfig {
        output_dir: output_dir.to_path_buf(),
        ..ClientConfig::default()
    }
}

#[test]
fn test_output_filename() {
    assert_eq!(output_filename("/"), PathBuf::from("index.html"));
    assert_eq!(output_filename("/page.html"), PathBuf::from("page.html"));
    assert_eq!(output_filename("/a/b.html"), PathBuf::from("a/b.html"));
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();

    let file = save(dir.path(), "/a/b/c.txt", b"raw").await.unwrap();

    assert_eq!(file, dir.path().join("a/b/c.txt"));
    assert_eq!(fs::read(file).unwrap(), b"raw");
}

#[tokio::test]
async fn test_save_refuses_to_escape_output_dir() {
    let dir = tempfile::tempdir().unwrap();

    let err = save(dir.path(), "/../escape.txt", b"raw").await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_fetch_sends_encoded_request() {
    let (addr, request) = canned(b"HTTP/1.0 200 OK\r\n\r\nbody".to_vec()).await;

    let fetched = fetch("127.0.0.1", addr.port(), "/x.html", &ClientConfig::default())
        .await
        .unwrap();

    let sent = request.await.unwrap();
    assert_eq!(sent, encode_request("127.0.0.1", addr.port(), "/x.html").into_bytes());
    assert_eq!(fetched.response.status_code, 200);
    assert_eq!(&fetched.response.body[..], b"body");
}

#[tokio::test]
async fn test_fetch_uses_configured_agent() {
    let (addr, request) = canned(b"HTTP/1.0 200 OK\r\n\r\n".to_vec()).await;
    let cfg = ClientConfig {
        user_agent: "rawhttp-test".into(),
        accept: "text/plain".into(),
        ..ClientConfig::default()
    };

    fetch("127.0.0.1", addr.port(), "/", &cfg).await.unwrap();

    let sent = String::from_utf8(request.await.unwrap()).unwrap();
    assert!(sent.contains("\r\nUser-Agent: rawhttp-test\r\n"));
    assert!(sent.contains("\r\nAccept: text/plain\r\n"));
}

#[tokio::test]
async fn test_fetch_malformed_response() {
    let (addr, _) = canned(b"this is not http".to_vec()).await;

    let err = fetch("127.0.0.1", addr.port(), "/", &ClientConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::MalformedResponse(DecodeError::MissingBoundary)
    ));
}

#[tokio::test]
async fn test_fetch_bad_status_code() {
    let (addr, _) = canned(b"HTTP/1.0 abc Nope\r\n\r\n".to_vec()).await;

    let err = fetch("127.0.0.1", addr.port(), "/", &ClientConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::MalformedResponse(DecodeError::InvalidStatusCode(_))
    ));
}

#[tokio::test]
async fn test_fetch_reads_at_most_read_limit() {
    let mut reply = b"HTTP/1.0 200 OK\r\n\r\n".to_vec();
    reply.extend(std::iter::repeat_n(b'x', 5000));
    let (addr, _) = canned(reply).await;

    let fetched = fetch("127.0.0.1", addr.port(), "/", &ClientConfig::default())
        .await
        .unwrap();

    assert!(fetched.raw.len() <= 1024);
    assert!(fetched.response.body.len() < 5000);
    assert!(fetched.response.body.iter().all(|b| *b == b'x'));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = fetch("127.0.0.1", port, "/", &ClientConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Connection { .. }));
}

#[tokio::test]
async fn test_fetch_unresolvable_host() {
    let err = fetch("no-such-host.invalid", 80, "/", &ClientConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Resolve { .. }));
}

#[tokio::test]
async fn test_fetch_url_invalid() {
    let err = fetch_url("http://:8080/", &ClientConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_process_saves_raw_response_for_root() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let addr = serve(root.path()).await;

    let url = format!("http://127.0.0.1:{}/", addr.port());
    let outcome = batch::process(&url, &client_config(out.path())).await.unwrap();

    let expected = out.path().join("index.html");
    assert_eq!(outcome, UrlOutcome::Saved(expected.clone()));
    assert_eq!(fs::read(expected).unwrap(), b"HTTP/1.0 200 OK\r\n\r\nhi");
}

#[tokio::test]
async fn test_process_saves_nested_path() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let addr = serve(root.path()).await;

    let url = format!("127.0.0.1:{}/a/b.html", addr.port());
    batch::process(&url, &client_config(out.path())).await.unwrap();

    assert_eq!(
        fs::read(out.path().join("a/b.html")).unwrap(),
        b"HTTP/1.0 200 OK\r\n\r\nnested"
    );
}

#[tokio::test]
async fn test_process_does_not_save_failures() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let addr = serve(root.path()).await;

    let url = format!("127.0.0.1:{}/missing.html", addr.port());
    let outcome = batch::process(&url, &client_config(out.path())).await.unwrap();

    assert_eq!(
        outcome,
        UrlOutcome::Rejected {
            status_code: 404,
            status_phrase: "Not Found".into()
        }
    );
    assert!(!out.path().join("missing.html").exists());
}

#[tokio::test]
async fn test_batch_continues_after_failures() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let addr = serve(root.path()).await;

    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_port = closed.local_addr().unwrap().port();
    drop(closed);

    let urls = vec![
        "http://".to_string(),
        format!("127.0.0.1:{}/missing.html", addr.port()),
        format!("127.0.0.1:{}/", closed_port),
        format!("127.0.0.1:{}/", addr.port()),
        format!("127.0.0.1:{}/a/b.html", addr.port()),
    ];
    let summary = batch::run(&urls, &client_config(out.path())).await;

    assert_eq!(
        summary,
        BatchSummary {
            saved: 2,
            rejected: 1,
            failed: 2,
            interrupted: false
        }
    );
    assert!(out.path().join("index.html").exists());
    assert!(out.path().join("a/b.html").exists());
}

#[tokio::test]
async fn test_interrupt_stops_batch_and_closes_stalled_connection() {
    init_test_logging();

    let stalled = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let stalled_port = stalled.local_addr().unwrap().port();
    let later = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let later_port = later.local_addr().unwrap().port();

    // Reads the request, never replies, then waits for the client to hang up
    let (interrupt, interrupted) = oneshot::channel::<()>();
    let peer = tokio::spawn(async move {
        let (mut socket, _) = stalled.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        assert!(socket.read(&mut buf).await.unwrap() > 0);
        let _ = interrupt.send(());

        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    let out = tempfile::tempdir().unwrap();
    let urls = vec![
        format!("127.0.0.1:{}/slow.html", stalled_port),
        format!("127.0.0.1:{}/", later_port),
    ];
    let summary = batch::run_until(&urls, &client_config(out.path()), async {
        let _ = interrupted.await;
    })
    .await;

    assert_eq!(
        summary,
        BatchSummary {
            interrupted: true,
            ..BatchSummary::default()
        }
    );

    // The stalled socket sees EOF once the fetch is dropped
    tokio::time::timeout(Duration::from_secs(5), peer)
        .await
        .unwrap()
        .unwrap();

    // The next URL was never requested
    let next = tokio::time::timeout(Duration::from_millis(200), later.accept()).await;
    assert!(next.is_err());
    assert!(!out.path().join("slow.html").exists());
}
