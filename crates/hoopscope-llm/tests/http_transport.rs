// HTTP transport tests against a mock TCP server.
//
// Each test binds a listener on an ephemeral port, answers one request with a
// raw HTTP response and inspects what the client sent.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hoopscope_llm::client::{AnalysisClient, AnalysisError, HttpTransport};
use hoopscope_llm::prompt::system_prompt;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Read one full HTTP request (headers plus `Content-Length` body).
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve a single request with `status_line` and `body`. The handle resolves
/// to the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {status_line}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        request
    });

    (addr, handle)
}

fn client_for(addr: SocketAddr, timeout: Duration) -> AnalysisClient {
    let transport = HttpTransport::new(format!("http://{addr}/v1/chat/completions"), timeout).unwrap();
    AnalysisClient::new(Arc::new(transport), "xai-test-key", "grok-4-latest")
}

const SUCCESS_BODY: &str = r##"{"id":"c1","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"# NBA Team Comparison Analysis\n## Overview\nClose race."},"finish_reason":"stop"}]}"##;

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn success_returns_assistant_text() {
    let (addr, server) = serve_once("200 OK", SUCCESS_BODY).await;
    let client = client_for(addr, Duration::from_secs(5));

    let text = client.complete("compare two teams").await.unwrap();
    assert_eq!(text, "# NBA Team Comparison Analysis\n## Overview\nClose race.");

    let request = server.await.unwrap();
    let lower = request.to_lowercase();
    assert!(request.starts_with("POST /v1/chat/completions "));
    assert!(lower.contains("authorization: bearer xai-test-key"));
    assert!(lower.contains("content-type: application/json"));

    let body_start = request.find("\r\n\r\n").unwrap() + 4;
    let body: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();
    assert_eq!(body["model"], "grok-4-latest");
    assert_eq!(body["stream"], false);
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], system_prompt());
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "compare two teams");
}

#[tokio::test]
async fn server_error_is_remote_with_status_and_body() {
    let (addr, server) = serve_once("500 Internal Server Error", "rate limited").await;
    let client = client_for(addr, Duration::from_secs(5));

    let err = client.complete("prompt").await.unwrap_err();
    assert_eq!(
        err,
        AnalysisError::Remote {
            status: 500,
            body: "rate limited".into()
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn unauthorized_is_remote_error() {
    let (addr, server) = serve_once("401 Unauthorized", r#"{"error":"bad key"}"#).await;
    let client = client_for(addr, Duration::from_secs(5));

    match client.complete("prompt").await {
        Err(AnalysisError::Remote { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected Remote, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let (addr, server) = serve_once("200 OK", "<html>maintenance</html>").await;
    let client = client_for(addr, Duration::from_secs(5));

    assert!(matches!(
        client.complete("prompt").await,
        Err(AnalysisError::MalformedResponse(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr, Duration::from_secs(5));
    assert!(matches!(
        client.complete("prompt").await,
        Err(AnalysisError::Transport(_))
    ));
}

#[tokio::test]
async fn slow_server_times_out_as_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut socket).await;
        tokio::time::sleep(Duration::from_secs(3)).await;
    });

    let client = client_for(addr, Duration::from_millis(200));
    match client.complete("prompt").await {
        Err(AnalysisError::Transport(msg)) => assert!(msg.contains("timed out"), "{msg}"),
        other => panic!("expected Transport timeout, got {other:?}"),
    }
    server.abort();
}
