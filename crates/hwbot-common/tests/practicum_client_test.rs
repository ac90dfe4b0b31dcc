//! Integration tests for the review API client against a local HTTP stub.

use hwbot_common::{check_response, Cursor, ErrorClass, HwbotError, PracticumClient, PracticumClientConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves exactly one HTTP response and hands back the raw request head.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });

    (format!("http://{addr}/api/user_api/homework_statuses/"), rx)
}

fn client_for(endpoint: String) -> PracticumClient {
    let config = PracticumClientConfig::new("practicum-token")
        .with_endpoint(endpoint)
        .with_timeout(5);
    PracticumClient::new(config).unwrap()
}

#[tokio::test]
async fn test_successful_poll_sends_cursor_and_oauth_header() {
    let (endpoint, request) = serve_once(
        "200 OK",
        r#"{"homeworks":[{"homework_name":"proj1","status":"reviewing"}],"current_date":1000}"#,
    )
    .await;

    let value = client_for(endpoint).get_api_answer(Cursor(1234)).await.unwrap();
    let batch = check_response(value).unwrap();
    assert_eq!(batch.homeworks.len(), 1);
    assert_eq!(batch.current_date, Some(1000));

    let request = request.await.unwrap();
    assert!(request.starts_with("GET /api/user_api/homework_statuses/?from_date=1234 "));
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: oauth practicum-token"));
}

#[tokio::test]
async fn test_non_ok_status_carries_code() {
    let (endpoint, _request) = serve_once("503 Service Unavailable", "{}").await;

    let err = client_for(endpoint).get_api_answer(Cursor::EPOCH).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transport);
    assert_eq!(err.status_code(), Some(503));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_other_success_codes_are_rejected_too() {
    let (endpoint, _request) = serve_once("202 Accepted", "{}").await;

    let err = client_for(endpoint).get_api_answer(Cursor::EPOCH).await.unwrap_err();
    assert!(matches!(
        err,
        HwbotError::Practicum {
            status_code: Some(202),
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_json_body_is_a_transport_error() {
    let (endpoint, _request) = serve_once("200 OK", "<html>maintenance</html>").await;

    let err = client_for(endpoint).get_api_answer(Cursor::EPOCH).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transport);
    assert!(err.to_string().contains("non-JSON"));
}
