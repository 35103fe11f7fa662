// tests/integration/tcp_test.rs

//! End-to-end tests over TCP
//! Tests: pipelining and response order, framing limits, half-close, shutdown

use super::fixtures::constants::*;
use super::test_helpers::{TestClient, TestServer};
use beangate::config::Config;
use std::time::Duration;

#[tokio::test]
async fn test_single_request_over_tcp() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    client
        .send(&format!(
            "GET {APP_URL} 'used:%d' {MEMORY_BEAN} HeapMemoryUsage.used"
        ))
        .await;
    let response = client.read_response(1).await;
    assert_eq!(response[0], "OK");
    assert!(response[1].starts_with("used:"));
    assert!(response[1]["used:".len()..].chars().all(|c| c.is_ascii_digit()));

    server.stop().await;
}

#[tokio::test]
async fn test_pipelined_requests_answered_in_order() {
    let server = TestServer::start().await;
    // The first request stalls on a slow connect; later ones must wait their turn.
    server
        .provider
        .endpoint(APP_URL)
        .unwrap()
        .set_connect_delay(Some(Duration::from_millis(200)));

    let mut client = server.client().await;
    let batch = format!(
        "GET {APP_URL} %s {THREADING_BEAN} ThreadCount\n\
         GET {OTHER_URL} %s {THREADING_BEAN} PeakThreadCount\n\
         UNKNOWN foo\n\
         GET {OTHER_URL} 'heap=%s' {MEMORY_BEAN} HeapMemoryUsage.max\n\
         CLOSE {OTHER_URL}\n"
    );
    client.write_raw(batch.as_bytes()).await;

    assert_eq!(client.read_response(1).await, vec!["OK", "17"]);
    assert_eq!(client.read_response(1).await, vec!["OK", "23"]);
    assert_eq!(
        client.read_response(0).await,
        vec!["ERR", "UNKNOWN_CMD", "UNKNOWN"]
    );
    assert_eq!(client.read_response(1).await, vec!["OK", "heap=4096"]);
    assert_eq!(client.read_response(0).await, vec!["OK"]);

    server.stop().await;
}

#[tokio::test]
async fn test_slow_endpoint_does_not_block_other_clients() {
    let server = TestServer::start().await;
    server
        .provider
        .endpoint(APP_URL)
        .unwrap()
        .set_connect_delay(Some(Duration::from_secs(2)));

    let mut slow = server.client().await;
    slow.send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;

    let mut fast = server.client().await;
    fast.send(&format!("GET {OTHER_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;
    let response = tokio::time::timeout(Duration::from_secs(1), fast.read_response(1))
        .await
        .expect("fast endpoint was blocked by the slow one");
    assert_eq!(response, vec!["OK", "17"]);

    assert_eq!(slow.read_response(1).await, vec!["OK", "17"]);
    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_clients_share_one_connection() {
    let server = TestServer::start().await;
    let app = server.provider.endpoint(APP_URL).unwrap();
    app.set_connect_delay(Some(Duration::from_millis(100)));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let addr = server.addr;
        tasks.push(tokio::spawn(async move {
            let mut client = TestClient::connect(addr).await;
            client
                .send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
                .await;
            client.read_response(1).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), vec!["OK", "17"]);
    }
    assert_eq!(app.connect_attempts(), 1);
    assert_eq!(server.state.cache.len(), 1);
    assert_eq!(server.state.stats.get_total_connections(), 8);

    server.stop().await;
}

#[tokio::test]
async fn test_unterminated_last_line_is_answered_on_half_close() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    client
        .write_raw(format!("CLOSE {APP_URL}\r\nGET {APP_URL} %s {THREADING_BEAN} ThreadCount").as_bytes())
        .await;
    client.shutdown_write().await;

    assert_eq!(client.read_response(0).await, vec!["OK"]);
    assert_eq!(client.read_response(1).await, vec!["OK", "17"]);
    assert_eq!(client.read_line().await, None);

    server.stop().await;
}

#[tokio::test]
async fn test_overlong_line_closes_connection() {
    let config = Config {
        max_line_length: 64,
        ..Config::default()
    };
    let server = TestServer::start_with_config(config).await;
    let mut client = server.client().await;

    client.send(&format!("CLOSE {APP_URL}")).await;
    assert_eq!(client.read_response(0).await, vec!["OK"]);

    client.send(&format!("GET {APP_URL} %s {}", "x".repeat(128))).await;
    assert_eq!(client.read_line().await, None);

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_clients_and_cached_connections() {
    let server = TestServer::start().await;
    let app = server.provider.endpoint(APP_URL).unwrap();
    let mut client = server.client().await;

    client
        .send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;
    assert_eq!(client.read_response(1).await, vec!["OK", "17"]);
    assert_eq!(app.open_sessions(), 1);

    let state = server.state.clone();
    server.stop().await;

    assert_eq!(client.read_line().await, None);
    assert!(state.cache.is_empty());
    assert_eq!(app.open_sessions(), 0);
}
