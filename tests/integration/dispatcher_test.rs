// tests/integration/dispatcher_test.rs

//! Integration tests for request dispatch
//! Tests: GET, CLOSE, protocol errors, per-item N/A, connection and I/O failures

use super::fixtures::constants::*;
use super::test_helpers::TestContext;
use beangate::core::protocol::{ErrorCode, Response};
use beangate::core::provider::ProviderError;

fn ok(values: &[&str]) -> Response {
    Response::Ok(values.iter().map(|v| v.to_string()).collect())
}

// ===== Protocol errors =====

#[tokio::test]
async fn test_empty_line_is_no_cmd() {
    let ctx = TestContext::new();
    let lines = ctx.send_lines("").await;
    assert_eq!(lines[0], "ERR");
    assert_eq!(lines[1], "NO_CMD");
}

#[tokio::test]
async fn test_unknown_command() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.send_lines("UNKNOWN foo").await,
        vec!["ERR", "UNKNOWN_CMD", "UNKNOWN"]
    );
}

#[tokio::test]
async fn test_get_wrong_argument_count() {
    let ctx = TestContext::new();
    let response = ctx.send(&format!("GET {APP_URL} %s {MEMORY_BEAN}")).await;
    assert!(matches!(
        response,
        Response::Err {
            code: ErrorCode::InvalidArgumentLength,
            ..
        }
    ));
    // Rejected before any connection is made.
    assert_eq!(ctx.app.connect_attempts(), 0);
}

#[tokio::test]
async fn test_close_wrong_argument_count() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.send_lines("CLOSE").await,
        vec![
            "ERR",
            "INVALID_ARGUMENT_LENGTH",
            "Expecting 1 argument but there was 0"
        ]
    );
}

// ===== GET =====

#[tokio::test]
async fn test_get_with_format() {
    let ctx = TestContext::new();
    let response = ctx
        .send(&format!(
            "GET {APP_URL} 'used:%d' {MEMORY_BEAN} HeapMemoryUsage.used"
        ))
        .await;
    assert_eq!(response, ok(&["used:1024"]));
}

#[tokio::test]
async fn test_get_multiple_attributes_in_request_order() {
    let ctx = TestContext::new();
    let response = ctx
        .send(&format!(
            "GET {APP_URL} %s {THREADING_BEAN} ThreadCount {RUNTIME_BEAN} SystemProperties[java.version] \
             {RUNTIME_BEAN} InputArguments[1] {MEMORY_BEAN} HeapMemoryUsage.max"
        ))
        .await;
    assert_eq!(response, ok(&["17", "21.0.2", "-XX:+UseG1GC", "4096"]));
}

#[tokio::test]
async fn test_get_composite_value_renders_as_json() {
    let ctx = TestContext::new();
    let response = ctx
        .send(&format!("GET {APP_URL} %s {MEMORY_BEAN} HeapMemoryUsage"))
        .await;
    assert_eq!(
        response,
        ok(&[r#"{"committed":2048,"init":512,"max":4096,"used":1024}"#])
    );
}

#[tokio::test]
async fn test_get_item_failures_become_not_available() {
    let ctx = TestContext::new();
    let response = ctx
        .send(&format!(
            "GET {APP_URL} 'v=%s' {THREADING_BEAN} ThreadCount no.such:type=Bean ThreadCount \
             {THREADING_BEAN} NoSuchAttribute {RUNTIME_BEAN} InputArguments[9] \
             {RUNTIME_BEAN} InputArguments[x] {THREADING_BEAN} [0] {THREADING_BEAN} PeakThreadCount"
        ))
        .await;
    assert_eq!(
        response,
        ok(&["v=17", "N/A", "N/A", "N/A", "N/A", "N/A", "v=23"])
    );
    assert_eq!(ctx.state.stats.get_total_unavailable(), 5);
    // Attribute-level failures keep the connection.
    assert_eq!(ctx.app.connect_attempts(), 1);
    assert!(ctx.state.cache.get(APP_URL).is_some());
}

#[tokio::test]
async fn test_get_integer_format_rejects_text_values() {
    let ctx = TestContext::new();
    let response = ctx
        .send(&format!(
            "GET {APP_URL} 'n=%d' {THREADING_BEAN} ThreadCount {RUNTIME_BEAN} VmName \
             {MEMORY_BEAN} HeapMemoryUsage"
        ))
        .await;
    assert_eq!(response, ok(&["n=17", "N/A", "N/A"]));
    assert_eq!(ctx.state.stats.get_total_unavailable(), 2);
}

#[tokio::test]
async fn test_get_null_values_are_not_available() {
    let ctx = TestContext::new();
    let response = ctx
        .send(&format!(
            "GET {APP_URL} 'x:%s' {RUNTIME_BEAN} BootClassPath {RUNTIME_BEAN} BootClassPath[0].a \
             {RUNTIME_BEAN} SystemProperties[missing]"
        ))
        .await;
    assert_eq!(response, ok(&["N/A", "N/A", "N/A"]));
}

#[tokio::test]
async fn test_get_multiline_value_stays_on_one_line() {
    let ctx = TestContext::new();
    let lines = ctx
        .send_lines(&format!("GET {APP_URL} %s {RUNTIME_BEAN} VmName"))
        .await;
    assert_eq!(lines, vec!["OK", "OpenJDK 64-Bit Server VM build 21"]);
}

#[tokio::test]
async fn test_get_connects_lazily_and_once() {
    let ctx = TestContext::new();
    assert_eq!(ctx.app.connect_attempts(), 0);
    for _ in 0..3 {
        let response = ctx
            .send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
            .await;
        assert_eq!(response, ok(&["17"]));
    }
    assert_eq!(ctx.app.connect_attempts(), 1);
}

// ===== Connection failures =====

#[tokio::test]
async fn test_get_unreachable_endpoint() {
    let ctx = TestContext::new();
    let lines = ctx
        .send_lines(&format!("GET {DOWN_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ERR");
    assert_eq!(lines[1], "CONNECTION_FAILED");
    assert!(lines[2].contains(DOWN_URL));
}

#[tokio::test]
async fn test_get_after_refused_connection_retries() {
    let ctx = TestContext::new();
    ctx.app.refuse_connections(true);
    let response = ctx
        .send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;
    assert!(matches!(
        response,
        Response::Err {
            code: ErrorCode::ConnectionFailed,
            ..
        }
    ));

    ctx.app.refuse_connections(false);
    let response = ctx
        .send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;
    assert_eq!(response, ok(&["17"]));
    assert_eq!(ctx.app.connect_attempts(), 2);
}

// ===== I/O failures =====

#[tokio::test]
async fn test_io_error_discards_partial_results() {
    let ctx = TestContext::new();
    ctx.app.inject_fault(
        RUNTIME_BEAN,
        "InputArguments",
        ProviderError::Io("Connection reset by peer".to_string()),
    );
    let lines = ctx
        .send_lines(&format!(
            "GET {APP_URL} %s {THREADING_BEAN} ThreadCount {MEMORY_BEAN} HeapMemoryUsage.used \
             {RUNTIME_BEAN} InputArguments[0]"
        ))
        .await;
    assert_eq!(lines, vec!["ERR", "IO_ERROR", "Connection reset by peer"]);

    // The broken holder is gone and its session closed.
    assert!(ctx.state.cache.get(APP_URL).is_none());
    assert_eq!(ctx.app.open_sessions(), 0);
}

#[tokio::test]
async fn test_get_reconnects_after_io_error() {
    let ctx = TestContext::new();
    ctx.app.inject_fault(
        THREADING_BEAN,
        "ThreadCount",
        ProviderError::Io("Broken pipe".to_string()),
    );
    let request = format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount");
    assert!(!ctx.send(&request).await.is_ok());

    ctx.app.clear_faults();
    assert_eq!(ctx.send(&request).await, ok(&["17"]));
    assert_eq!(ctx.app.connect_attempts(), 2);
    assert_eq!(ctx.app.open_sessions(), 1);
}

// ===== CLOSE =====

#[tokio::test]
async fn test_close_never_connected_endpoint() {
    let ctx = TestContext::new();
    assert_eq!(ctx.send_lines(&format!("CLOSE {APP_URL}")).await, vec!["OK"]);
    assert_eq!(ctx.app.connect_attempts(), 0);
    assert!(ctx.state.cache.is_empty());
}

#[tokio::test]
async fn test_close_then_get_reconnects() {
    let ctx = TestContext::new();
    let request = format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount");
    assert_eq!(ctx.send(&request).await, ok(&["17"]));
    assert_eq!(ctx.app.open_sessions(), 1);

    assert_eq!(ctx.send(&format!("CLOSE {APP_URL}")).await, Response::ok());
    assert_eq!(ctx.app.open_sessions(), 0);
    assert!(ctx.state.cache.get(APP_URL).is_none());

    assert_eq!(ctx.send(&format!("CLOSE {APP_URL}")).await, Response::ok());

    assert_eq!(ctx.send(&request).await, ok(&["17"]));
    assert_eq!(ctx.app.connect_attempts(), 2);
}

#[tokio::test]
async fn test_commands_are_counted() {
    let ctx = TestContext::new();
    ctx.send("").await;
    ctx.send(&format!("CLOSE {APP_URL}")).await;
    ctx.send(&format!("GET {APP_URL} %s {THREADING_BEAN} ThreadCount"))
        .await;
    assert_eq!(ctx.state.stats.get_total_commands(), 3);
}
