use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

fn reserve_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("reserve addr");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

fn wait_for_http(addr: &str) {
    for _ in 0..80 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("http server not ready on {addr}");
}

fn send_http(addr: &str, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).expect("write request");
    stream.flush().expect("flush");
    let mut buf = String::new();
    stream.read_to_string(&mut buf).expect("read response");
    buf
}

fn response_body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or("")
}

fn spawn_http(addr: &str) -> Child {
    Command::new(env!("CARGO_BIN_EXE_tourleadd"))
        .env("TOURLEADD_TRANSPORT", "http")
        .env("TOURLEAD_HTTP_ADDR", addr)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn tourleadd")
}

#[test]
fn http_health_and_scoring_work() {
    let addr = reserve_addr();
    let mut child = spawn_http(&addr);
    wait_for_http(&addr);

    let health = send_http(&addr, "GET", "/health", "");
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(response_body(&health).contains("\"status\":\"ok\""));

    let init_body = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#;
    let init = send_http(&addr, "POST", "/mcp", init_body);
    assert!(init.starts_with("HTTP/1.1 200"));
    assert!(response_body(&init).contains("\"tourlead-mcp\""));

    let budget_body = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"budget_simulate","arguments":{"target_percentile":100}}}"#;
    let budget = send_http(&addr, "POST", "/mcp", budget_body);
    let payload: serde_json::Value =
        serde_json::from_str(response_body(&budget)).expect("budget json");
    assert_eq!(
        payload["result"]["structuredContent"]["efficiency_multiplier"],
        1.0
    );
    assert_eq!(payload["result"]["structuredContent"]["cost_saving_percent"], 0);

    let metrics = send_http(&addr, "GET", "/metrics", "");
    assert!(metrics.starts_with("HTTP/1.1 200"));
    assert!(response_body(&metrics).contains("tool=\"budget_simulate\",status=\"ok\"} 1"));

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn http_rejects_unknown_routes_and_bad_json() {
    let addr = reserve_addr();
    let mut child = spawn_http(&addr);
    wait_for_http(&addr);

    let missing = send_http(&addr, "POST", "/score", "{}");
    assert!(missing.starts_with("HTTP/1.1 404"));

    let wrong_method = send_http(&addr, "DELETE", "/mcp", "");
    assert!(wrong_method.starts_with("HTTP/1.1 405"));

    let garbage = send_http(&addr, "POST", "/mcp", "{oops");
    assert!(garbage.starts_with("HTTP/1.1 400"));
    assert!(response_body(&garbage).contains("-32700"));

    let _ = child.kill();
    let _ = child.wait();
}

fn send_raw(addr: &str, head: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    stream.write_all(head.as_bytes()).expect("write head");
    stream.flush().expect("flush");
    let mut buf = String::new();
    stream.read_to_string(&mut buf).expect("read response");
    buf
}

#[test]
fn http_refuses_oversized_body_and_keeps_serving() {
    let addr = reserve_addr();
    let mut child = spawn_http(&addr);
    wait_for_http(&addr);

    let huge = send_raw(
        &addr,
        "POST /mcp HTTP/1.1\r\nHost: localhost\r\nContent-Length: 18446744073709551615\r\n\r\n",
    );
    assert!(huge.starts_with("HTTP/1.1 413"));
    assert!(response_body(&huge).contains("payload_too_large"));

    let garbled = send_raw(
        &addr,
        "POST /mcp HTTP/1.1\r\nHost: localhost\r\nContent-Length: -1\r\n\r\n",
    );
    assert!(garbled.starts_with("HTTP/1.1 400"));

    let health = send_http(&addr, "GET", "/health", "");
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(child.try_wait().expect("poll child").is_none());

    let summary = send_http(&addr, "GET", "/metrics/summary", "");
    assert!(summary.starts_with("HTTP/1.1 200"));
    let doc: serde_json::Value =
        serde_json::from_str(response_body(&summary)).expect("summary json");
    assert!(doc["tools"].is_array());

    let _ = child.kill();
    let _ = child.wait();
}
