use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use serde_json::{json, Value};

#[test]
fn lead_score_stdio_flow_works() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tourleadd"))
        .env_remove("TOURLEADD_TRANSPORT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn tourleadd");

    let mut child_stdin = child.stdin.take().expect("stdin");
    let child_stdout = child.stdout.take().expect("stdout");
    let mut reader = BufReader::new(child_stdout);

    let req = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {
            "name": "lead_score",
            "arguments": {
                "gender": "여성",
                "age": 27,
                "purpose": "의료/시술",
                "stay_duration_days": 10,
                "post_text": "면세점에서 가방 사고 택스리펀 받았어요!"
            }
        }
    });

    writeln!(child_stdin, "{}", req).expect("write request");
    drop(child_stdin);

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");

    let response: Value = serde_json::from_str(&line).expect("parse response json");
    let probability = response["result"]["structuredContent"]["probability_percent"]
        .as_f64()
        .expect("probability");
    // 0.4 + 0.04 + 10/30 * 0.1
    assert!((probability - 47.333_333).abs() < 1e-4);
    assert_eq!(
        response["result"]["structuredContent"]["tier"],
        "moderate_intent"
    );

    let status = child.wait().expect("wait child");
    assert!(status.success());
}

fn write_framed(stdin: &mut std::process::ChildStdin, payload: &Value) {
    let body = serde_json::to_vec(payload).expect("serialize payload");
    let frame = format!("Content-Length: {}\r\n\r\n", body.len());
    stdin
        .write_all(frame.as_bytes())
        .expect("write frame header");
    stdin.write_all(&body).expect("write frame body");
    stdin.flush().expect("flush frame");
}

fn read_framed(reader: &mut BufReader<std::process::ChildStdout>) -> Value {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read frame header");
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<usize>().ok();
            }
        }
    }

    let len = content_length.expect("content-length header");
    let mut body = vec![0_u8; len];
    std::io::Read::read_exact(reader, &mut body).expect("read frame body");
    serde_json::from_slice(&body).expect("parse framed response")
}

#[test]
fn stdio_content_length_initialize_and_tools_list_work() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tourleadd"))
        .env_remove("TOURLEADD_TRANSPORT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn tourleadd");

    let mut child_stdin = child.stdin.take().expect("stdin");
    let child_stdout = child.stdout.take().expect("stdout");
    let mut reader = BufReader::new(child_stdout);

    write_framed(
        &mut child_stdin,
        &json!({
            "jsonrpc":"2.0",
            "id":1,
            "method":"initialize",
            "params":{
                "protocolVersion":"2024-11-05",
                "capabilities":{},
                "clientInfo":{"name":"stdio-test","version":"1.0.0"}
            }
        }),
    );
    let init = read_framed(&mut reader);
    assert_eq!(
        init["result"]["protocolVersion"].as_str(),
        Some("2024-11-05")
    );
    assert_eq!(
        init["result"]["serverInfo"]["name"].as_str(),
        Some("tourlead-mcp")
    );

    write_framed(
        &mut child_stdin,
        &json!({
            "jsonrpc":"2.0",
            "id":2,
            "method":"tools/list",
            "params":{}
        }),
    );
    let tools = read_framed(&mut reader);
    let names = tools["result"]["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|tool| tool.get("name").and_then(Value::as_str))
        .collect::<Vec<_>>();
    assert!(names.contains(&"lead_score"));
    assert!(names.contains(&"budget_simulate"));

    drop(child_stdin);
    let status = child.wait().expect("wait child");
    assert!(status.success());
}

#[test]
fn malformed_line_gets_parse_error() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tourleadd"))
        .env_remove("TOURLEADD_TRANSPORT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn tourleadd");

    let mut child_stdin = child.stdin.take().expect("stdin");
    let mut reader = BufReader::new(child.stdout.take().expect("stdout"));

    writeln!(child_stdin, "{{not json").expect("write garbage");
    drop(child_stdin);

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let response: Value = serde_json::from_str(&line).expect("parse response json");
    assert_eq!(response["error"]["code"], -32700);

    let status = child.wait().expect("wait child");
    assert!(status.success());
}

#[test]
fn oversized_frame_gets_parse_error_without_killing_the_daemon() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tourleadd"))
        .env_remove("TOURLEADD_TRANSPORT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn tourleadd");

    let mut child_stdin = child.stdin.take().expect("stdin");
    let mut reader = BufReader::new(child.stdout.take().expect("stdout"));

    child_stdin
        .write_all(b"Content-Length: 18446744073709551615\r\n\r\n")
        .expect("write oversized header");
    child_stdin.flush().expect("flush");

    let response = read_framed(&mut reader);
    assert_eq!(response["error"]["code"], -32700);
    assert!(response["error"]["message"]
        .as_str()
        .expect("message")
        .contains("exceeds"));

    drop(child_stdin);
    let status = child.wait().expect("wait child");
    assert!(status.success());
}
