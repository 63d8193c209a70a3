//! Byte-level framing for the stdio and HTTP transports.
//!
//! Both transports carry a declared body length in a `Content-Length`
//! header. Lengths above [`MAX_BODY_BYTES`] are refused before any buffer
//! is allocated.

use std::collections::HashMap;
use std::io::{self, BufRead, Read, Write};

use serde::Serialize;

use crate::protocol::JsonRpcResponse;

/// Largest request body either transport will buffer.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("declared body of {declared} bytes exceeds the {limit} byte limit")]
    TooLarge { declared: u64, limit: u64 },
    #[error("{0}")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Headers = HashMap<String, String>;

/// Reads `Name: value` lines up to the blank separator. Names are lowercased.
fn read_headers<R: BufRead>(reader: &mut R, first: Option<&str>) -> Result<Headers, FrameError> {
    let mut headers = Headers::new();
    let mut insert = |line: &str| {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    };
    if let Some(line) = first {
        insert(line);
    }

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(FrameError::Malformed(
                "unexpected eof while reading headers".to_string(),
            ));
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Ok(headers);
        }
        insert(line);
    }
}

/// The declared body length, if any, checked against [`MAX_BODY_BYTES`].
fn declared_length(headers: &Headers) -> Result<Option<u64>, FrameError> {
    let Some(raw) = headers.get("content-length") else {
        return Ok(None);
    };
    let declared = raw
        .parse::<u64>()
        .map_err(|_| FrameError::Malformed(format!("invalid content-length {raw:?}")))?;
    if declared > MAX_BODY_BYTES {
        return Err(FrameError::TooLarge {
            declared,
            limit: MAX_BODY_BYTES,
        });
    }
    Ok(Some(declared))
}

/// Reads exactly `len` bytes; `len` must already be within the limit.
fn read_body<R: Read>(reader: &mut R, len: u64) -> Result<Vec<u8>, FrameError> {
    let mut body = Vec::with_capacity(usize::try_from(len).unwrap_or_default());
    reader.by_ref().take(len).read_to_end(&mut body)?;
    if u64::try_from(body.len()).ok() != Some(len) {
        return Err(FrameError::Malformed(format!(
            "body ended after {} of {len} bytes",
            body.len()
        )));
    }
    Ok(body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioFrame {
    LineDelimited,
    ContentLength,
}

#[derive(Debug)]
pub enum StdioMessage {
    Payload(Vec<u8>, StdioFrame),
    /// A frame that could not be read. The reply should use the same framing.
    Rejected(FrameError, StdioFrame),
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("content-length:") || lower.starts_with("content-type:")
}

/// Next message from a stdio stream, or `None` once input is exhausted.
///
/// A line that starts with a frame header begins a `Content-Length` frame;
/// any other non-blank line is one line-delimited message. The body of an
/// oversized frame is discarded without being buffered.
pub fn read_stdio_message<R: BufRead>(reader: &mut R) -> io::Result<Option<StdioMessage>> {
    let mut line = String::new();
    let first = loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            break trimmed;
        }
    };

    if !is_header_line(first) {
        return Ok(Some(StdioMessage::Payload(
            first.as_bytes().to_vec(),
            StdioFrame::LineDelimited,
        )));
    }

    let frame = StdioFrame::ContentLength;
    let headers = match read_headers(reader, Some(first)) {
        Ok(headers) => headers,
        Err(FrameError::Io(err)) => return Err(err),
        Err(err) => return Ok(Some(StdioMessage::Rejected(err, frame))),
    };
    let len = match declared_length(&headers) {
        Ok(Some(len)) => len,
        Ok(None) => {
            let err = FrameError::Malformed("missing content-length header".to_string());
            return Ok(Some(StdioMessage::Rejected(err, frame)));
        }
        Err(err @ FrameError::TooLarge { declared, .. }) => {
            io::copy(&mut reader.by_ref().take(declared), &mut io::sink())?;
            return Ok(Some(StdioMessage::Rejected(err, frame)));
        }
        Err(err) => return Ok(Some(StdioMessage::Rejected(err, frame))),
    };

    match read_body(reader, len) {
        Ok(body) => Ok(Some(StdioMessage::Payload(body, frame))),
        Err(FrameError::Io(err)) => Err(err),
        Err(err) => Ok(Some(StdioMessage::Rejected(err, frame))),
    }
}

pub fn write_stdio_response<W: Write>(
    out: &mut W,
    response: &JsonRpcResponse,
    frame: StdioFrame,
) -> io::Result<()> {
    let serialized = serde_json::to_vec(response)?;
    if frame == StdioFrame::ContentLength {
        write!(out, "Content-Length: {}\r\n\r\n", serialized.len())?;
        out.write_all(&serialized)?;
    } else {
        out.write_all(&serialized)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec()),
        }
    }

    pub fn text(status: u16, content_type: &'static str, body: String) -> Self {
        Self {
            status,
            content_type,
            body: body.into_bytes(),
        }
    }

    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Vec::new(),
        }
    }

    fn error(status: u16, code: &str, message: impl std::fmt::Display) -> Self {
        Self::json(
            status,
            &serde_json::json!({"error": code, "message": message.to_string()}),
        )
    }
}

/// Outcome of reading one HTTP/1.1 request off a connection.
pub enum HttpRead {
    Closed,
    Request(HttpRequest),
    /// The request was refused before its body was read.
    Rejected(HttpResponse),
}

pub fn read_http_request<R: BufRead>(reader: &mut R) -> io::Result<HttpRead> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(HttpRead::Closed);
    }
    let request_line = line.trim_end_matches(['\r', '\n']);
    if request_line.is_empty() {
        return Ok(HttpRead::Closed);
    }

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Ok(HttpRead::Rejected(HttpResponse::error(
            400,
            "bad_request",
            "malformed request line",
        )));
    };
    let method = method.to_string();
    let path = target.split_once('?').map_or(target, |(p, _)| p).to_string();

    let body = match read_headers(reader, None)
        .and_then(|headers| declared_length(&headers))
        .and_then(|len| read_body(reader, len.unwrap_or(0)))
    {
        Ok(body) => body,
        Err(FrameError::Io(err)) => return Err(err),
        Err(err @ FrameError::TooLarge { .. }) => {
            return Ok(HttpRead::Rejected(HttpResponse::error(
                413,
                "payload_too_large",
                err,
            )));
        }
        Err(err) => {
            return Ok(HttpRead::Rejected(HttpResponse::error(
                400,
                "bad_request",
                err,
            )));
        }
    };

    Ok(HttpRead::Request(HttpRequest { method, path, body }))
}

pub fn write_http_response<W: Write>(out: &mut W, response: &HttpResponse) -> io::Result<()> {
    write!(
        out,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason_phrase(response.status),
        response.content_type,
        response.body.len()
    )?;
    out.write_all(&response.body)?;
    out.flush()
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        _ => "Internal Server Error",
    }
}
