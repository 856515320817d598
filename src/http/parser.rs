use bytes::Bytes;

use crate::http::request::{HTTP_VERSION, Method};
use crate::http::response::Response;

const BOUNDARY: &[u8] = b"\r\n\r\n";

/// Errors from parsing the request line of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty request")]
    Empty,
    #[error("request is not valid UTF-8")]
    InvalidUtf8,
    #[error("request line has no target")]
    MissingTarget,
    #[error("unsupported method `{0}`")]
    InvalidMethod(String),
}

/// Errors from decoding a raw response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("no blank line between headers and body")]
    MissingBoundary,
    #[error("response headers are not valid UTF-8")]
    InvalidUtf8,
    #[error("invalid status line `{0}`")]
    InvalidStatusLine(String),
    #[error("invalid status code `{0}`")]
    InvalidStatusCode(String),
}

/// The first line of a request, as the server sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    pub version: String,
}

/// Parses the request line out of whatever the server read from a socket.
///
/// Only the first line matters; the remaining headers are ignored and the
/// buffer need not contain the terminating blank line.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidUtf8)?;
    let first = text.split('\n').next().unwrap_or_default();
    let mut parts = first.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::Empty)?;
    let target = parts.next().ok_or(ParseError::MissingTarget)?;
    let version = parts.next().unwrap_or(HTTP_VERSION);

    let method =
        Method::from_str(method_str).ok_or_else(|| ParseError::InvalidMethod(method_str.to_string()))?;

    Ok(RequestLine {
        method,
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Decodes `HTTP/<ver> <code> <phrase...>\r\n<headers>\r\n\r\n<body>`.
///
/// Splits on the first blank line only, so the body may itself contain
/// CRLFCRLF. Header lines without a colon are skipped.
pub fn decode_response(raw: &[u8]) -> Result<Response, DecodeError> {
    let headers_end = find_headers_end(raw).ok_or(DecodeError::MissingBoundary)?;
    let header_bytes = &raw[..headers_end];
    let body = Bytes::copy_from_slice(&raw[headers_end + BOUNDARY.len()..]);

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| DecodeError::InvalidUtf8)?;
    let mut lines = headers_str.split('\n').map(|l| l.trim_end_matches('\r'));

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.split_whitespace();

    match parts.next() {
        Some(v) if v.starts_with("HTTP/") => {}
        _ => return Err(DecodeError::InvalidStatusLine(status_line.to_string())),
    }

    let code_str = parts.next().unwrap_or_default();
    let status_code = code_str
        .parse::<u16>()
        .map_err(|_| DecodeError::InvalidStatusCode(code_str.to_string()))?;
    let status_phrase = parts.collect::<Vec<_>>().join(" ");

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Ok(Response {
        status_code,
        status_phrase,
        headers,
        body,
    })
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(BOUNDARY.len()).position(|w| w == BOUNDARY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let line = parse_request_line(b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n").unwrap();

        assert_eq!(line.method, Method::GET);
        assert_eq!(line.target, "/");
        assert_eq!(line.version, "HTTP/1.0");
    }

    #[test]
    fn boundary_is_first_blank_line() {
        assert_eq!(find_headers_end(b"A\r\n\r\nB\r\n\r\n"), Some(1));
        assert_eq!(find_headers_end(b"A\r\nB\r\n"), None);
    }
}
