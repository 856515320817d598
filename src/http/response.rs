use bytes::Bytes;

/// Status codes the server emits.
///
/// - `Ok` (200): file found and served
/// - `BadRequest` (400): anything went wrong while handling the connection
/// - `NotFound` (404): file missing, not-found document served instead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// An HTTP response, either built by the server or decoded by the client.
///
/// The status is kept as a raw code and phrase because a decoded response
/// may carry any code a remote server chose to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub status_phrase: String,
    /// Headers in wire order; empty for everything this server sends
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Unlike HTTP/1.1 builders, nothing is added implicitly: no
/// Content-Length, no Content-Type.
pub struct ResponseBuilder {
    status_code: u16,
    status_phrase: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self::with_code(status.as_u16(), status.reason_phrase())
    }

    pub fn with_code(code: u16, phrase: impl Into<String>) -> Self {
        Self {
            status_code: code,
            status_phrase: phrase.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status_code: self.status_code,
            status_phrase: self.status_phrase,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// 404 Not Found with the given body (normally the not-found document).
    pub fn not_found(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::NotFound).body(body).build()
    }

    /// 400 Bad Request with an empty body.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest).build()
    }

    /// Success means any code below 400; 1xx/2xx/3xx are not told apart.
    pub fn is_ok(&self) -> bool {
        self.status_code < 400
    }

    /// Retrieves the first header with the given name (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
