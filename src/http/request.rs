use std::fmt;

/// Protocol version written on every request and response line.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// User-Agent sent by the client unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:104.0) Gecko/20100101 Firefox/104.0";

/// Accept header sent by the client unless configured otherwise.
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// HTTP request methods.
///
/// Only GET is understood. Anything else is rejected by the server with
/// 400 Bad Request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// An outgoing HTTP/1.0 request: request line plus ordered headers, no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target (e.g. "/index.html")
    pub path: String,
    /// HTTP version, "HTTP/1.0" unless overridden
    pub version: String,
    /// Headers in the order they go on the wire
    pub headers: Vec<(String, String)>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a header. Order is preserved.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| HTTP_VERSION.to_string()),
            headers: self.headers,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// A GET request carrying the default User-Agent and Accept headers.
    pub fn get(host: &str, port: u16, path: &str) -> Self {
        Self::get_with_agent(host, port, path, DEFAULT_USER_AGENT, DEFAULT_ACCEPT)
    }

    /// A GET request with caller-supplied User-Agent and Accept values.
    pub fn get_with_agent(host: &str, port: u16, path: &str, user_agent: &str, accept: &str) -> Self {
        Request {
            method: Method::GET,
            path: path.to_string(),
            version: HTTP_VERSION.to_string(),
            headers: vec![
                ("Host".to_string(), format!("{}:{}", host, port)),
                ("User-Agent".to_string(), user_agent.to_string()),
                ("Accept".to_string(), accept.to_string()),
            ],
        }
    }

    /// Retrieves the first header with the given name (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Writes the request exactly as it goes on the wire, CRLF line endings and
/// a trailing blank line.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}\r\n", self.method.as_str(), self.path, self.version)?;
        for (k, v) in &self.headers {
            write!(f, "{}: {}\r\n", k, v)?;
        }
        f.write_str("\r\n")
    }
}

/// Serializes a GET request for `path` on `host:port`.
///
/// # Example
///
/// ```
/// # use rawhttp::http::request::encode_request;
/// let req = encode_request("example.com", 80, "/");
/// assert!(req.starts_with("GET / HTTP/1.0\r\nHost: example.com:80\r\n"));
/// assert!(req.ends_with("\r\n\r\n"));
/// ```
pub fn encode_request(host: &str, port: u16, path: &str) -> String {
    Request::get(host, port, path).to_string()
}
