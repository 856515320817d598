//! URL decomposition into host, port and request target.
//!
//! The parser runs in four stages: scheme strip, host scan, optional port
//! scan, optional path scan. Each stage owns its own failure variant so the
//! edge cases can be tested one by one.

use std::fmt;
use std::str::FromStr;

/// Port used when the URL carries no `:port` suffix.
pub const DEFAULT_PORT: u16 = 80;

const SCHEMES: [&str; 2] = ["http://", "https://"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("no host found in URL")]
    MissingHost,
    #[error("invalid host `{0}`")]
    InvalidHost(String),
    #[error("invalid port `{0}`")]
    InvalidPort(String),
    #[error("unexpected character `{0}` after host")]
    UnexpectedCharacter(char),
}

/// A URL split into the pieces needed to open a connection and build a
/// request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Hostname without scheme, port or path (e.g. "example.com")
    pub host: String,
    /// TCP port, 80 unless the URL says otherwise
    pub port: u16,
    /// Request target, always starting with '/'
    pub path: String,
}

impl UrlParts {
    /// Parses `[scheme://]host[:port][/path]`.
    ///
    /// Query strings and fragments are not supported: the path stops at the
    /// first character outside `[A-Za-z0-9_\-./]`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttp::http::url::UrlParts;
    /// let parts = UrlParts::parse("http://example.com:8080/a/b.html").unwrap();
    /// assert_eq!(parts.host, "example.com");
    /// assert_eq!(parts.port, 8080);
    /// assert_eq!(parts.path, "/a/b.html");
    /// ```
    pub fn parse(url: &str) -> Result<Self, UrlError> {
        let rest = strip_scheme(url.trim());
        let (host, rest) = scan_host(rest)?;
        let (port, rest) = scan_port(rest)?;
        let path = scan_path(rest)?;

        Ok(Self {
            host: host.to_string(),
            port,
            path,
        })
    }
}

impl FromStr for UrlParts {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.path)
    }
}

fn strip_scheme(url: &str) -> &str {
    for scheme in SCHEMES {
        match url.get(..scheme.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(scheme) => return &url[scheme.len()..],
            _ => {}
        }
    }
    url
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty() && !label.starts_with('-') && !label.ends_with('-')
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

fn scan_host(input: &str) -> Result<(&str, &str), UrlError> {
    let end = input
        .find(|c: char| !is_host_char(c))
        .unwrap_or(input.len());
    let host = &input[..end];

    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }
    if !host.split('.').all(is_valid_label) {
        return Err(UrlError::InvalidHost(host.to_string()));
    }

    Ok((host, &input[end..]))
}

fn scan_port(input: &str) -> Result<(u16, &str), UrlError> {
    let Some(rest) = input.strip_prefix(':') else {
        return Ok((DEFAULT_PORT, input));
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    let port = digits
        .parse::<u16>()
        .ok()
        .filter(|p| *p != 0)
        .ok_or_else(|| UrlError::InvalidPort(digits.to_string()))?;

    Ok((port, &rest[end..]))
}

fn scan_path(input: &str) -> Result<String, UrlError> {
    match input.chars().next() {
        None => Ok("/".to_string()),
        Some('/') => {
            let end = input
                .find(|c: char| !is_path_char(c))
                .unwrap_or(input.len());
            Ok(input[..end].to_string())
        }
        Some(c) => Err(UrlError::UnexpectedCharacter(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(strip_scheme("HTTP://a.com"), "a.com");
        assert_eq!(strip_scheme("https://a.com"), "a.com");
        assert_eq!(strip_scheme("ftp://a.com"), "ftp://a.com");
    }

    #[test]
    fn port_zero_rejected() {
        assert_eq!(scan_port(":0/"), Err(UrlError::InvalidPort("0".into())));
    }

    #[test]
    fn path_stops_at_query() {
        assert_eq!(scan_path("/a/b.html?x=1").unwrap(), "/a/b.html");
    }
}
