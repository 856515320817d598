use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::http::parser::{DecodeError, decode_response};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::url::{UrlError, UrlParts};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),
    #[error("could not resolve {host}: {source}")]
    Resolve { host: String, source: io::Error },
    #[error("connection to {addr} failed: {source}")]
    Connection { addr: String, source: io::Error },
    #[error("connection to {addr} timed out after {timeout:?}")]
    Timeout { addr: String, timeout: Duration },
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] DecodeError),
    #[error("failed to save {path}: {source}")]
    Save { path: PathBuf, source: io::Error },
}

/// A decoded response together with the exact bytes it was decoded from.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub response: Response,
    pub raw: Bytes,
}

/// Parses `url` and fetches it.
pub async fn fetch_url(url: &str, cfg: &ClientConfig) -> Result<(UrlParts, Fetched), ClientError> {
    let parts = UrlParts::parse(url)?;
    let fetched = fetch(&parts.host, parts.port, &parts.path, cfg).await?;
    Ok((parts, fetched))
}

/// Sends one GET and performs a single read of at most `cfg.read_limit`
/// bytes. Larger responses come back truncated.
///
/// The stream lives only inside this call, so it is closed on every
/// return path and when the future is dropped.
pub async fn fetch(host: &str, port: u16, path: &str, cfg: &ClientConfig) -> Result<Fetched, ClientError> {
    let mut stream = connect(host, port, cfg.connect_timeout).await?;
    let addr = format!("{}:{}", host, port);

    let request = Request::get_with_agent(host, port, path, &cfg.user_agent, &cfg.accept);
    let raw = exchange(&mut stream, &request, cfg.read_limit)
        .await
        .map_err(|source| ClientError::Connection { addr, source })?;

    trace!(bytes = raw.len(), "Response received");
    let response = decode_response(&raw)?;
    debug!(status = response.status_code, phrase = %response.status_phrase, "Response decoded");

    Ok(Fetched { response, raw })
}

async fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<TcpStream, ClientError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|source| ClientError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(ClientError::Resolve {
            host: host.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
        });
    }

    let mut last_error = None;
    for addr in addrs {
        match timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                trace!(%addr, "Connected");
                return Ok(stream);
            }
            Ok(Err(source)) => {
                debug!(%addr, error = %source, "Connect attempt failed");
                last_error = Some(ClientError::Connection {
                    addr: addr.to_string(),
                    source,
                });
            }
            Err(_) => {
                last_error = Some(ClientError::Timeout {
                    addr: addr.to_string(),
                    timeout: connect_timeout,
                });
            }
        }
    }

    // addrs was non-empty, so at least one attempt recorded an error
    Err(last_error.unwrap_or_else(|| ClientError::Resolve {
        host: host.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
    }))
}

async fn exchange(stream: &mut TcpStream, request: &Request, read_limit: usize) -> io::Result<Bytes> {
    stream.write_all(request.to_string().as_bytes()).await?;
    stream.flush().await?;

    let mut buf = BytesMut::zeroed(read_limit);
    let n = stream.read(&mut buf).await?;
    buf.truncate(n);
    Ok(buf.freeze())
}
