use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::http::parser::{ParseError, RequestLine, parse_request_line};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::content::{self, ContentError};

/// Everything that turns a connection into a 400.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to read request: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed request: {0}")]
    Request(#[from] ParseError),
    #[error(transparent)]
    Content(#[from] ContentError),
}

pub enum ConnectionState {
    Accepted,
    Reading,
    Resolving(RequestLine),
    Responding(ResponseWriter),
    Closed,
}

/// How a connection ended. Never an error: failures were already turned
/// into a 400 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOutcome {
    /// Status code that was sent (or attempted)
    pub status: u16,
    /// Whether the full response reached the socket
    pub delivered: bool,
}

/// One accepted connection, handled end to end: a single bounded read, one
/// response, close.
pub struct Connection<S> {
    stream: S,
    config: Arc<ServerConfig>,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<ServerConfig>) -> Self {
        Self {
            stream,
            config,
            state: ConnectionState::Accepted,
        }
    }

    pub async fn run(mut self) -> ConnectionOutcome {
        let mut status = StatusCode::BadRequest.as_u16();
        let mut delivered = false;

        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Accepted => {
                    self.state = ConnectionState::Reading;
                }

                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Ok(line) => ConnectionState::Resolving(line),
                        Err(e) => self.fail(e),
                    };
                }

                ConnectionState::Resolving(line) => {
                    self.state = match self.resolve(&line).await {
                        Ok(response) => ConnectionState::Responding(ResponseWriter::new(&response)),
                        Err(e) => self.fail(e),
                    };
                }

                ConnectionState::Responding(mut writer) => {
                    status = writer.status();
                    match writer.write_to_stream(&mut self.stream).await {
                        Ok(()) => delivered = true,
                        Err(e) => warn!(error = %e, status, "Failed to write response"),
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    // Best effort; the stream is dropped right after anyway.
                    let _ = self.stream.shutdown().await;
                    break;
                }
            }
        }

        ConnectionOutcome { status, delivered }
    }

    async fn read_request(&mut self) -> Result<RequestLine, ServeError> {
        let mut buf = BytesMut::zeroed(self.config.read_limit);
        let n = self.stream.read(&mut buf).await?;
        buf.truncate(n);

        let line = parse_request_line(&buf)?;
        debug!(method = line.method.as_str(), path = %line.target, version = %line.version, "Request received");
        Ok(line)
    }

    async fn resolve(&self, line: &RequestLine) -> Result<Response, ServeError> {
        let resolved = content::resolve(&self.config, &line.target).await?;
        debug!(path = %line.target, status = resolved.status.as_u16(), "Resolved content");

        Ok(match resolved.status {
            StatusCode::NotFound => Response::not_found(resolved.bytes),
            _ => Response::ok(resolved.bytes),
        })
    }

    fn fail(&self, error: ServeError) -> ConnectionState {
        warn!(error = %error, "Responding with 400 Bad Request");
        ConnectionState::Responding(ResponseWriter::new(&Response::bad_request()))
    }
}
