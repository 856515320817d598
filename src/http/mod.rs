//! HTTP/1.0 protocol implementation.
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`url`**: Splits a URL into host, port and request target
//! - **`request`**: Request representation and the client-side encoder
//! - **`response`**: Response representation and status codes
//! - **`parser`**: Request-line parsing (server) and response decoding (client)
//! - **`writer`**: Serializes and writes responses to a stream
//! - **`connection`**: The server's per-connection state machine
//!
//! # Connection State Machine
//!
//! Each accepted connection is handled exactly once and then closed:
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read, parse the request line
//!        └──────┬──────┘
//!               │ Request line parsed
//!               ▼
//!        ┌─────────────┐
//!        │  Resolving  │ ← Look the path up under the root directory
//!        └──────┬──────┘
//!               │ 200 or 404 content
//!               ▼
//!        ┌─────────────┐
//!        │ Responding  │ ← Any earlier failure lands here with a 400
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │ ← Always, whether or not the write succeeded
//!        └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rawhttp::config::ServerConfig;
//! use rawhttp::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ServerConfig::default());
//!     let listener = TcpListener::bind("127.0.0.1:3000").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let config = Arc::clone(&config);
//!         tokio::spawn(async move {
//!             let outcome = Connection::new(socket, config).run().await;
//!             println!("sent {}", outcome.status);
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod url;
pub mod writer;
