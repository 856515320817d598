//! rawhttp - HTTP/1.0 over raw TCP sockets
//!
//! A small client and static file server that speak HTTP/1.0 directly on
//! stream sockets, without an HTTP library.

pub mod client;
pub mod config;
pub mod http;
pub mod logging;
pub mod server;
