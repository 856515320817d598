//! Static file server: accept loop, per-connection tasks, content lookup.

pub mod content;
pub mod listener;
pub mod registry;

pub use listener::Server;
pub use registry::ShutdownReport;
