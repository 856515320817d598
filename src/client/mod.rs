//! HTTP/1.0 client: one connection per URL, URLs handled in order.

pub mod batch;
pub mod fetch;
pub mod output;

pub use batch::{BatchSummary, UrlOutcome};
pub use fetch::{ClientError, Fetched, fetch, fetch_url};
