use std::future::Future;
use std::path::PathBuf;

use tracing::info;

use crate::client::fetch::{ClientError, fetch_url};
use crate::client::output;
use crate::config::ClientConfig;

/// What happened to a single URL that got a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    /// Status below 400; raw response written to this file
    Saved(PathBuf),
    /// Status 400 or above; nothing written
    Rejected { status_code: u16, status_phrase: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Set when the batch was cut short by the shutdown signal
    pub interrupted: bool,
}

/// Fetches one URL and saves the raw response if the status is a success.
pub async fn process(url: &str, cfg: &ClientConfig) -> Result<UrlOutcome, ClientError> {
    let (parts, fetched) = fetch_url(url, cfg).await?;

    if !fetched.response.is_ok() {
        return Ok(UrlOutcome::Rejected {
            status_code: fetched.response.status_code,
            status_phrase: fetched.response.status_phrase,
        });
    }

    let file = output::save(&cfg.output_dir, &parts.path, &fetched.raw)
        .await
        .map_err(|source| ClientError::Save {
            path: cfg.output_dir.join(output::output_filename(&parts.path)),
            source,
        })?;
    Ok(UrlOutcome::Saved(file))
}

/// Processes URLs one after another. A failure is printed and the batch
/// moves on to the next URL.
pub async fn run(urls: &[String], cfg: &ClientConfig) -> BatchSummary {
    run_until(urls, cfg, std::future::pending()).await
}

/// Like [`run`], but stops as soon as `shutdown` resolves. The in-flight
/// fetch is dropped, which closes its connection, and no further URL is
/// requested.
pub async fn run_until<F>(urls: &[String], cfg: &ClientConfig, shutdown: F) -> BatchSummary
where
    F: Future<Output = ()>,
{
    let mut summary = BatchSummary::default();
    tokio::pin!(shutdown);

    for url in urls {
        let result = tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!(url = %url, "Interrupted, abandoning remaining URLs");
                summary.interrupted = true;
                break;
            }

            res = process(url, cfg) => res,
        };
        summary.record(url, result);
    }

    summary
}

impl BatchSummary {
    fn record(&mut self, url: &str, result: Result<UrlOutcome, ClientError>) {
        match result {
            Ok(UrlOutcome::Saved(file)) => {
                info!(url = %url, file = %file.display(), "Response saved");
                self.saved += 1;
            }
            Ok(UrlOutcome::Rejected {
                status_code,
                status_phrase,
            }) => {
                println!("{} {}", status_code, status_phrase);
                self.rejected += 1;
            }
            Err(ClientError::InvalidUrl(e)) => {
                println!("Invalid URL {}", url);
                println!("{}", e);
                self.failed += 1;
            }
            Err(e) => {
                println!("The following error occurred while processing request for {}", url);
                println!("{}", e);
                self.failed += 1;
            }
        }
    }
}
