use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use rawhttp::client::batch;
use rawhttp::config::{ClientConfig, DEFAULT_READ_LIMIT};
use rawhttp::logging;

/// Fetch URLs over HTTP/1.0 and save successful responses to disk.
#[derive(Parser)]
#[command(name = "rawhttp-client", version, about)]
struct Cli {
    /// URLs of the form [http://]host[:port][/path]
    #[arg(required = true)]
    urls: Vec<String>,

    /// Directory responses are saved under
    #[arg(long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Bytes read from each response; anything beyond is dropped
    #[arg(long = "read-limit", default_value_t = DEFAULT_READ_LIMIT)]
    read_limit: usize,

    /// Connect timeout in milliseconds
    #[arg(long = "connect-timeout-ms", default_value_t = 5000)]
    connect_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let cfg = ClientConfig {
        read_limit: cli.read_limit.max(1),
        connect_timeout: Duration::from_millis(cli.connect_timeout_ms),
        output_dir: cli.output_dir,
        ..ClientConfig::default()
    };

    let interrupt = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let summary = batch::run_until(&cli.urls, &cfg, interrupt).await;
    if summary.interrupted {
        println!("\nTerminating...");
    }

    tracing::debug!(
        saved = summary.saved,
        rejected = summary.rejected,
        failed = summary.failed,
        "Batch finished"
    );

    Ok(())
}
