use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use rawhttp::config::{ServerConfig, ShutdownPolicy};
use rawhttp::{logging, server};

/// Serve a directory over HTTP/1.0.
#[derive(Parser)]
#[command(name = "rawhttp-server", version, about)]
struct Cli {
    /// Host to bind (default: localhost)
    host: Option<String>,

    /// Port to bind (default: 3000)
    port: Option<u16>,

    /// Directory to serve; must contain the index and not-found documents (default: docs)
    root_directory: Option<PathBuf>,

    /// YAML config file; positionals take precedence over it
    #[arg(long, env = "RAWHTTP_CONFIG")]
    config: Option<PathBuf>,

    /// Wait this long for in-flight connections on shutdown instead of abandoning them
    #[arg(long = "shutdown-grace-ms")]
    shutdown_grace_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();

    let mut cfg = ServerConfig::load(cli.config.as_deref())?.with_overrides(
        cli.host,
        cli.port,
        cli.root_directory,
    );
    if let Some(ms) = cli.shutdown_grace_ms {
        cfg.shutdown = ShutdownPolicy::join(Duration::from_millis(ms));
    }
    cfg.validate()?;

    tracing::info!(
        root = %cfg.root_directory.display(),
        shutdown = ?cfg.shutdown,
        "Configuration loaded"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        println!("\nTerminating...");
    };

    server::listener::run(Arc::new(cfg), shutdown).await?;
    Ok(())
}
