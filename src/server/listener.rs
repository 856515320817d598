use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{Instrument, error, info, info_span};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::server::registry::{ConnectionRegistry, ShutdownReport};

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds `host:port` with SO_REUSEADDR and starts listening.
    pub async fn bind(config: Arc<ServerConfig>) -> anyhow::Result<Self> {
        let listen_addr = config.listen_addr();
        let addr = tokio::net::lookup_host(&listen_addr)
            .await
            .with_context(|| format!("failed to resolve {}", listen_addr))?
            .next()
            .with_context(|| format!("no address for {}", listen_addr))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("failed to bind {}", addr))?;
        let listener = socket.listen(config.backlog)?;

        info!("Listening on {}", listener.local_addr()?);
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts until `shutdown` resolves, one task per connection. Accept
    /// errors are logged and skipped.
    pub async fn serve<F>(self, shutdown: F) -> ShutdownReport
    where
        F: Future<Output = ()>,
    {
        let mut registry = ConnectionRegistry::new();
        tokio::pin!(shutdown);

        loop {
            registry.reap();

            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!(in_flight = registry.in_flight(), "Shutdown signal received, no longer accepting");
                    break;
                }

                res = self.listener.accept() => match res {
                    Ok((socket, peer)) => {
                        info!("Accepted connection from {}", peer);
                        let conn = Connection::new(socket, Arc::clone(&self.config));
                        registry.spawn(conn.run().instrument(info_span!("conn", %peer)));
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                    }
                },
            }
        }

        // Close the listening socket before waiting on in-flight handlers
        let Self { listener, config } = self;
        drop(listener);

        let report = registry.shutdown(config.shutdown).await;
        info!(
            accepted = report.accepted,
            completed = report.completed,
            abandoned = report.abandoned,
            "Server stopped"
        );
        report
    }
}

pub async fn run<F>(config: Arc<ServerConfig>, shutdown: F) -> anyhow::Result<ShutdownReport>
where
    F: Future<Output = ()>,
{
    let server = Server::bind(config).await?;
    Ok(server.serve(shutdown).await)
}
