//! Bookkeeping for in-flight connection tasks.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ShutdownPolicy;
use crate::http::connection::ConnectionOutcome;

/// Connection counts at the moment the server stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub accepted: u64,
    /// Handlers that ran to completion, before or during shutdown
    pub completed: u64,
    /// Handlers detached or aborted at shutdown
    pub abandoned: u64,
}

pub struct ConnectionRegistry {
    tasks: JoinSet<ConnectionOutcome>,
    accepted: u64,
    completed: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            accepted: 0,
            completed: 0,
        }
    }

    pub fn spawn<F>(&mut self, handler: F)
    where
        F: Future<Output = ConnectionOutcome> + Send + 'static,
    {
        self.accepted += 1;
        self.tasks.spawn(handler);
    }

    /// Collects finished handlers without waiting on the rest.
    pub fn reap(&mut self) {
        while let Some(res) = self.tasks.try_join_next() {
            self.record(res);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub async fn shutdown(mut self, policy: ShutdownPolicy) -> ShutdownReport {
        self.reap();

        if let ShutdownPolicy::Join { grace_ms } = policy {
            let grace = Duration::from_millis(grace_ms);
            let drained = tokio::time::timeout(grace, async {
                while let Some(res) = self.tasks.join_next().await {
                    self.record(res);
                }
            })
            .await;
            if drained.is_err() {
                warn!(remaining = self.tasks.len(), ?grace, "Grace period elapsed, aborting handlers");
            }
        }

        let abandoned = self.tasks.len() as u64;
        match policy {
            ShutdownPolicy::Abandon => self.tasks.detach_all(),
            ShutdownPolicy::Join { .. } => self.tasks.shutdown().await,
        }

        ShutdownReport {
            accepted: self.accepted,
            completed: self.completed,
            abandoned,
        }
    }

    fn record(&mut self, res: Result<ConnectionOutcome, tokio::task::JoinError>) {
        self.completed += 1;
        match res {
            Ok(outcome) => debug!(status = outcome.status, delivered = outcome.delivered, "Handler finished"),
            Err(e) => warn!(error = %e, "Handler task failed"),
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
