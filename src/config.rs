//! Startup configuration for the server and client.
//!
//! Both structs are built once in `main` and passed down by reference (or
//! `Arc` on the server side). Nothing here is mutated after startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::request::{DEFAULT_ACCEPT, DEFAULT_USER_AGENT};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ROOT: &str = "docs";
pub const DEFAULT_INDEX: &str = "index.html";
pub const DEFAULT_NOT_FOUND: &str = "not-found.html";

/// Size of the single read done on each side of a connection.
pub const DEFAULT_READ_LIMIT: usize = 1024;

/// What the server does with in-flight connections once it stops accepting.
///
/// In YAML: `shutdown: { policy: abandon }` or
/// `shutdown: { policy: join, grace_ms: 2000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ShutdownPolicy {
    /// Detach handlers and let them finish or die with the runtime
    #[default]
    Abandon,
    /// Wait up to `grace_ms` for handlers, then abort the rest
    Join { grace_ms: u64 },
}

impl ShutdownPolicy {
    pub fn join(grace: Duration) -> Self {
        ShutdownPolicy::Join {
            grace_ms: grace.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_directory: PathBuf,
    /// Served for a request of `/`
    pub index_document: String,
    /// Served with a 404 when the requested file is missing
    pub not_found_document: String,
    pub read_limit: usize,
    pub backlog: u32,
    pub shutdown: ShutdownPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root_directory: PathBuf::from(DEFAULT_ROOT),
            index_document: DEFAULT_INDEX.to_string(),
            not_found_document: DEFAULT_NOT_FOUND.to_string(),
            read_limit: DEFAULT_READ_LIMIT,
            backlog: 128,
            shutdown: ShutdownPolicy::Abandon,
        }
    }
}

impl ServerConfig {
    /// Loads from a YAML file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses YAML; missing fields fall back to their defaults.
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies the `[host] [port] [root_directory]` positionals on top.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        root_directory: Option<PathBuf>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(root) = root_directory {
            self.root_directory = root;
        }
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn not_found_path(&self) -> PathBuf {
        self.root_directory.join(&self.not_found_document)
    }

    /// Fails fast on a content tree that could never serve a 404.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.read_limit == 0 {
            bail!("read_limit must be greater than zero");
        }
        if !self.root_directory.is_dir() {
            bail!(
                "root directory {} does not exist",
                self.root_directory.display()
            );
        }
        let not_found = self.not_found_path();
        if !not_found.is_file() {
            bail!("not-found document {} is missing", not_found.display());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub read_limit: usize,
    pub connect_timeout: Duration,
    /// Directory successful responses are saved under
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub accept: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_limit: DEFAULT_READ_LIMIT,
            connect_timeout: Duration::from_secs(5),
            output_dir: PathBuf::from("."),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}
