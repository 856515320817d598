//! Maps a request path onto a file under the server root.

use std::io;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::config::ServerConfig;
use crate::http::response::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("not-found document {path} unreadable: {source}")]
    NotFoundDocument { path: PathBuf, source: io::Error },
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// File bytes plus the status they are served with. Built per request and
/// dropped once the response is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub bytes: Bytes,
    pub status: StatusCode,
}

/// Reads the file for `request_path`, or the not-found document with a 404.
///
/// Targets that cannot name a file under the root (no leading '/', `..`
/// segments) are treated as missing. No caching: every call goes back to
/// the filesystem.
pub async fn resolve(cfg: &ServerConfig, request_path: &str) -> Result<ResolvedContent, ContentError> {
    let Some(file) = file_path(&cfg.root_directory, request_path, &cfg.index_document) else {
        debug!(path = %request_path, "Target outside the root");
        return not_found(cfg).await;
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => Ok(ResolvedContent {
            bytes: Bytes::from(bytes),
            status: StatusCode::Ok,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => not_found(cfg).await,
        Err(source) => Err(ContentError::Io { path: file, source }),
    }
}

async fn not_found(cfg: &ServerConfig) -> Result<ResolvedContent, ContentError> {
    let path = cfg.not_found_path();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| ContentError::NotFoundDocument { path, source })?;

    Ok(ResolvedContent {
        bytes: Bytes::from(bytes),
        status: StatusCode::NotFound,
    })
}

/// Joins the request path onto the root. `None` for anything that could
/// climb out of it.
fn file_path(root: &Path, request_path: &str, index: &str) -> Option<PathBuf> {
    let relative = match request_path {
        "/" => index,
        p => p.strip_prefix('/')?,
    };

    let relative = Path::new(relative);
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then(|| root.join(relative))
}
