use std::io;
use std::path::{Component, Path, PathBuf};

/// File name a response for `path` is saved under: `/` becomes
/// `index.html`, anything else loses its leading slash.
pub fn output_filename(path: &str) -> PathBuf {
    match path {
        "/" => PathBuf::from("index.html"),
        p => PathBuf::from(p.trim_start_matches('/')),
    }
}

/// Writes `raw` to `dir/<output_filename(path)>`, creating parent
/// directories. Refuses names that would land outside `dir`.
pub async fn save(dir: &Path, path: &str, raw: &[u8]) -> io::Result<PathBuf> {
    let name = output_filename(path);
    if name.as_os_str().is_empty() || !name.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot derive a file name from `{}`", path),
        ));
    }

    let file = dir.join(name);
    if let Some(parent) = file.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&file, raw).await?;
    Ok(file)
}
