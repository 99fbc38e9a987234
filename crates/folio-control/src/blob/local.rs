use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::BlobError;

/// Blobs written to a local directory and served under a URL prefix.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    /// Directory blobs are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL path the directory is served under.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub(super) async fn put(&self, pathname: &str, data: &[u8]) -> Result<String, BlobError> {
        let path = self.root.join(pathname);
        let io_err = |source| BlobError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, data).await.map_err(io_err)?;

        Ok(format!("{}/{}", self.url_prefix, pathname))
    }

    pub(super) async fn delete(&self, urls: &[String]) -> Result<(), BlobError> {
        let owned = format!("{}/", self.url_prefix);
        for url in urls {
            let Some(pathname) = url.strip_prefix(&owned) else {
                tracing::debug!(url = %url, "skipping blob not stored locally");
                continue;
            };
            if super::validate_pathname(pathname).is_err() {
                continue;
            }

            let path = self.root.join(pathname);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(BlobError::Io { path, source }),
            }
        }
        Ok(())
    }
}
