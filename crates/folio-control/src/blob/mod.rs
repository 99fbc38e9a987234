//! Blob storage for uploaded images.
//!
//! Two backends: a local directory served by this process, and the Vercel
//! Blob HTTP API used in production.

mod local;
mod vercel;

use std::path::PathBuf;

use thiserror::Error;

pub use local::LocalBlobStore;
pub use vercel::{VercelBlobStore, VERCEL_BASE_URL};

/// Extension used when an upload's filename has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Blob storage errors.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid blob pathname: {0}")]
    InvalidPathname(String),

    #[error("failed to write blob {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("blob storage request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configured blob backend.
#[derive(Debug)]
pub enum BlobStore {
    Local(LocalBlobStore),
    Vercel(VercelBlobStore),
}

impl BlobStore {
    /// Store `data` under `pathname` and return its public URL.
    pub async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        validate_pathname(pathname)?;
        let url = match self {
            Self::Local(store) => store.put(pathname, &data).await?,
            Self::Vercel(store) => store.put(pathname, data, content_type).await?,
        };
        tracing::info!(pathname, url = %url, "blob stored");
        Ok(url)
    }

    /// Delete blobs by the URLs `put` returned. URLs this backend does not
    /// own are ignored.
    pub async fn delete(&self, urls: &[String]) -> Result<(), BlobError> {
        if urls.is_empty() {
            return Ok(());
        }
        match self {
            Self::Local(store) => store.delete(urls).await,
            Self::Vercel(store) => store.delete(urls).await,
        }
    }
}

/// Reduce a user-supplied value (slug, id) to a single safe path segment.
pub fn path_segment(raw: &str) -> String {
    let segment: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let segment = segment.trim_matches('.');
    if segment.is_empty() {
        "untitled".to_string()
    } else {
        segment.to_string()
    }
}

fn validate_pathname(pathname: &str) -> Result<(), BlobError> {
    let bad = pathname.is_empty()
        || pathname.starts_with('/')
        || pathname
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(BlobError::InvalidPathname(pathname.to_string()));
    }
    Ok(())
}
