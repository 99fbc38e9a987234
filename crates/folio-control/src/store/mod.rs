//! JSON document storage for site content.

mod document;
mod models;

use std::path::PathBuf;

use thiserror::Error;

pub use document::DocumentStore;
pub use models::*;

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
