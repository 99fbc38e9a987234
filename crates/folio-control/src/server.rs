//! Content backend HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::{create_router, AppState, RouterOptions};
use crate::blob::BlobStore;
use crate::store::DocumentStore;

/// Server configuration.
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub blobs: BlobStore,
    pub router: RouterOptions,
}

/// Run the server until ctrl-c.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let store = DocumentStore::new(&config.data_dir);

    // Fail at startup rather than on the first request
    let document = store.load().await?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        projects = document.projects.len(),
        "site document loaded"
    );

    let state = AppState {
        store: Arc::new(store),
        blobs: Arc::new(config.blobs),
    };
    let app = create_router(state, &config.router);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Folio backend listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Folio backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
