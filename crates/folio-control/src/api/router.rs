//! Axum router configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::blob::BlobStore;
use crate::store::DocumentStore;

use super::{cms, contact, health, info, projects, testimonials};

/// Default request body limit: 50 MiB, enough for a hero image plus a gallery.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub blobs: Arc<BlobStore>,
}

/// Router settings that are not part of the handler state.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Largest request body the extractors will buffer.
    pub max_body_bytes: usize,
    /// Static site served for every path no route matches.
    pub public_dir: Option<PathBuf>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            public_dir: None,
        }
    }
}

/// Create the API router with all routes.
pub fn create_router(state: AppState, options: &RouterOptions) -> Router {
    let mut router = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Projects
        .route(
            "/api/projects",
            get(projects::get_document)
                .post(projects::save_project)
                .put(projects::save_project)
                .delete(projects::delete_project),
        )
        .route("/data/projects.json", get(projects::get_document))
        // Testimonials and info section
        .route("/api/testimonial", post(testimonials::save_testimonial))
        .route("/api/info", post(info::save_info))
        // Whole-document editing
        .route("/api/cms", post(cms::replace_document))
        // Contact form
        .route("/api/contact", post(contact::submit_contact))
        .with_state(state.clone());

    // Local uploads are served back under the prefix their URLs carry
    if let BlobStore::Local(local) = state.blobs.as_ref() {
        let prefix = local.url_prefix();
        if prefix.len() > 1 && prefix.starts_with('/') {
            router = router.nest_service(prefix, ServeDir::new(local.root()));
        }
    }

    if let Some(public_dir) = &options.public_dir {
        router = router.fallback_service(ServeDir::new(public_dir));
    }

    router
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
