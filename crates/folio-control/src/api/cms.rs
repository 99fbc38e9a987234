//! Whole-document CMS endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::ProblemDetails;
use crate::store::SiteDocument;

use super::router::AppState;
use super::Acknowledged;

/// POST /api/cms - Replace the whole site document
pub async fn replace_document(
    State(state): State<AppState>,
    input: Result<Json<SiteDocument>, JsonRejection>,
) -> Result<Json<Acknowledged>, ProblemDetails> {
    let Json(document) = input?;

    state.store.replace(&document).await?;
    tracing::info!(
        projects = document.projects.len(),
        testimonials = document.testimonials.len(),
        info = document.info_section.len(),
        "site document replaced"
    );

    Ok(Json(Acknowledged { success: true }))
}
