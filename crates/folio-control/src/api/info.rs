//! Info section API handler.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use crate::error::ProblemDetails;
use crate::store::InfoItem;

use super::multipart::{read_form, take_json_field, upload_image};
use super::new_id;
use super::router::AppState;

#[derive(Debug, Serialize)]
pub struct InfoSaved {
    pub success: bool,
    pub info: InfoItem,
}

/// POST /api/info - Create or update an info section entry with its image
pub async fn save_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<InfoSaved>, ProblemDetails> {
    let mut form = read_form(&headers, body)?;
    let mut info: InfoItem = take_json_field(&mut form, "info")?;

    if info.id.is_empty() {
        info.id = new_id("info");
    }
    if let Some(url) = upload_image(&state.blobs, &mut form, "image", "info", &info.id).await? {
        info.image = Some(url);
    }

    let info = state.store.upsert_info(info).await?;
    tracing::info!(info_id = %info.id, "info entry saved");

    Ok(Json(InfoSaved {
        success: true,
        info,
    }))
}
