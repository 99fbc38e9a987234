//! Testimonial API handler.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use crate::error::ProblemDetails;
use crate::store::Testimonial;

use super::multipart::{read_form, take_json_field, upload_image};
use super::new_id;
use super::router::AppState;

#[derive(Debug, Serialize)]
pub struct TestimonialSaved {
    pub success: bool,
    pub testimonial: Testimonial,
}

/// POST /api/testimonial - Create or update a testimonial with its photo
pub async fn save_testimonial(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TestimonialSaved>, ProblemDetails> {
    let mut form = read_form(&headers, body)?;
    let mut testimonial: Testimonial = take_json_field(&mut form, "testimonial")?;

    if testimonial.id.is_empty() {
        testimonial.id = new_id("testimonial");
    }
    if let Some(url) =
        upload_image(&state.blobs, &mut form, "image", "testimonial", &testimonial.id).await?
    {
        testimonial.image = Some(url);
    }

    let testimonial = state.store.upsert_testimonial(testimonial).await?;
    tracing::info!(testimonial_id = %testimonial.id, "testimonial saved");

    Ok(Json(TestimonialSaved {
        success: true,
        testimonial,
    }))
}
