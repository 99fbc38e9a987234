//! Shared multipart form helpers for the upload endpoints.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{header, HeaderMap},
};
use folio_multipart::{FileEntry, FormData};
use serde::de::DeserializeOwned;

use crate::blob::{path_segment, BlobStore, DEFAULT_EXTENSION};
use crate::error::ProblemDetails;

/// Decode a fully buffered multipart request.
///
/// The body is taken by value: a failed read is reported before any decoding
/// happens, and the buffer is released as soon as the form is built.
pub fn read_form(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<FormData, ProblemDetails> {
    let body = body?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let form = folio_multipart::decode(&body, content_type)?;
    tracing::debug!(
        body_len = body.len(),
        fields = form.fields.len(),
        files = form.files.len(),
        "multipart form decoded"
    );
    Ok(form)
}

/// Take a text field holding a JSON object and deserialize it.
///
/// Fails with 400 if the field is missing or is not valid JSON for `T`.
pub fn take_json_field<T: DeserializeOwned>(
    form: &mut FormData,
    name: &str,
) -> Result<T, ProblemDetails> {
    let raw = form
        .take_field(name)
        .ok_or_else(|| ProblemDetails::bad_request(format!("Missing '{name}' field")))?;

    serde_json::from_str(&raw)
        .map_err(|e| ProblemDetails::bad_request(format!("Invalid '{name}' JSON: {e}")))
}

/// Lowercased extension for a blob pathname, [`DEFAULT_EXTENSION`] when the
/// filename has none or it is not plain alphanumeric.
pub fn file_extension(file: &FileEntry) -> String {
    file.extension()
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_ascii_lowercase)
}

/// Upload the form's optional `file_name` image as `{folder}/{id}-{millis}.{ext}`.
///
/// Returns the blob URL, or `None` when the form carries no such file.
pub async fn upload_image(
    blobs: &BlobStore,
    form: &mut FormData,
    file_name: &str,
    folder: &str,
    id: &str,
) -> Result<Option<String>, ProblemDetails> {
    let Some(image) = form.take_file(file_name) else {
        return Ok(None);
    };

    let pathname = format!(
        "{folder}/{}-{}.{}",
        path_segment(id),
        chrono::Utc::now().timestamp_millis(),
        file_extension(&image)
    );
    let url = blobs.put(&pathname, image.data, &image.content_type).await?;
    Ok(Some(url))
}
