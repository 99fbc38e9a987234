//! RFC 9457 Problem Details error responses.

use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_multipart::MultipartError;
use serde::Serialize;

use crate::blob::BlobError;
use crate::store::StoreError;

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 9457 Problem Details response.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Extension member read by the site's scripts. Same text as `detail`,
    /// or the title when there is none.
    pub error: String,
}

impl ProblemDetails {
    fn new(status: StatusCode, slug: &str, detail: Option<String>) -> Self {
        let title = status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string();
        Self {
            error_type: format!("urn:folio:error:{slug}"),
            error: detail.clone().unwrap_or_else(|| title.clone()),
            title,
            status: status.as_u16(),
            detail,
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad-request", Some(detail.into()))
    }

    /// Create a 404 Not Found error.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not-found", Some(detail.into()))
    }

    /// Create a 413 Payload Too Large error.
    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload-too-large",
            Some(detail.into()),
        )
    }

    /// Create a 500 Internal Server Error.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal-error", None)
    }

    /// Create a 502 Bad Gateway error for blob storage failures.
    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "blob-storage", Some(detail.into()))
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Json(&self).into_response();
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// The request body never arrived in full; nothing was decoded.
impl From<BytesRejection> for ProblemDetails {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!(error = %rejection, "failed to read request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large(rejection.body_text())
        } else {
            Self::bad_request(rejection.body_text())
        }
    }
}

impl From<JsonRejection> for ProblemDetails {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large(rejection.body_text())
        } else {
            Self::bad_request(rejection.body_text())
        }
    }
}

impl From<MultipartError> for ProblemDetails {
    fn from(err: MultipartError) -> Self {
        Self::bad_request(format!("Invalid multipart data: {err}"))
    }
}

impl From<StoreError> for ProblemDetails {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "document store error");
        Self::internal_error()
    }
}

impl From<BlobError> for ProblemDetails {
    fn from(err: BlobError) -> Self {
        tracing::error!(error = %err, "blob storage error");
        match err {
            BlobError::InvalidPathname(_) => Self::bad_request(err.to_string()),
            BlobError::Io { .. } => Self::internal_error(),
            BlobError::Http(_) => Self::bad_gateway("blob upload failed"),
        }
    }
}
