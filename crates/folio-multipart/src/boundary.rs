//! Boundary extraction from the request `Content-Type` header.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::MultipartError;

/// `boundary=` followed by a quoted string or a token ending at `;`.
static BOUNDARY_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"boundary=(?:"([^"]+)"|([^;]+))"#).expect("valid boundary pattern")
});

/// Extract the boundary token from a `Content-Type` header value.
///
/// The quoted form wins when present and its quotes are stripped. The token
/// is returned verbatim otherwise: surrounding whitespace is kept.
///
/// # Errors
///
/// [`MultipartError::MissingBoundary`] when the header is absent or carries
/// no `boundary=` parameter.
pub fn extract_boundary(content_type: Option<&str>) -> Result<&str, MultipartError> {
    let content_type = content_type.ok_or(MultipartError::MissingBoundary)?;
    let captures = BOUNDARY_PARAM
        .captures(content_type)
        .ok_or(MultipartError::MissingBoundary)?;

    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
        .ok_or(MultipartError::MissingBoundary)
}
