use thiserror::Error;

/// Errors produced while decoding a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultipartError {
    /// The `Content-Type` header is absent or has no `boundary=` parameter.
    /// The whole request must be rejected.
    #[error("missing boundary in multipart Content-Type")]
    MissingBoundary,

    /// One part could not be decoded. [`crate::decode`] skips such parts
    /// and never returns this variant.
    #[error("unparsable multipart part: {reason}")]
    UnparsablePart { reason: &'static str },
}
