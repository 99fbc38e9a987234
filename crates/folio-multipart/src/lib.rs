//! Buffered `multipart/form-data` decoder.
//!
//! Turns a fully received request body and its `Content-Type` header into
//! text fields and binary file uploads:
//!
//! 1. [`extract_boundary`] reads the delimiter token from the header.
//! 2. [`split_parts`] cuts the body into raw segments at each delimiter.
//! 3. [`decode_part`] separates each segment's headers from its payload.
//! 4. [`FormData`] collects the decoded parts, last write wins per name.
//!
//! The decoder never reads from a connection. The HTTP layer buffers the
//! whole body first and hands it over once complete.
//!
//! # Example
//!
//! ```
//! let body = b"--X\r\n\
//!     Content-Disposition: form-data; name=\"title\"\r\n\r\n\
//!     My Project\r\n\
//!     --X--\r\n";
//!
//! let form = folio_multipart::decode(body, Some("multipart/form-data; boundary=X"))?;
//! assert_eq!(form.field("title"), Some("My Project"));
//! # Ok::<(), folio_multipart::MultipartError>(())
//! ```

mod boundary;
mod error;
mod form;
mod part;
mod split;

pub use boundary::extract_boundary;
pub use error::MultipartError;
pub use form::{FileEntry, FormData};
pub use part::{decode_part, parse_header_line, Part, PartHeaders, DEFAULT_CONTENT_TYPE};
pub use split::{split_parts, Segments};

/// Decode a buffered `multipart/form-data` body.
///
/// Parts that cannot be decoded are logged and skipped; the rest of the body
/// still decodes. The function is pure: the same input always yields the
/// same output.
///
/// # Errors
///
/// [`MultipartError::MissingBoundary`] when `content_type` is absent or has
/// no `boundary=` parameter.
pub fn decode(body: &[u8], content_type: Option<&str>) -> Result<FormData, MultipartError> {
    let boundary = extract_boundary(content_type)?;

    let mut form = FormData::new();
    let mut skipped = 0usize;
    for (index, segment) in split_parts(body, boundary).enumerate() {
        match decode_part(segment) {
            Ok(part) => form.insert(part),
            Err(err) => {
                skipped += 1;
                tracing::debug!(
                    index,
                    segment_len = segment.len(),
                    error = %err,
                    "skipping multipart part"
                );
            }
        }
    }

    tracing::trace!(
        body_len = body.len(),
        fields = form.fields.len(),
        files = form.files.len(),
        skipped,
        "decoded multipart body"
    );

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPE: &str = "multipart/form-data; boundary=X";

    /// Builds a multipart body part by part.
    struct BodyBuilder {
        boundary: String,
        out: Vec<u8>,
    }

    impl BodyBuilder {
        fn new(boundary: &str) -> Self {
            Self {
                boundary: boundary.to_string(),
                out: Vec::new(),
            }
        }

        fn part(mut self, headers: &str, payload: &[u8]) -> Self {
            let opening = format!("--{}\r\n{headers}\r\n\r\n", self.boundary);
            self.out.extend_from_slice(opening.as_bytes());
            self.out.extend_from_slice(payload);
            self.out.extend_from_slice(b"\r\n");
            self
        }

        fn finish(mut self) -> Vec<u8> {
            let closing = format!("--{}--\r\n", self.boundary);
            self.out.extend_from_slice(closing.as_bytes());
            self.out
        }
    }

    fn field(name: &str) -> String {
        format!("Content-Disposition: form-data; name=\"{name}\"")
    }

    fn file(name: &str, filename: &str, content_type: &str) -> String {
        format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}"
        )
    }

    #[test]
    fn test_project_upload_scenario() {
        let hero = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        let body = BodyBuilder::new("X")
            .part(&field("title"), b"My Project")
            .part(&file("heroImage", "h.jpg", "image/jpeg"), &hero)
            .finish();

        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");

        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.field("title"), Some("My Project"));
        assert_eq!(form.files.len(), 1);
        let entry = form.file("heroImage").expect("hero image");
        assert_eq!(entry.filename, "h.jpg");
        assert_eq!(entry.content_type, "image/jpeg");
        assert_eq!(entry.data, hero);
    }

    #[test]
    fn test_part_count_matches_distinct_names() {
        let body = BodyBuilder::new("X")
            .part(&field("a"), b"1")
            .part(&field("b"), b"2")
            .part(&file("c", "c.bin", "application/octet-stream"), b"3")
            .part(&file("d", "d.txt", "text/plain"), b"4")
            .finish();

        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(form.fields.len() + form.files.len(), 4);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let body = BodyBuilder::new("X")
            .part(&field("a"), b"value")
            .part(&file("f", "f.png", "image/png"), &[1, 2, 3])
            .finish();

        let first = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        let second = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_name_last_write_wins() {
        let body = BodyBuilder::new("X")
            .part(&field("x"), b"a")
            .part(&field("x"), b"b")
            .finish();

        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(form.field("x"), Some("b"));
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_missing_boundary_is_fatal() {
        let body = BodyBuilder::new("X").part(&field("a"), b"1").finish();
        assert_eq!(
            decode(&body, Some("multipart/form-data")),
            Err(MultipartError::MissingBoundary)
        );
        assert_eq!(decode(&body, None), Err(MultipartError::MissingBoundary));
    }

    #[test]
    fn test_malformed_part_is_skipped() {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"--X\r\nContent-Disposition: form-data; name=\"bad\"\r\n");
        raw.extend_from_slice(b"no blank line here\r\n");
        raw.extend_from_slice(b"--X\r\nContent-Disposition: form-data; name=\"good\"\r\n\r\n");
        raw.extend_from_slice(b"ok\r\n--X--\r\n");

        let form = decode(&raw, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(form.field("good"), Some("ok"));
        assert!(form.field("bad").is_none());
        assert!(form.file("bad").is_none());
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_part_without_disposition_is_skipped() {
        let body = BodyBuilder::new("X")
            .part("Content-Type: text/plain", b"orphan")
            .part(&field("a"), b"1")
            .finish();

        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(form.len(), 1);
        assert_eq!(form.field("a"), Some("1"));
    }

    #[test]
    fn test_file_payload_is_exact() {
        let payload = [0xFF, 0xD8, 0x0D, 0x0A, 0x0D, 0x0A, 0x00, 0xFE];
        let body = BodyBuilder::new("X")
            .part(
                "Content-Disposition: form-data; name=\"img\"; filename=\"a.jpg\"",
                &payload,
            )
            .finish();

        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        let entry = form.file("img").expect("img");
        assert_eq!(entry.filename, "a.jpg");
        assert_eq!(entry.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(entry.data, payload);
    }

    #[test]
    fn test_text_field_round_trip() {
        let body = BodyBuilder::new("X")
            .part(&field("greeting"), "hello".as_bytes())
            .finish();
        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(form.field("greeting"), Some("hello"));

        let body = BodyBuilder::new("X")
            .part(&field("name"), "Zoë ✓".as_bytes())
            .finish();
        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        assert_eq!(form.field("name"), Some("Zoë ✓"));
    }

    #[test]
    fn test_quoted_boundary_body() {
        let boundary = "----WebKitFormBoundaryAbC123";
        let body = BodyBuilder::new(boundary)
            .part(&field("project"), br#"{"id":"p1"}"#)
            .finish();
        let content_type = format!("multipart/form-data; boundary=\"{boundary}\"");

        let form = decode(&body, Some(&content_type)).expect("decode");
        assert_eq!(form.field("project"), Some(r#"{"id":"p1"}"#));
    }

    #[test]
    fn test_empty_body_yields_empty_form() {
        let form = decode(b"", Some(CONTENT_TYPE)).expect("decode");
        assert!(form.is_empty());
    }

    #[test]
    fn test_delimiter_inside_payload_corrupts_file() {
        // The scan is not collision-safe: "--X" inside the payload ends the
        // part early and the remainder becomes an unparsable segment.
        let body = BodyBuilder::new("X")
            .part(&file("f", "a.bin", "application/octet-stream"), b"AB--XCD")
            .finish();

        let form = decode(&body, Some(CONTENT_TYPE)).expect("decode");
        let entry = form.file("f").expect("file is still reported");
        assert_ne!(entry.data, b"AB--XCD");
        assert!(entry.data.is_empty());
        assert_eq!(form.len(), 1);
    }
}
