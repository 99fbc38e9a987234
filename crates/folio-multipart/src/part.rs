//! Decoding a single raw segment into headers and payload.

use std::sync::LazyLock;

use memchr::memmem;
use regex_lite::Regex;

use crate::MultipartError;

/// Content type assumed when a part carries no `Content-Type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Blank line separating the header block from the payload.
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Line terminator preceding the next delimiter.
const TRAILING_CRLF_LEN: usize = 2;

static CONTENT_DISPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Content-Disposition: form-data; name="([^"]+)"(?:; filename="([^"]+)")?"#)
        .expect("valid content-disposition pattern")
});

static CONTENT_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Content-Type: (.+)").expect("valid content-type pattern"));

/// Headers recognised on a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartHeaders {
    /// Form field name from `Content-Disposition`.
    pub name: String,
    /// Uploaded filename, present only for file parts.
    pub filename: Option<String>,
    /// `Content-Type` of the part, [`DEFAULT_CONTENT_TYPE`] when absent.
    pub content_type: String,
}

/// Parse a part's header block.
///
/// Only two headers are recognised:
/// `Content-Disposition: form-data; name="..."[; filename="..."]` and
/// `Content-Type: ...`. Everything else in the block is ignored. Header
/// names and the `form-data` keyword are matched exactly as written above.
///
/// # Errors
///
/// [`MultipartError::UnparsablePart`] when no `Content-Disposition` header of
/// that shape is present.
pub fn parse_header_line(block: &str) -> Result<PartHeaders, MultipartError> {
    let disposition =
        CONTENT_DISPOSITION
            .captures(block)
            .ok_or(MultipartError::UnparsablePart {
                reason: "missing or malformed Content-Disposition",
            })?;

    let name = disposition
        .get(1)
        .map(|m| m.as_str().to_owned())
        .ok_or(MultipartError::UnparsablePart {
            reason: "Content-Disposition has no name",
        })?;
    let filename = disposition.get(2).map(|m| m.as_str().to_owned());

    let content_type = CONTENT_TYPE
        .captures(block)
        .and_then(|c| c.get(1))
        .map_or_else(
            || DEFAULT_CONTENT_TYPE.to_owned(),
            |m| m.as_str().trim().to_owned(),
        );

    Ok(PartHeaders {
        name,
        filename,
        content_type,
    })
}

/// A decoded part borrowing its payload from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<'a> {
    pub headers: PartHeaders,
    /// Payload bytes with the trailing line terminator removed.
    pub data: &'a [u8],
}

impl Part<'_> {
    /// Returns true if this part is a file upload.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.headers.filename.is_some()
    }

    /// Field name of this part.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.headers.name
    }
}

/// Decode one segment produced by [`crate::split_parts`].
///
/// The header block ends at the first blank line. The payload is everything
/// after it minus the final two bytes; no transfer encoding is applied.
///
/// # Errors
///
/// [`MultipartError::UnparsablePart`] when the segment has no blank line or
/// its headers lack a usable `Content-Disposition`.
pub fn decode_part(segment: &[u8]) -> Result<Part<'_>, MultipartError> {
    let header_end =
        memmem::find(segment, HEADER_TERMINATOR).ok_or(MultipartError::UnparsablePart {
            reason: "no blank line after part headers",
        })?;

    let block = String::from_utf8_lossy(&segment[..header_end]);
    let headers = parse_header_line(&block)?;

    let payload = &segment[header_end + HEADER_TERMINATOR.len()..];
    let data = &payload[..payload.len().saturating_sub(TRAILING_CRLF_LEN)];

    Ok(Part { headers, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_headers() {
        let headers = parse_header_line("\r\nContent-Disposition: form-data; name=\"title\"")
            .expect("field headers");
        assert_eq!(headers.name, "title");
        assert_eq!(headers.filename, None);
        assert_eq!(headers.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_parse_file_headers() {
        let block = "\r\nContent-Disposition: form-data; name=\"img\"; filename=\"a.jpg\"\r\n\
                     Content-Type: image/jpeg";
        let headers = parse_header_line(block).expect("file headers");
        assert_eq!(headers.name, "img");
        assert_eq!(headers.filename.as_deref(), Some("a.jpg"));
        assert_eq!(headers.content_type, "image/jpeg");
    }

    #[test]
    fn test_content_type_is_trimmed() {
        let block = "Content-Type:  application/json \r\n\
                     Content-Disposition: form-data; name=\"doc\"";
        let headers = parse_header_line(block).expect("headers");
        assert_eq!(headers.content_type, "application/json");
    }

    #[test]
    fn test_other_headers_are_ignored() {
        let block = "Content-Disposition: form-data; name=\"x\"\r\n\
                     Content-Transfer-Encoding: base64\r\n\
                     X-Custom: whatever";
        let headers = parse_header_line(block).expect("headers");
        assert_eq!(headers.name, "x");
        assert_eq!(headers.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_empty_filename_is_a_field() {
        let block = "Content-Disposition: form-data; name=\"img\"; filename=\"\"";
        let headers = parse_header_line(block).expect("headers");
        assert_eq!(headers.name, "img");
        assert_eq!(headers.filename, None);
    }

    #[test]
    fn test_missing_disposition_is_unparsable() {
        let err = parse_header_line("Content-Type: text/plain").unwrap_err();
        assert!(matches!(err, MultipartError::UnparsablePart { .. }));
    }

    #[test]
    fn test_disposition_match_is_case_sensitive() {
        assert!(parse_header_line("content-disposition: form-data; name=\"x\"").is_err());
        assert!(parse_header_line("Content-Disposition: attachment; name=\"x\"").is_err());
    }

    #[test]
    fn test_empty_name_is_unparsable() {
        assert!(parse_header_line("Content-Disposition: form-data; name=\"\"").is_err());
    }

    #[test]
    fn test_decode_part_strips_trailing_crlf() {
        let segment = b"\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nline1\r\nline2\r\n";
        let part = decode_part(segment).expect("part");
        assert_eq!(part.name(), "a");
        assert!(!part.is_file());
        assert_eq!(part.data, b"line1\r\nline2");
    }

    #[test]
    fn test_decode_part_keeps_blank_lines_in_payload() {
        let segment = b"\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n\r\n\r\nx\r\n";
        let part = decode_part(segment).expect("part");
        assert_eq!(part.data, b"\r\n\r\nx");
    }

    #[test]
    fn test_decode_part_without_blank_line() {
        let segment = b"\r\nContent-Disposition: form-data; name=\"a\"\r\nvalue\r\n";
        let err = decode_part(segment).unwrap_err();
        assert_eq!(
            err,
            MultipartError::UnparsablePart {
                reason: "no blank line after part headers"
            }
        );
    }

    #[test]
    fn test_decode_part_short_payload_saturates() {
        let segment = b"Content-Disposition: form-data; name=\"a\"\r\n\r\nx";
        let part = decode_part(segment).expect("part");
        assert!(part.data.is_empty());
    }

    #[test]
    fn test_decode_part_binary_payload_untouched() {
        let mut segment =
            b"\r\nContent-Disposition: form-data; name=\"f\"; filename=\"b.bin\"\r\n\r\n".to_vec();
        let payload = [0x00, 0xFF, 0xD8, b'\r', b'\n', 0x80, 0x7F];
        segment.extend_from_slice(&payload);
        segment.extend_from_slice(b"\r\n");

        let part = decode_part(&segment).expect("part");
        assert!(part.is_file());
        assert_eq!(part.data, payload);
    }
}
