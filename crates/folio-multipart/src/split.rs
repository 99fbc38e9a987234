//! Cutting a buffered body into raw part segments.

use std::iter::FusedIterator;

use memchr::memmem::Finder;

/// Split `body` at every occurrence of `--{boundary}`.
///
/// The region before the first delimiter (prologue) and the region after the
/// last one (the `--` terminator suffix and any epilogue) are discarded.
/// Empty segments are skipped. Segments come out in body order.
///
/// # Boundary collisions
///
/// The scan looks for the literal delimiter bytes anywhere in the body,
/// including inside file payloads. A payload that happens to contain
/// `--{boundary}` is cut at that point and its upload is silently corrupted.
/// Senders normally pick a boundary that does not occur in the content, but
/// callers accepting arbitrary binary uploads should not rely on that.
pub fn split_parts<'a>(body: &'a [u8], boundary: &str) -> Segments<'a> {
    let mut delimiter = Vec::with_capacity(boundary.len() + 2);
    delimiter.extend_from_slice(b"--");
    delimiter.extend_from_slice(boundary.as_bytes());

    Segments {
        body,
        finder: Finder::new(&delimiter).into_owned(),
        cursor: None,
    }
}

/// Iterator over raw part segments, returned by [`split_parts`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    body: &'a [u8],
    finder: Finder<'static>,
    /// Start of the next segment. `None` until the first delimiter is found.
    cursor: Option<usize>,
}

impl Segments<'_> {
    fn find_from(&self, start: usize) -> Option<usize> {
        let haystack = self.body.get(start..)?;
        self.finder.find(haystack).map(|idx| start + idx)
    }

    fn finish(&mut self) {
        self.cursor = Some(self.body.len());
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let delimiter_len = self.finder.needle().len();

        let mut start = match self.cursor {
            Some(start) => start,
            None => match self.find_from(0) {
                Some(first) => first + delimiter_len,
                None => {
                    self.finish();
                    return None;
                }
            },
        };

        loop {
            let Some(end) = self.find_from(start) else {
                self.finish();
                return None;
            };
            let segment = &self.body[start..end];
            start = end + delimiter_len;
            self.cursor = Some(start);
            if !segment.is_empty() {
                return Some(segment);
            }
        }
    }
}

impl FusedIterator for Segments<'_> {}
