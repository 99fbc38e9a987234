//! Aggregation of decoded parts into text fields and file uploads.

use std::collections::HashMap;
use std::path::Path;

use crate::Part;

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Filename as sent by the client.
    pub filename: String,
    /// Declared content type, `text/plain` when the part had none.
    pub content_type: String,
    /// Raw payload bytes, never decoded.
    pub data: Vec<u8>,
}

impl FileEntry {
    /// Extension of the client filename, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of decoding one multipart body.
///
/// Fields and files live in separate maps. Within each map a later part with
/// the same name replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, FileEntry>,
}

impl FormData {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from decoded parts, in body order.
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = Part<'a>>) -> Self {
        parts.into_iter().collect()
    }

    /// Merge one decoded part. Parts with a filename become files, others
    /// become text fields decoded as UTF-8 (invalid sequences are replaced).
    pub fn insert(&mut self, part: Part<'_>) {
        let Part { headers, data } = part;
        match headers.filename {
            Some(filename) => {
                self.files.insert(
                    headers.name,
                    FileEntry {
                        filename,
                        content_type: headers.content_type,
                        data: data.to_vec(),
                    },
                );
            }
            None => {
                self.fields
                    .insert(headers.name, String::from_utf8_lossy(data).into_owned());
            }
        }
    }

    /// Get a text field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get a file by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.get(name)
    }

    /// Remove and return a text field.
    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Remove and return a file.
    pub fn take_file(&mut self, name: &str) -> Option<FileEntry> {
        self.files.remove(name)
    }

    /// Remove and return every file whose name starts with `prefix`.
    ///
    /// Names ending in a number after the prefix (`galleryImage0`,
    /// `galleryImage1`, ...) come first in numeric order, the rest follow
    /// sorted by name.
    pub fn take_files_with_prefix(&mut self, prefix: &str) -> Vec<(String, FileEntry)> {
        let names: Vec<String> = self
            .files
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();

        let mut taken: Vec<(String, FileEntry)> = names
            .into_iter()
            .filter_map(|name| self.files.remove(&name).map(|file| (name, file)))
            .collect();

        taken.sort_by(|(a, _), (b, _)| {
            let index = |name: &str| name[prefix.len()..].parse::<u64>().ok();
            let (ia, ib) = (index(a), index(b));
            ia.is_none()
                .cmp(&ib.is_none())
                .then(ia.cmp(&ib))
                .then_with(|| a.cmp(b))
        });
        taken
    }

    /// Total number of fields and files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }
}

impl<'a> FromIterator<Part<'a>> for FormData {
    fn from_iter<I: IntoIterator<Item = Part<'a>>>(iter: I) -> Self {
        let mut form = Self::new();
        form.extend(iter);
        form
    }
}

impl<'a> Extend<Part<'a>> for FormData {
    fn extend<I: IntoIterator<Item = Part<'a>>>(&mut self, iter: I) {
        for part in iter {
            self.insert(part);
        }
    }
}
