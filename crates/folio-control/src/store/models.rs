//! Site document models.
//!
//! Only the fields the backend reads or writes are typed. Everything else the
//! admin client stores on an item (title, category, quote, ...) is kept in
//! `extra` and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The whole site document (`projects.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default, rename = "infoSection")]
    pub info_section: Vec<InfoItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A portfolio project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    /// Hero image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A client testimonial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An entry of the "about" info section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoItem {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A contact form submission (`contacts.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}

/// Items keyed by a string id inside the document.
pub trait DocumentItem {
    fn id(&self) -> &str;

    /// Fill media URLs this item leaves unset from the stored version.
    fn inherit_media(&mut self, stored: &Self);
}

impl DocumentItem for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn inherit_media(&mut self, stored: &Self) {
        if self.image.is_none() {
            self.image.clone_from(&stored.image);
        }
        if self.images.is_empty() {
            self.images.clone_from(&stored.images);
        }
    }
}

impl DocumentItem for Testimonial {
    fn id(&self) -> &str {
        &self.id
    }

    fn inherit_media(&mut self, stored: &Self) {
        if self.image.is_none() {
            self.image.clone_from(&stored.image);
        }
    }
}

impl DocumentItem for InfoItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn inherit_media(&mut self, stored: &Self) {
        if self.image.is_none() {
            self.image.clone_from(&stored.image);
        }
    }
}

/// Replace the item with the same id, or append it. Returns the stored item.
pub fn upsert<T: DocumentItem>(items: &mut Vec<T>, mut item: T) -> &T {
    let index = match items.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => {
            item.inherit_media(&items[index]);
            items[index] = item;
            index
        }
        None => {
            items.push(item);
            items.len() - 1
        }
    };
    &items[index]
}
