//! REST API handlers for the content backend.

mod cms;
mod contact;
mod health;
mod info;
mod multipart;
mod projects;
mod router;
mod testimonials;


use serde::Serialize;

pub use router::{create_router, AppState, RouterOptions, DEFAULT_MAX_BODY_BYTES};

/// Body of responses that only acknowledge a write.
#[derive(Debug, Serialize)]
pub struct Acknowledged {
    pub success: bool,
}

/// Id for an item submitted without one: `{prefix}-{unix millis}`.
fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", chrono::Utc::now().timestamp_millis())
}
