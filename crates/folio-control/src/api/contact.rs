//! Contact form endpoint.

use std::sync::LazyLock;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{SecondsFormat, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ProblemDetails;
use crate::store::Contact;

use super::new_id;
use super::router::AppState;

const THANK_YOU: &str = "Thank you! I'll get back to you soon.";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

/// Request body for submitting the contact form.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/contact - Record a contact form submission
pub async fn submit_contact(
    State(state): State<AppState>,
    input: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactAccepted>, ProblemDetails> {
    let Json(input) = input?;

    let required = |value: Option<String>| value.filter(|v| !v.is_empty());
    let (Some(name), Some(email), Some(message)) = (
        required(input.name),
        required(input.email),
        required(input.message),
    ) else {
        return Err(ProblemDetails::bad_request("Missing required fields"));
    };

    if !EMAIL.is_match(&email) {
        return Err(ProblemDetails::bad_request("Invalid email"));
    }

    let contact = Contact {
        id: new_id("contact"),
        name,
        email,
        phone: input.phone.unwrap_or_default(),
        message,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        read: false,
    };
    tracing::info!(contact_id = %contact.id, email = %contact.email, "contact form submitted");
    state.store.append_contact(contact).await?;

    Ok(Json(ContactAccepted {
        success: true,
        message: THANK_YOU,
    }))
}
