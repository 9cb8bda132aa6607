//! Data Transfer Objects - request/response types for the API.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Maximum title length, matching the `VARCHAR(255)` column.
pub const TITLE_MAX_LEN: usize = 255;

const TITLE_REQUIRED: &str = "The title field is required.";
const TITLE_TOO_LONG: &str = "The title must not be greater than 255 characters.";

/// Request body for creating or updating a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostRequest {
    #[serde(default)]
    #[validate(
        required(message = "The title field is required."),
        custom(function = "validate_title")
    )]
    pub title: Option<String>,
}

impl PostRequest {
    /// The title with surrounding whitespace removed, if present.
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim)
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(TITLE_REQUIRED)));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ValidationError::new("max").with_message(Cow::Borrowed(TITLE_TOO_LONG)));
    }
    Ok(())
}

/// Serialized post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Paginated collection, with the items under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}
