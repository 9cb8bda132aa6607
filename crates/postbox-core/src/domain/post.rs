use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-generated identifier of a post.
pub type PostId = i64;

/// Post entity - a titled record with server-assigned timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Replace the title and bump `updated_at`.
    pub fn retitle(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }
}

/// A post that has not been persisted yet; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}
