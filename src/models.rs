use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// Column limits carried over from the blog schema
pub const MAX_TITLE_LEN: usize = 50;
pub const MAX_CONTENT_LEN: usize = 250;

// Stored blog post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Body of a create or update request
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::EmptyField { field: "title" });
        }
        let title_len = self.title.chars().count();
        if title_len > MAX_TITLE_LEN {
            return Err(ApiError::FieldTooLong {
                field: "title",
                max: MAX_TITLE_LEN,
                actual: title_len,
            });
        }
        let content_len = self.content.chars().count();
        if content_len > MAX_CONTENT_LEN {
            return Err(ApiError::FieldTooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
                actual: content_len,
            });
        }
        Ok(())
    }
}
