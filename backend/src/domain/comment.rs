//! Guestbook comments.
//!
//! Comment text is stored exactly as submitted (after trimming) and is only
//! ever rendered through HTML escaping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum comment length, in characters.
pub const COMMENT_MAX: usize = 1000;
/// Author label used when no principal is attached to the request.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Validation errors for [`CommentText`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment must not be empty")]
    Empty,
    #[error("comment must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trimmed, length-checked comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    pub fn new(raw: &str) -> Result<Self, CommentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if trimmed.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::TooLong { max: COMMENT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Comment awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub body: CommentText,
    pub author: String,
    pub created_at: DateTime<Utc>,
}
