//! Driving ports for the comment board.

use async_trait::async_trait;

use crate::domain::{Comment, CommentText, Error};

/// Number of comments returned by [`CommentsQuery::recent`].
pub const RECENT_COMMENTS: i64 = 50;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Store a comment attributed to `author`.
    async fn post(&self, body: CommentText, author: String) -> Result<i32, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// The latest comments, newest first.
    async fn recent(&self) -> Result<Vec<Comment>, Error>;
}
