//! Port abstraction for stored comments.
use async_trait::async_trait;

use crate::domain::{Comment, NewComment};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a comment and return its identifier.
    async fn insert(&self, comment: &NewComment) -> Result<i32, CommentPersistenceError>;

    /// Most recent comments, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<Comment>, CommentPersistenceError>;
}
