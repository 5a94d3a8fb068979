//! SQLite-backed `CommentRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, NewComment};

use super::error_mapping::run;
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbHandle;
use super::schema::comments;

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    db: DbHandle,
}

impl DieselCommentRepository {
    pub fn new(db: DbHandle) -> Self {
        Self { db }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            body: row.body,
            author: row.author,
            created_at: row.created_at.and_utc(),
        }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<i32, CommentPersistenceError> {
        let body = comment.body.as_str().to_owned();
        let author = comment.author.clone();
        let created_at = comment.created_at.naive_utc();
        run(&self.db, move |conn| {
            diesel::insert_into(comments::table)
                .values(NewCommentRow {
                    body: &body,
                    author: &author,
                    created_at,
                })
                .returning(comments::id)
                .get_result::<i32>(conn)
        })
        .await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Comment>, CommentPersistenceError> {
        let rows: Vec<CommentRow> = run(&self.db, move |conn| {
            comments::table
                .order((comments::created_at.desc(), comments::id.desc()))
                .limit(limit)
                .select(CommentRow::as_select())
                .load(conn)
        })
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
