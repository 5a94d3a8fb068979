//! Driving port for user-facing account queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every account, without credential material.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Current stored state of one account.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error>;
}
